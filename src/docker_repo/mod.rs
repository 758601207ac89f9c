// Docker inventory and stats streams via bollard

mod stats;

use crate::error::{InventoryError, StreamError};
use crate::models::ContainerIdentity;
use crate::source::{ContainerInventory, MetricsSource, SnapshotStream};
use bollard::Docker;
use bollard::query_parameters::{ListContainersOptions, StatsOptions};
use futures_util::StreamExt;
use std::collections::HashMap;
use std::future::Future;
use tracing::instrument;

/// Handle to the local Docker daemon. Construct once and share by `Arc`.
#[derive(Clone)]
pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    /// Connect using `DOCKER_HOST` (unix socket default when unset) and
    /// negotiate the API version with the daemon.
    pub async fn connect() -> anyhow::Result<Self> {
        let docker = Docker::connect_with_defaults()?.negotiate_version().await?;
        Ok(Self { docker })
    }

    /// API version agreed with the daemon.
    pub fn api_version(&self) -> String {
        let v = self.docker.client_version();
        format!("{}.{}", v.major_version, v.minor_version)
    }

    /// Fails when the daemon is unreachable.
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.docker.ping().await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "list_containers"))]
    async fn list_running(&self) -> Result<Vec<ContainerIdentity>, InventoryError> {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);

        let filter = ListContainersOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };

        let containers = self.docker.list_containers(Some(filter)).await?;
        Ok(containers
            .into_iter()
            .filter_map(|c| {
                let id = c.id?;
                let name = c
                    .names
                    .as_ref()
                    .and_then(|n| n.first())
                    .map(|n| n.trim_start_matches('/').to_string())
                    .unwrap_or_else(|| id.clone());
                Some(ContainerIdentity { id, name })
            })
            .collect())
    }
}

impl ContainerInventory for DockerRepo {
    fn list_containers(
        &self,
    ) -> impl Future<Output = Result<Vec<ContainerIdentity>, InventoryError>> + Send {
        self.list_running()
    }
}

impl MetricsSource for DockerRepo {
    fn open_stream<'a>(&'a self, container_id: &'a str) -> SnapshotStream<'a> {
        let options = StatsOptions {
            stream: true,
            ..Default::default()
        };
        self.docker
            .stats(container_id, Some(options))
            .map(|result| {
                result
                    .map_err(StreamError::from)
                    .and_then(|s| stats::to_snapshot(&s))
            })
            .boxed()
    }
}
