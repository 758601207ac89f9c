// Collaborator seams between the collection pipeline and the container runtime

use crate::error::{InventoryError, StreamError};
use crate::models::{ContainerIdentity, StatSnapshot};
use futures_util::stream::BoxStream;
use std::future::Future;

/// Lazy, non-restartable sequence of snapshots for one container. Ends when
/// the runtime closes it. An error before the first snapshot means the
/// stream could not be opened.
pub type SnapshotStream<'a> = BoxStream<'a, Result<StatSnapshot, StreamError>>;

/// Enumerates the containers to monitor, in display order.
pub trait ContainerInventory: Send + Sync {
    fn list_containers(
        &self,
    ) -> impl Future<Output = Result<Vec<ContainerIdentity>, InventoryError>> + Send;
}

/// Opens per-container stats streams.
pub trait MetricsSource: Send + Sync + 'static {
    fn open_stream<'a>(&'a self, container_id: &'a str) -> SnapshotStream<'a>;
}
