// Shared test helpers: in-memory inventory and scripted stats streams

#![allow(dead_code)]

use dockstat::error::{InventoryError, StreamError};
use dockstat::models::{BlkioEntry, ContainerIdentity, StatSnapshot};
use dockstat::source::{ContainerInventory, MetricsSource, SnapshotStream};
use futures_util::StreamExt;
use futures_util::stream;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub struct FakeInventory {
    containers: Vec<ContainerIdentity>,
    fail: bool,
}

impl FakeInventory {
    pub fn new(containers: Vec<ContainerIdentity>) -> Self {
        Self {
            containers,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            containers: vec![],
            fail: true,
        }
    }
}

impl ContainerInventory for FakeInventory {
    fn list_containers(
        &self,
    ) -> impl Future<Output = Result<Vec<ContainerIdentity>, InventoryError>> + Send {
        let result = if self.fail {
            Err(InventoryError::Unavailable("daemon down".into()))
        } else {
            Ok(self.containers.clone())
        };
        async move { result }
    }
}

pub enum Script {
    Snapshots(Vec<StatSnapshot>),
    OpenError,
    /// Snapshots spaced by `delay` each.
    Slow(Vec<StatSnapshot>, Duration),
    /// Snapshots, then a stream that never yields again.
    Stalled(Vec<StatSnapshot>),
    /// `open_stream` panics.
    Panic,
}

/// Replays a script per container id and records stream concurrency.
#[derive(Default)]
pub struct FakeSource {
    scripts: Mutex<HashMap<String, Script>>,
    open: AtomicUsize,
    pub peak_open: AtomicUsize,
}

impl FakeSource {
    pub fn with(mut self, id: &str, script: Script) -> Self {
        self.scripts
            .get_mut()
            .unwrap()
            .insert(id.to_string(), script);
        self
    }

    fn enter(&self) {
        let now = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_open.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MetricsSource for FakeSource {
    fn open_stream<'a>(&'a self, container_id: &'a str) -> SnapshotStream<'a> {
        let script = self.scripts.lock().unwrap().remove(container_id);
        match script {
            None | Some(Script::OpenError) => stream::iter(vec![Err(StreamError::Unavailable(
                format!("no such container: {}", container_id),
            ))])
            .boxed(),
            Some(Script::Snapshots(items)) => stream::iter(items.into_iter().map(Ok)).boxed(),
            Some(Script::Stalled(items)) => stream::iter(items.into_iter().map(Ok))
                .chain(stream::pending())
                .boxed(),
            Some(Script::Panic) => panic!("stats stream for {} exploded", container_id),
            Some(Script::Slow(items, delay)) => {
                self.enter();
                let total = items.len();
                stream::iter(items.into_iter().enumerate())
                    .then(move |(i, s)| async move {
                        tokio::time::sleep(delay).await;
                        if i + 1 == total {
                            self.leave();
                        }
                        Ok::<_, StreamError>(s)
                    })
                    .boxed()
            }
        }
    }
}

pub fn snapshot(cpu_usage: u64, system_cpu_usage: u64, pids: u64) -> StatSnapshot {
    StatSnapshot {
        cpu_usage,
        system_cpu_usage,
        online_cpus: 2,
        memory_usage: 512 * 1024 * 1024,
        memory_stats: HashMap::from([("cache".to_string(), 256 * 1024 * 1024)]),
        memory_limit: 1024 * 1024 * 1024,
        blkio: vec![BlkioEntry::new("Read", 2048), BlkioEntry::new("Write", 1024 * 1024)],
        pids,
    }
}

pub fn container(id: &str, name: &str) -> ContainerIdentity {
    ContainerIdentity::new(id, name)
}
