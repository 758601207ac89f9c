// Runtime-agnostic container counters

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A running container as reported by the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerIdentity {
    pub id: String,
    pub name: String,
}

impl ContainerIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One block-I/O counter, keyed by operation kind ("Read", "Write", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlkioEntry {
    pub op: String,
    pub value: u64,
}

impl BlkioEntry {
    pub fn new(op: impl Into<String>, value: u64) -> Self {
        Self {
            op: op.into(),
            value,
        }
    }
}

/// Cumulative resource counters of one container at one instant.
///
/// CPU fields are monotonically increasing totals (nanoseconds); rates only
/// make sense as a delta between two snapshots of the same container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSnapshot {
    pub cpu_usage: u64,
    pub system_cpu_usage: u64,
    pub online_cpus: u32,
    pub memory_usage: u64,
    /// Memory sub-components by name (cgroup `memory.stat`), e.g. "cache".
    #[serde(default)]
    pub memory_stats: HashMap<String, u64>,
    pub memory_limit: u64,
    /// Block-I/O byte counters in the order the runtime reported them.
    #[serde(default)]
    pub blkio: Vec<BlkioEntry>,
    pub pids: u64,
}

/// Consecutive snapshots of one container. `previous` is `None` for the
/// first sample a collector sees.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotPair<'a> {
    pub previous: Option<&'a StatSnapshot>,
    pub current: &'a StatSnapshot,
}

impl<'a> SnapshotPair<'a> {
    pub fn new(previous: Option<&'a StatSnapshot>, current: &'a StatSnapshot) -> Self {
        Self { previous, current }
    }

    pub fn first(current: &'a StatSnapshot) -> Self {
        Self {
            previous: None,
            current,
        }
    }
}
