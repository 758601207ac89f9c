// One rendered line of the stats table

use serde::{Deserialize, Serialize};

/// Number of id characters shown, same as `docker ps`.
pub const SHORT_ID_LEN: usize = 12;

/// Display-ready metrics of one container, derived from a single
/// [`SnapshotPair`](super::SnapshotPair). Replaced, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRow {
    pub container_id: String,
    pub name: String,
    pub cpu_percent: f64,
    pub mem_usage: String,
    pub mem_limit: String,
    pub mem_percent: f64,
    pub block_input: String,
    pub block_output: String,
    pub pids: u64,
}

/// First [`SHORT_ID_LEN`] characters of a container id.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
