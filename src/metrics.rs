// Derive display metrics from raw container counters.
// Pure functions; every value comes from one container's SnapshotPair.

use crate::format::format_bytes;
use crate::models::{BlkioEntry, ContainerIdentity, MetricRow, SnapshotPair, StatSnapshot, short_id};

/// `memory_stats` key subtracted from usage (page cache is reclaimable).
pub const CACHE_KEY: &str = "cache";
pub const BLKIO_READ: &str = "Read";
pub const BLKIO_WRITE: &str = "Write";

/// CPU usage across all cores, `100.0` meaning one fully busy core.
///
/// Without a previous snapshot the delta is taken against zero counters.
/// Returns `0.0` when the system counter did not advance.
pub fn cpu_percent(pair: SnapshotPair<'_>) -> f64 {
    let (prev_cpu, prev_system) = pair
        .previous
        .map_or((0, 0), |p| (p.cpu_usage, p.system_cpu_usage));
    let cpu_delta = pair.current.cpu_usage as f64 - prev_cpu as f64;
    let system_delta = pair.current.system_cpu_usage as f64 - prev_system as f64;
    let cores = pair.current.online_cpus as f64;
    if system_delta <= 0.0 || cores <= 0.0 {
        return 0.0;
    }
    let percent = (cpu_delta / system_delta) * cores * 100.0;
    if percent.is_finite() { percent } else { 0.0 }
}

/// Resident usage minus page cache, saturating at zero.
pub fn mem_usage(s: &StatSnapshot) -> u64 {
    let cache = s.memory_stats.get(CACHE_KEY).copied().unwrap_or(0);
    s.memory_usage.saturating_sub(cache)
}

pub fn mem_limit(s: &StatSnapshot) -> u64 {
    s.memory_limit
}

/// Raw usage over limit; `0.0` for an unset (zero) limit.
pub fn mem_percent(s: &StatSnapshot) -> f64 {
    if s.memory_limit == 0 {
        return 0.0;
    }
    s.memory_usage as f64 / s.memory_limit as f64 * 100.0
}

/// Value of the first entry whose op matches `op` (ASCII case-insensitive),
/// or 0. Entries are not summed across devices.
pub fn blkio_value(entries: &[BlkioEntry], op: &str) -> u64 {
    entries
        .iter()
        .find(|e| e.op.eq_ignore_ascii_case(op))
        .map_or(0, |e| e.value)
}

pub fn block_input(s: &StatSnapshot) -> u64 {
    blkio_value(&s.blkio, BLKIO_READ)
}

pub fn block_output(s: &StatSnapshot) -> u64 {
    blkio_value(&s.blkio, BLKIO_WRITE)
}

/// Build the table row for `container` from one snapshot pair.
pub fn compute_row(container: &ContainerIdentity, pair: SnapshotPair<'_>) -> MetricRow {
    let current = pair.current;
    MetricRow {
        container_id: short_id(&container.id).to_string(),
        name: container.name.clone(),
        cpu_percent: cpu_percent(pair),
        mem_usage: format_bytes(mem_usage(current)),
        mem_limit: format_bytes(mem_limit(current)),
        mem_percent: mem_percent(current),
        block_input: format_bytes(block_input(current)),
        block_output: format_bytes(block_output(current)),
        pids: current.pids,
    }
}
