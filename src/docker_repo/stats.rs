// Convert the Docker stats API payload into a runtime-agnostic StatSnapshot.

use crate::error::StreamError;
use crate::models::{BlkioEntry, StatSnapshot};
use bollard::models::ContainerStatsResponse;

/// Map one Docker stats sample. `cpu_stats` is required; missing memory,
/// block-I/O or pids sections read as zero.
pub(crate) fn to_snapshot(s: &ContainerStatsResponse) -> Result<StatSnapshot, StreamError> {
    let cpu_stats = s
        .cpu_stats
        .as_ref()
        .ok_or_else(|| StreamError::Decode("missing cpu_stats".into()))?;
    let cpu_usage = cpu_stats.cpu_usage.as_ref();

    // cgroup v2 hosts report online_cpus but no per-cpu breakdown.
    let percpu_len = cpu_usage
        .and_then(|u| u.percpu_usage.as_ref())
        .map_or(0, |p| p.len() as u32);
    let online_cpus = cpu_stats
        .online_cpus
        .filter(|n| *n > 0)
        .unwrap_or(if percpu_len > 0 { percpu_len } else { 1 });

    let memory = s.memory_stats.as_ref();
    let blkio = s
        .blkio_stats
        .as_ref()
        .and_then(|b| b.io_service_bytes_recursive.as_ref())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| {
                    e.op.as_ref()
                        .map(|op| BlkioEntry::new(op.clone(), e.value.unwrap_or(0)))
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(StatSnapshot {
        cpu_usage: cpu_usage.and_then(|u| u.total_usage).unwrap_or(0),
        system_cpu_usage: cpu_stats.system_cpu_usage.unwrap_or(0),
        online_cpus,
        memory_usage: memory.and_then(|m| m.usage).unwrap_or(0),
        memory_stats: memory.and_then(|m| m.stats.clone()).unwrap_or_default(),
        memory_limit: memory.and_then(|m| m.limit).unwrap_or(0),
        blkio,
        pids: s.pids_stats.as_ref().and_then(|p| p.current).unwrap_or(0),
    })
}
