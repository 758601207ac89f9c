// Domain models: raw runtime snapshots in, display rows out

mod row;
mod snapshot;

pub use row::{MetricRow, SHORT_ID_LEN, short_id};
pub use snapshot::{BlkioEntry, ContainerIdentity, SnapshotPair, StatSnapshot};
