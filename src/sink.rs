// Shared latest-row-per-container map written by concurrent collectors

use crate::models::{ContainerIdentity, MetricRow};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Latest [`MetricRow`] per full container id. Cloning shares the map.
#[derive(Debug, Clone, Default)]
pub struct ResultSink {
    rows: Arc<RwLock<HashMap<String, MetricRow>>>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the row for `container_id`.
    pub async fn publish(&self, container_id: &str, row: MetricRow) {
        self.rows.write().await.insert(container_id.to_string(), row);
    }

    pub async fn get(&self, container_id: &str) -> Option<MetricRow> {
        self.rows.read().await.get(container_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Rows in inventory order; containers without a row are skipped.
    pub async fn ordered_rows(&self, order: &[ContainerIdentity]) -> Vec<MetricRow> {
        let rows = self.rows.read().await;
        order
            .iter()
            .filter_map(|c| rows.get(&c.id).cloned())
            .collect()
    }
}
