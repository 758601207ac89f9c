// Error taxonomy: inventory failures are fatal, stream failures stay per container

use thiserror::Error;

/// Listing containers failed; nothing can be monitored without it.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("docker list_containers: {0}")]
    Docker(#[from] bollard::errors::Error),
    #[error("container inventory unavailable: {0}")]
    Unavailable(String),
}

/// A single container's stats stream failed to open or broke mid-stream.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("docker stats: {0}")]
    Docker(#[from] bollard::errors::Error),
    #[error("malformed stats sample: {0}")]
    Decode(String),
    #[error("stats stream unavailable: {0}")]
    Unavailable(String),
}
