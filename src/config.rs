use crate::collector::CollectorOptions;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// Upper bound for `collector.max_concurrent_streams`.
pub const MAX_CONCURRENT_STREAMS: usize = 4096;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub collector: CollectorConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Snapshots decoded per container per cycle.
    pub samples_per_container: usize,
    pub read_timeout_ms: u64,
    /// Upper bound on stats streams open at once.
    pub max_concurrent_streams: usize,
    /// Publish the first reading of each container (CPU measured against zero counters).
    pub emit_first_sample: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            samples_per_container: 2,
            read_timeout_ms: 5_000,
            max_concurrent_streams: 32,
            emit_first_sample: false,
        }
    }
}

impl CollectorConfig {
    pub fn options(&self) -> CollectorOptions {
        CollectorOptions {
            sample_limit: self.samples_per_container,
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            emit_first_sample: self.emit_first_sample,
        }
    }
}

/// What happens after the first table is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    /// Print one table and exit.
    #[default]
    Once,
    /// Re-collect and reprint every `refresh_interval_ms` until interrupted.
    Watch,
    /// Print one table, then stay up until interrupted.
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: RefreshMode,
    pub refresh_interval_ms: u64,
    pub format: OutputFormat,
    /// Clear the terminal before each frame in watch mode.
    pub clear_screen: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: RefreshMode::Once,
            refresh_interval_ms: 2_000,
            format: OutputFormat::Table,
            clear_screen: true,
        }
    }
}

impl AppConfig {
    /// `CONFIG_FILE` if set (must exist), else `config.toml` when present,
    /// else built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = match std::env::var("CONFIG_FILE") {
            Ok(p) => p,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH.into(),
            Err(_) => return Ok(Self::default()),
        };
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.collector.samples_per_container > 0,
            "collector.samples_per_container must be > 0, got {}",
            self.collector.samples_per_container
        );
        anyhow::ensure!(
            self.collector.emit_first_sample || self.collector.samples_per_container >= 2,
            "collector.samples_per_container must be >= 2 when emit_first_sample is false, got {}",
            self.collector.samples_per_container
        );
        anyhow::ensure!(
            self.collector.read_timeout_ms > 0,
            "collector.read_timeout_ms must be > 0, got {}",
            self.collector.read_timeout_ms
        );
        anyhow::ensure!(
            self.collector.max_concurrent_streams > 0,
            "collector.max_concurrent_streams must be > 0, got {}",
            self.collector.max_concurrent_streams
        );
        anyhow::ensure!(
            self.collector.max_concurrent_streams <= MAX_CONCURRENT_STREAMS,
            "collector.max_concurrent_streams must be <= {}, got {}",
            MAX_CONCURRENT_STREAMS,
            self.collector.max_concurrent_streams
        );
        anyhow::ensure!(
            self.display.refresh_interval_ms > 0,
            "display.refresh_interval_ms must be > 0, got {}",
            self.display.refresh_interval_ms
        );
        Ok(())
    }
}
