use anyhow::Result;
use dockstat::config::{AppConfig, OutputFormat, RefreshMode};
use dockstat::docker_repo::DockerRepo;
use dockstat::orchestrator::Orchestrator;
use dockstat::presenter::{JsonPresenter, Presenter, TablePresenter};
use std::sync::Arc;
use tikv_jemallocator::Jemalloc;
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the table; logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = AppConfig::load()?;
    tracing::info!(
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        mode = ?app_config.display.mode,
        "starting"
    );

    let docker_repo = DockerRepo::connect()
        .await
        .map_err(|e| anyhow::anyhow!("docker daemon unreachable: {}", e))?;
    docker_repo
        .ping()
        .await
        .map_err(|e| anyhow::anyhow!("docker daemon unreachable: {}", e))?;
    tracing::info!(api_version = %docker_repo.api_version(), "connected to docker");
    let docker_repo = Arc::new(docker_repo);

    let orchestrator = Orchestrator::new(
        docker_repo.clone(),
        docker_repo,
        app_config.collector.options(),
        app_config.collector.max_concurrent_streams,
    );

    let display = &app_config.display;
    let clear_screen = display.clear_screen && display.mode == RefreshMode::Watch;
    let mut presenter: Box<dyn Presenter + Send> = match display.format {
        OutputFormat::Table => Box::new(TablePresenter::new(std::io::stdout(), clear_screen)),
        OutputFormat::Json => Box::new(JsonPresenter::new(std::io::stdout())),
    };

    match display.mode {
        RefreshMode::Once => {
            orchestrator.collect_and_render(presenter.as_mut()).await?;
        }
        RefreshMode::Hold => {
            orchestrator.collect_and_render(presenter.as_mut()).await?;
            shutdown_signal().await;
            tracing::info!("Received shutdown signal");
        }
        RefreshMode::Watch => {
            let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
            tokio::spawn(async move {
                shutdown_signal().await;
                tracing::info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
            });
            orchestrator
                .watch(
                    presenter.as_mut(),
                    Duration::from_millis(display.refresh_interval_ms),
                    shutdown_rx,
                )
                .await?;
        }
    }

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
