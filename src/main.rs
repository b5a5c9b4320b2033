//! kubeturbo-agent
//!
//! ```text
//! CLI flags ─▶ AgentConfig (TOML) ─▶ validate ─▶ init logging
//!                                          │
//!                      scaling bounds (JSON)┘─▶ ArcSwapOption<ClusterConfig>
//!                                                   ▲
//!                                 watcher (optional)┘
//!
//! SIGTERM/SIGINT ─▶ Shutdown ─▶ exit handler ─▶ disconnect ─▶ WaitGroup::done
//!                                                             │
//!                                              main waits ◀───┘ ─▶ exit
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use clap::Parser;

use kubeturbo_agent::config::validation::validate_config;
use kubeturbo_agent::config::watcher::ClusterConfigWatcher;
use kubeturbo_agent::config::{
    load_cluster_config, read_config, AgentConfig, ClusterConfig, ConfigError,
};
use kubeturbo_agent::lifecycle::{signals, Shutdown, WaitGroup};
use kubeturbo_agent::observability::init_logging;

#[derive(Parser)]
#[command(name = "kubeturbo-agent")]
#[command(about = "Cluster management agent", long_about = None)]
struct Cli {
    /// Agent configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scaling bounds file (JSON), overrides cluster.scaling_config_path.
    #[arg(long)]
    cluster_config: Option<PathBuf>,

    /// Log level, overrides observability.log_level.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => AgentConfig::default(),
    };
    if let Some(path) = cli.cluster_config {
        config = config.with_scaling_config_path(path);
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability)?;

    tracing::info!("kubeturbo-agent v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        address = %config.server.address,
        port = config.server.port,
        discovery_interval_secs = config.vmt.discovery_interval_secs,
        validation_workers = config.vmt.validation_workers,
        "Configuration loaded"
    );

    let bounds: Arc<ArcSwapOption<ClusterConfig>> = Arc::new(ArcSwapOption::empty());
    if let Some(path) = &config.cluster.scaling_config_path {
        let loaded = load_cluster_config(path)?;
        tracing::info!(
            path = %path.display(),
            min_nodes = loaded.min_nodes,
            max_nodes = loaded.max_nodes,
            "Cluster scaling bounds loaded"
        );
        bounds.store(Some(Arc::new(loaded)));
    }

    // Keep the watcher alive until exit.
    let _watcher = match (&config.cluster.scaling_config_path, config.cluster.watch) {
        (Some(path), true) => {
            let (watcher, mut updates) = ClusterConfigWatcher::new(path);
            let handle = watcher.run()?;
            let current = Arc::clone(&bounds);
            tokio::spawn(async move {
                while let Some(reloaded) = updates.recv().await {
                    current.store(Some(Arc::new(reloaded)));
                }
            });
            Some(handle)
        }
        _ => None,
    };

    let shutdown = Shutdown::new();
    let mut events = shutdown.subscribe();

    let completion = WaitGroup::new();
    let disconnect_bounds = Arc::clone(&bounds);
    let registration = signals::handle_exit(&completion, &shutdown, move || {
        tracing::info!(
            bounds = ?disconnect_bounds.load_full(),
            "Disconnecting from management server"
        );
    })?;

    tracing::info!("Agent running, waiting for termination signal");
    let _ = events.recv().await;

    let timeout = Duration::from_secs(config.shutdown.cleanup_timeout_secs);
    if !completion.wait_timeout(timeout).await {
        tracing::error!(timeout_secs = timeout.as_secs(), "Cleanup did not finish in time");
        return Err("cleanup timed out".into());
    }
    if let Some(err) = registration.failure() {
        return Err(err.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
