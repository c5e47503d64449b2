//! slircbot - Straylight chat bot
//!
//! Usage: `slircbot [config.toml]`

use slirc_bot::config::Config;
use slirc_bot::store::{CommandStore, spawn_autosave};
use slirc_bot::supervisor::Supervisor;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        user = %config.identity.username,
        channel = %config.identity.channel(),
        host = %config.server.host,
        "Starting slircbot"
    );

    // Load commands; only a missing file is recoverable
    let store = CommandStore::new(&config.storage.path, config.commands.default_cooldown());
    let registry = store
        .load_or_default()
        .map_err(|e| {
            error!(path = %config.storage.path, error = %e, "Failed to load commands");
            e
        })?
        .into_shared();

    let stop = CancellationToken::new();

    // Periodic save
    let autosave = spawn_autosave(
        store.clone(),
        registry.clone(),
        config.storage.save_interval(),
        stop.clone(),
    );
    info!(
        interval_secs = config.storage.save_interval_secs,
        "Periodic save task started"
    );

    // Ctrl-C stops the bot
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl-C");
                return;
            }
            info!("Shutdown requested");
            stop.cancel();
        });
    }

    let mut supervisor = Supervisor::new(&config, registry.clone(), stop.clone())?;
    let result = supervisor.run().await;

    stop.cancel();
    if let Err(e) = autosave.await {
        warn!(error = %e, "Periodic save task ended abnormally");
    }

    // Final save
    match store.save_shared(&registry) {
        Ok(()) => info!(path = %config.storage.path, "Commands saved"),
        Err(e) => error!(path = %config.storage.path, error = %e, "Final save failed"),
    }

    result?;
    Ok(())
}
