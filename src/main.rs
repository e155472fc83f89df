use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use shopshot_lib::infrastructure::discord::DiscordPublisher;
use shopshot_lib::infrastructure::logging::init_logging;
use shopshot_lib::{AppConfig, Scheduler, ShopPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path).await?;
    init_logging(&config.logging)?;
    info!("Shopshot starting (config: {})", config_path.display());

    let token = std::env::var(&config.chat.token_env).with_context(|| {
        format!(
            "Missing bot token in environment variable {}",
            config.chat.token_env
        )
    })?;
    if config.chat.channel_id == 0 {
        anyhow::bail!(
            "chat.channel_id is not configured; edit {}",
            config_path.display()
        );
    }

    let pipeline = Arc::new(ShopPipeline::new(&config)?);
    let publisher = Arc::new(DiscordPublisher::new(token, config.chat.channel_id)?);
    let cancel = CancellationToken::new();

    let scheduler = Scheduler::new(
        Arc::clone(&pipeline),
        publisher,
        Duration::from_secs(config.schedule.interval_seconds),
        cancel.clone(),
    );
    let handle = scheduler.spawn();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown requested, stopping scheduler");
    cancel.cancel();
    if let Err(e) = handle.await {
        warn!("Scheduler task ended abnormally: {e}");
    }

    Ok(())
}
