//! Binary entry point: validate, connect, poll until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};

use rss_notifier::config::Config;
use rss_notifier::notify::{DiscordClient, Notifier};
use rss_notifier::poll::Poller;
use rss_notifier::source::RssSource;
use rss_notifier::{logging, supervisor};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real deployments set the variables directly.
    let _ = dotenvy::dotenv();
    logging::init();
    supervisor::install_panic_hook();

    if let Err(e) = run().await {
        tracing::error!("❌ {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // -- validate ------------------------------------------------------------
    let config = Config::from_env()?;
    tracing::info!("✅ Environment variables validated");

    // -- connect -------------------------------------------------------------
    let http = reqwest::Client::new();
    let discord = Arc::new(DiscordClient::new(http.clone(), config.token.as_str()));
    let bot = discord.login().await.context("Discord login failed")?;
    tracing::info!("✅ Bot connected as {}", bot.tag());
    tracing::info!(
        "📢 Checking RSS every {} seconds",
        config.check_interval.as_secs_f64()
    );

    // -- poll ----------------------------------------------------------------
    let source = Arc::new(RssSource::new(http, config.feed_url.as_str(), "RSS"));
    let notifier = Notifier::new(discord, config.channel_id.as_str());
    let mut poller = Poller::new(source, notifier, config.check_interval);
    poller.start();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    if poller.is_running() {
        tracing::info!("🛑 Shutting down");
        poller.stop();
    }
    Ok(())
}
