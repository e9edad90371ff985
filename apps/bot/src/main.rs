use std::sync::Arc;

use anyhow::{Context, Result};
use bot::{
    Data,
    command::{self, Command},
    config::{Config, Transport},
};
use market::{MarketClient, MarketData};
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let market: Arc<dyn MarketData> =
        Arc::new(MarketClient::from_env().context("init market client failed")?);
    let data = Arc::new(Data {
        market,
        style: config.style.clone(),
    });

    let bot = Bot::new(config.telegram_token.clone());

    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(command::answer);

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![data])
        .enable_ctrlc_handler()
        .build();

    match config.transport {
        Transport::Polling => {
            info!("starting dispatcher with long polling");
            dispatcher.dispatch().await;
        }
        Transport::Webhook { public_url, listen } => {
            info!(%public_url, %listen, "starting dispatcher with webhook listener");
            let listener = webhooks::axum(bot, webhooks::Options::new(listen, public_url))
                .await
                .context("failed to register webhook")?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("update listener error"),
                )
                .await;
        }
    }

    info!("shutdown complete");
    Ok(())
}
