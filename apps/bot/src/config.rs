use std::env::var;
use std::net::SocketAddr;

use anyhow::{Context, Result, bail};
use url::Url;

#[derive(Clone)]
pub struct Config {
    pub telegram_token: String,
    pub transport: Transport,
    pub style: QuoteStyle,
}

/// How updates reach the bot: long polling (default) or a webhook listener
/// behind a public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Polling,
    Webhook { public_url: Url, listen: SocketAddr },
}

/// Display prefixes for quoted values. Equities trade in the exchange-local
/// currency; crypto quotes follow the configured settlement market.
#[derive(Clone)]
pub struct QuoteStyle {
    pub equity_currency: String,
    pub crypto_currency: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let telegram_token =
            var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN not set")?;

        let mode = var("TRANSPORT_MODE").unwrap_or_else(|_| "polling".to_string());
        let port = match var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a port number")?,
            Err(_) => 8443,
        };
        let public_url = var("WEBHOOK_PUBLIC_URL").ok();
        let transport = Transport::from_parts(&mode, public_url.as_deref(), port)?;

        Ok(Self {
            telegram_token,
            transport,
            style: QuoteStyle::from_env(),
        })
    }
}

impl Transport {
    pub fn from_parts(mode: &str, public_url: Option<&str>, port: u16) -> Result<Self> {
        match mode {
            "polling" => Ok(Self::Polling),
            "webhook" => {
                let raw = public_url.context("WEBHOOK_PUBLIC_URL not set")?;
                let public_url = Url::parse(raw)
                    .with_context(|| format!("invalid WEBHOOK_PUBLIC_URL {raw:?}"))?;
                Ok(Self::Webhook {
                    public_url,
                    listen: SocketAddr::from(([0, 0, 0, 0], port)),
                })
            }
            other => bail!("unknown TRANSPORT_MODE {other:?}, expected polling or webhook"),
        }
    }
}

impl QuoteStyle {
    pub fn from_env() -> Self {
        Self {
            equity_currency: var("EQUITY_CURRENCY_SYMBOL").unwrap_or_else(|_| "₹".to_string()),
            crypto_currency: var("CRYPTO_CURRENCY_SYMBOL").unwrap_or_else(|_| "$".to_string()),
        }
    }
}
