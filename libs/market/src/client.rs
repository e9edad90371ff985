use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::parse;
use crate::series::{FetchKind, FetchRequest, TimeSeries};

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
const INTRADAY_INTERVAL: &str = "1min";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Read access to quoted time series. The HTTP client implements this; tests
/// substitute their own.
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<TimeSeries, FetchError>;
}

#[derive(Clone)]
pub struct MarketClient {
    client: Client,
    base_url: String,
    api_key: String,
    exchange_suffix: String,
    crypto_market: String,
}

impl MarketClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        exchange_suffix: impl Into<String>,
        crypto_market: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            exchange_suffix: exchange_suffix.into(),
            crypto_market: crypto_market.into(),
        })
    }

    /// Expects ALPHAVANTAGE_API_KEY to be set; the remaining knobs default to
    /// the NSE/USD deployment.
    pub fn from_env() -> Result<Self> {
        use std::env;

        let api_key = env::var("ALPHAVANTAGE_API_KEY")
            .context("ALPHAVANTAGE_API_KEY environment variable not set")?;
        let base_url =
            env::var("ALPHAVANTAGE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let exchange_suffix = env::var("EXCHANGE_SUFFIX").unwrap_or_else(|_| ".NS".to_string());
        let crypto_market = env::var("CRYPTO_MARKET").unwrap_or_else(|_| "USD".to_string());

        Self::new(api_key, base_url, exchange_suffix, crypto_market)
    }

    /// Equity symbols go out with the exchange suffix appended; crypto
    /// symbols go out bare with the settlement market parameter instead.
    fn query(&self, request: &FetchRequest) -> Vec<(&'static str, String)> {
        let suffixed = || format!("{}{}", request.symbol, self.exchange_suffix);

        let mut params = match request.kind {
            FetchKind::EquityIntraday => vec![
                ("function", "TIME_SERIES_INTRADAY".to_string()),
                ("symbol", suffixed()),
                ("interval", INTRADAY_INTERVAL.to_string()),
                ("outputsize", "compact".to_string()),
            ],
            FetchKind::EquityDaily => vec![
                ("function", "TIME_SERIES_DAILY".to_string()),
                ("symbol", suffixed()),
                ("outputsize", "compact".to_string()),
            ],
            FetchKind::CryptoIntraday => vec![
                ("function", "DIGITAL_CURRENCY_INTRADAY".to_string()),
                ("symbol", request.symbol.as_str().to_string()),
                ("market", self.crypto_market.clone()),
            ],
            FetchKind::CryptoDaily => vec![
                ("function", "DIGITAL_CURRENCY_DAILY".to_string()),
                ("symbol", request.symbol.as_str().to_string()),
                ("market", self.crypto_market.clone()),
            ],
        };
        params.push(("apikey", self.api_key.clone()));
        params
    }
}

#[async_trait]
impl MarketData for MarketClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<TimeSeries, FetchError> {
        debug!(symbol = %request.symbol, kind = ?request.kind, "requesting time series");

        let body: Value = self
            .client
            .get(&self.base_url)
            .query(&self.query(request))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse::decode(request.kind, &self.crypto_market, &body)
    }
}
