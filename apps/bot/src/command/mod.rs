mod crypto;
mod daily;
mod graph;
mod help;

use std::sync::Arc;

use market::{RenderError, TimeSeries, ValueField, render_chart};
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};
use teloxide::utils::command::BotCommands;

use crate::Data;

#[derive(BotCommands, Debug, Clone, PartialEq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "show usage help")]
    Start,
    #[command(description = "show usage help")]
    Help,
    #[command(description = "intraday (1 min) price graph for a listed company")]
    Graph(String),
    #[command(description = "daily open, close, high, low and volume for a listed company")]
    Daily(String),
    #[command(description = "intraday price graph and daily summary for a cryptocurrency")]
    Crypto(String),
}

/// The single unit handed back to the transport per command invocation.
/// Failures are always text-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyPayload {
    pub text: String,
    pub image: Option<Vec<u8>>,
}

impl ReplyPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }
}

pub async fn dispatch(cmd: Command, data: &Data) -> ReplyPayload {
    match cmd {
        Command::Start | Command::Help => help::usage(),
        Command::Graph(args) => graph::run(data.market.as_ref(), &args).await,
        Command::Daily(args) => daily::run(data.market.as_ref(), &data.style, &args).await,
        Command::Crypto(args) => crypto::run(data.market.as_ref(), &data.style, &args).await,
    }
}

pub async fn answer(bot: Bot, msg: Message, cmd: Command, data: Arc<Data>) -> ResponseResult<()> {
    let reply = dispatch(cmd, &data).await;

    if let Some(png) = reply.image {
        bot.send_photo(msg.chat.id, InputFile::memory(png).file_name("chart.png"))
            .await?;
    }
    if !reply.text.is_empty() {
        bot.send_message(msg.chat.id, reply.text)
            .parse_mode(ParseMode::Html)
            .await?;
    }

    Ok(())
}

/// The fixed per-command hint every failure collapses into; the underlying
/// cause only goes to the log.
pub(crate) fn usage_hint(command: &str) -> String {
    format!(
        "You probably used the incorrect format for the command.\n\
         Use {command} <pre>SYMBOL</pre>\n\
         For more info, please check /help"
    )
}

/// Chart rendering rasterizes off the async executor.
pub(crate) async fn render_blocking(
    series: TimeSeries,
    field: ValueField,
    title: String,
) -> Result<Vec<u8>, RenderError> {
    match tokio::task::spawn_blocking(move || render_chart(&series, field, &title)).await {
        Ok(result) => result,
        Err(join) => Err(RenderError::Backend(join.to_string())),
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};
    use market::{FetchError, FetchKind, FetchRequest, MarketData, TimeSeries, TimeSeriesPoint};

    use crate::config::QuoteStyle;

    pub(crate) struct StubMarket {
        responses: Mutex<HashMap<FetchKind, Result<TimeSeries, FetchError>>>,
        calls: AtomicUsize,
    }

    impl StubMarket {
        pub(crate) fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn on(self, kind: FetchKind, response: Result<TimeSeries, FetchError>) -> Self {
            self.responses.lock().unwrap().insert(kind, response);
            self
        }

        pub(crate) fn fetch_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketData for StubMarket {
        async fn fetch(&self, request: &FetchRequest) -> Result<TimeSeries, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .get(&request.kind)
                .cloned()
                .unwrap_or_else(|| {
                    Err(FetchError::ProviderUnavailable("no stubbed response".into()))
                })
        }
    }

    pub(crate) fn point(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
        market_cap: Option<f64>,
    ) -> TimeSeriesPoint {
        TimeSeriesPoint {
            timestamp: NaiveDate::from_ymd_opt(2021, 3, 1)
                .unwrap()
                .and_time(NaiveTime::MIN),
            open,
            high,
            low,
            close,
            volume,
            market_cap,
        }
    }

    pub(crate) fn single_point_series(point: TimeSeriesPoint) -> TimeSeries {
        TimeSeries::from_unordered(vec![point])
    }

    pub(crate) fn style() -> QuoteStyle {
        QuoteStyle {
            equity_currency: "₹".to_string(),
            crypto_currency: "$".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::testutil::{StubMarket, style};
    use super::*;

    #[test]
    fn command_text_parses_into_the_fixed_table() {
        assert_eq!(
            Command::parse("/daily idfc first bank", "testbot").unwrap(),
            Command::Daily("idfc first bank".to_string())
        );
        assert_eq!(
            Command::parse("/graph IDFC", "testbot").unwrap(),
            Command::Graph("IDFC".to_string())
        );
        assert_eq!(
            Command::parse("/crypto btc", "testbot").unwrap(),
            Command::Crypto("btc".to_string())
        );
        assert_eq!(Command::parse("/start", "testbot").unwrap(), Command::Start);
    }

    #[tokio::test]
    async fn start_and_help_route_to_the_same_usage_summary() {
        let data = Data {
            market: Arc::new(StubMarket::new()),
            style: style(),
        };

        let start = dispatch(Command::Start, &data).await;
        let help = dispatch(Command::Help, &data).await;

        assert_eq!(start, help);
        assert!(start.image.is_none());
        assert!(start.text.contains("/daily"));
        assert!(start.text.contains("/graph"));
        assert!(start.text.contains("/crypto"));
    }
}
