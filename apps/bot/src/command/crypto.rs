use market::{FetchKind, FetchRequest, MarketData, Symbol, ValueField, format_quote};
use tracing::warn;

use super::{ReplyPayload, render_blocking, usage_hint};
use crate::config::QuoteStyle;

/// Two provider calls: the daily series feeds the summary and decides
/// success; the intraday series feeds the chart and only degrades the reply
/// to text when its leg fails.
pub(super) async fn run(market: &dyn MarketData, style: &QuoteStyle, args: &str) -> ReplyPayload {
    let symbol = match Symbol::from_tokens(args.split_whitespace()) {
        Ok(symbol) => symbol,
        Err(e) => {
            warn!(error = %e, "crypto: invalid symbol input");
            return ReplyPayload::text(usage_hint("/crypto"));
        }
    };

    let daily_request = FetchRequest {
        symbol: symbol.clone(),
        kind: FetchKind::CryptoDaily,
    };
    let daily = match market.fetch(&daily_request).await {
        Ok(series) => series,
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "crypto: daily fetch failed");
            return ReplyPayload::text(usage_hint("/crypto"));
        }
    };
    let Some(latest) = daily.latest() else {
        warn!(symbol = %symbol, "crypto: provider returned an empty daily series");
        return ReplyPayload::text(usage_hint("/crypto"));
    };
    let text = format_quote(&symbol, latest, &style.crypto_currency, true);

    let intraday_request = FetchRequest {
        symbol: symbol.clone(),
        kind: FetchKind::CryptoIntraday,
    };
    let image = match market.fetch(&intraday_request).await {
        Ok(series) => {
            let title = format!("Intraday price for {symbol}");
            match render_blocking(series, ValueField::Close, title).await {
                Ok(png) => Some(png),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "crypto: render failed, replying text-only");
                    None
                }
            }
        }
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "crypto: intraday fetch failed, replying text-only");
            None
        }
    };

    ReplyPayload { text, image }
}

#[cfg(test)]
mod tests {
    use market::{FetchError, FetchKind};

    use super::super::testutil::{StubMarket, point, single_point_series, style};
    use super::super::usage_hint;
    use super::*;

    fn daily_series() -> market::TimeSeries {
        single_point_series(point(
            48000.0,
            49500.0,
            47000.0,
            49000.0,
            3255,
            Some(912000000000.0),
        ))
    }

    fn intraday_series() -> market::TimeSeries {
        single_point_series(point(48750.0, 48750.0, 48750.0, 48750.0, 17, None))
    }

    #[tokio::test]
    async fn both_legs_succeeding_reply_with_chart_and_summary() {
        let stub = StubMarket::new()
            .on(FetchKind::CryptoDaily, Ok(daily_series()))
            .on(FetchKind::CryptoIntraday, Ok(intraday_series()));

        let reply = run(&stub, &style(), "btc").await;

        assert!(reply.text.contains("<b>BTC</b>"));
        assert!(reply.text.contains("Market Cap: <em>$912000000000</em>"));
        assert!(reply.image.is_some());
        assert_eq!(stub.fetch_count(), 2);
    }

    #[tokio::test]
    async fn failing_chart_leg_degrades_to_text_only() {
        let stub = StubMarket::new()
            .on(FetchKind::CryptoDaily, Ok(daily_series()))
            .on(
                FetchKind::CryptoIntraday,
                Err(FetchError::ProviderUnavailable("connection timed out".into())),
            );

        let reply = run(&stub, &style(), "btc").await;

        assert!(reply.text.contains("<b>BTC</b>"));
        assert!(reply.image.is_none());
        assert_eq!(stub.fetch_count(), 2);
    }

    #[tokio::test]
    async fn failing_daily_leg_fails_the_whole_command() {
        let stub = StubMarket::new()
            .on(FetchKind::CryptoDaily, Err(FetchError::InvalidSymbol))
            .on(FetchKind::CryptoIntraday, Ok(intraday_series()));

        let reply = run(&stub, &style(), "btc").await;

        assert_eq!(reply.text, usage_hint("/crypto"));
        assert!(reply.image.is_none());
    }

    #[tokio::test]
    async fn empty_arguments_short_circuit_before_any_fetch() {
        let stub = StubMarket::new();

        let reply = run(&stub, &style(), "").await;

        assert_eq!(reply.text, usage_hint("/crypto"));
        assert_eq!(stub.fetch_count(), 0);
    }
}
