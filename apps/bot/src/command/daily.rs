use market::{FetchKind, FetchRequest, MarketData, Symbol, format_quote};
use tracing::warn;

use super::{ReplyPayload, usage_hint};
use crate::config::QuoteStyle;

pub(super) async fn run(market: &dyn MarketData, style: &QuoteStyle, args: &str) -> ReplyPayload {
    let symbol = match Symbol::from_tokens(args.split_whitespace()) {
        Ok(symbol) => symbol,
        Err(e) => {
            warn!(error = %e, "daily: invalid symbol input");
            return ReplyPayload::text(usage_hint("/daily"));
        }
    };

    let request = FetchRequest {
        symbol: symbol.clone(),
        kind: FetchKind::EquityDaily,
    };
    let series = match market.fetch(&request).await {
        Ok(series) => series,
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "daily: fetch failed");
            return ReplyPayload::text(usage_hint("/daily"));
        }
    };

    let Some(latest) = series.latest() else {
        warn!(symbol = %symbol, "daily: provider returned an empty series");
        return ReplyPayload::text(usage_hint("/daily"));
    };

    ReplyPayload::text(format_quote(&symbol, latest, &style.equity_currency, false))
}

#[cfg(test)]
mod tests {
    use market::{FetchError, FetchKind};

    use super::super::testutil::{StubMarket, point, single_point_series, style};
    use super::super::usage_hint;
    use super::*;

    #[tokio::test]
    async fn formats_the_most_recent_point_under_correct_labels() {
        let stub = StubMarket::new().on(
            FetchKind::EquityDaily,
            Ok(single_point_series(point(100.0, 105.0, 98.0, 102.0, 50000, None))),
        );

        let reply = run(&stub, &style(), "idfc").await;

        assert!(reply.image.is_none());
        assert!(reply.text.contains("<b>IDFC</b>"));
        assert!(reply.text.contains("Open: <em>₹100</em>"));
        assert!(reply.text.contains("Close: <em>₹102</em>"));
        assert!(reply.text.contains("High: <em>₹105</em>"));
        assert!(reply.text.contains("Low: <em>₹98</em>"));
        assert!(reply.text.contains("Volume: <em>50000</em>"));
        assert!(!reply.text.contains("Market Cap"));
    }

    #[tokio::test]
    async fn empty_arguments_short_circuit_before_any_fetch() {
        let stub = StubMarket::new();

        let reply = run(&stub, &style(), "   ").await;

        assert_eq!(reply.text, usage_hint("/daily"));
        assert!(reply.image.is_none());
        assert_eq!(stub.fetch_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_collapses_into_the_usage_hint() {
        let stub = StubMarket::new().on(
            FetchKind::EquityDaily,
            Err(FetchError::ProviderUnavailable("connection timed out".into())),
        );

        let reply = run(&stub, &style(), "idfc").await;

        assert_eq!(reply.text, usage_hint("/daily"));
        assert!(reply.image.is_none());
    }

    #[tokio::test]
    async fn identical_requests_yield_identical_text() {
        let stub = StubMarket::new().on(
            FetchKind::EquityDaily,
            Ok(single_point_series(point(100.0, 105.0, 98.0, 102.0, 50000, None))),
        );

        let first = run(&stub, &style(), "idfc").await;
        let second = run(&stub, &style(), "idfc").await;

        assert_eq!(first.text, second.text);
    }
}
