use market::{FetchKind, FetchRequest, MarketData, Symbol, ValueField};
use tracing::warn;

use super::{ReplyPayload, render_blocking, usage_hint};

pub(super) async fn run(market: &dyn MarketData, args: &str) -> ReplyPayload {
    let symbol = match Symbol::from_tokens(args.split_whitespace()) {
        Ok(symbol) => symbol,
        Err(e) => {
            warn!(error = %e, "graph: invalid symbol input");
            return ReplyPayload::text(usage_hint("/graph"));
        }
    };

    let request = FetchRequest {
        symbol: symbol.clone(),
        kind: FetchKind::EquityIntraday,
    };
    let series = match market.fetch(&request).await {
        Ok(series) => series,
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "graph: intraday fetch failed");
            return ReplyPayload::text(usage_hint("/graph"));
        }
    };

    let title = format!("Intraday price for {symbol} (1 min)");
    match render_blocking(series, ValueField::Close, title).await {
        Ok(png) => ReplyPayload {
            text: String::new(),
            image: Some(png),
        },
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "graph: render failed");
            ReplyPayload::text(usage_hint("/graph"))
        }
    }
}
