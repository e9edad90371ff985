use crate::series::{Symbol, TimeSeriesPoint};

/// Renders the most recent observation as a Telegram-HTML fragment: bold
/// symbol header, then Open/Close/High/Low/Volume in that fixed order, with
/// the currency symbol on every price field. The market-cap line is appended
/// only when asked for and the point actually carries one.
///
/// Pure function; identical inputs produce byte-identical output.
pub fn format_quote(
    symbol: &Symbol,
    point: &TimeSeriesPoint,
    currency: &str,
    include_market_cap: bool,
) -> String {
    let mut text = format!(
        "<b>{symbol}</b>\n\
         Open: <em>{currency}{open}</em>\n\
         Close: <em>{currency}{close}</em>\n\
         High: <em>{currency}{high}</em>\n\
         Low: <em>{currency}{low}</em>\n\
         Volume: <em>{volume}</em>",
        open = point.open,
        close = point.close,
        high = point.high,
        low = point.low,
        volume = point.volume,
    );

    if include_market_cap && let Some(market_cap) = point.market_cap {
        text.push_str(&format!("\nMarket Cap: <em>{currency}{market_cap}</em>"));
    }

    text
}
