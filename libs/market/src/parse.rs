use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Map, Value};

use crate::error::FetchError;
use crate::series::{FetchKind, TimeSeries, TimeSeriesPoint};

const EQUITY_INTRADAY_KEY: &str = "Time Series (1min)";
const EQUITY_DAILY_KEY: &str = "Time Series (Daily)";
const CRYPTO_INTRADAY_KEY: &str = "Time Series (Digital Currency Intraday)";
const CRYPTO_DAILY_KEY: &str = "Time Series (Digital Currency Daily)";

// The provider denominates market cap in USD regardless of the market param.
const CRYPTO_DAILY_CAP_LABEL: &str = "6. market cap (USD)";
const CRYPTO_INTRADAY_CAP_LABEL: &str = "3. market cap (USD)";

pub(crate) fn decode(kind: FetchKind, market: &str, body: &Value) -> Result<TimeSeries, FetchError> {
    if let Some(fault) = provider_fault(body) {
        return Err(fault);
    }

    match kind {
        FetchKind::EquityIntraday => equity_series(body, EQUITY_INTRADAY_KEY),
        FetchKind::EquityDaily => equity_series(body, EQUITY_DAILY_KEY),
        FetchKind::CryptoIntraday => crypto_intraday_series(body, market),
        FetchKind::CryptoDaily => crypto_daily_series(body, market),
    }
}

/// Provider-level faults arrive as a 200 with a sentinel field instead of a
/// series: `Error Message` for unknown symbols, `Note`/`Information` for
/// throttling notices.
fn provider_fault(body: &Value) -> Option<FetchError> {
    if body.get("Error Message").is_some() {
        return Some(FetchError::InvalidSymbol);
    }
    if let Some(note) = body
        .get("Note")
        .or_else(|| body.get("Information"))
        .and_then(Value::as_str)
    {
        return Some(FetchError::ProviderUnavailable(note.to_string()));
    }
    None
}

fn series_rows<'a>(body: &'a Value, key: &str) -> Result<&'a Map<String, Value>, FetchError> {
    let rows = body
        .get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| FetchError::UnexpectedShape(format!("missing series object {key:?}")))?;
    if rows.is_empty() {
        return Err(FetchError::InvalidSymbol);
    }
    Ok(rows)
}

fn equity_series(body: &Value, key: &str) -> Result<TimeSeries, FetchError> {
    let rows = series_rows(body, key)?;

    let mut points = Vec::with_capacity(rows.len());
    for (stamp, row) in rows {
        points.push(TimeSeriesPoint {
            timestamp: parse_stamp(stamp)?,
            open: field_f64(row, "1. open")?,
            high: field_f64(row, "2. high")?,
            low: field_f64(row, "3. low")?,
            close: field_f64(row, "4. close")?,
            volume: field_u64(row, "5. volume")?,
            market_cap: None,
        });
    }
    Ok(TimeSeries::from_unordered(points))
}

/// Crypto rows have shipped both with and without a market-cap column. The
/// shape is resolved once from the first row and applied to the whole
/// response, instead of being re-inferred per field access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CryptoShape {
    WithMarketCap,
    WithoutMarketCap,
}

impl CryptoShape {
    fn detect(row: &Value, cap_label: &str) -> Self {
        if row.get(cap_label).is_some() {
            Self::WithMarketCap
        } else {
            Self::WithoutMarketCap
        }
    }

    fn market_cap(self, row: &Value, cap_label: &str) -> Result<Option<f64>, FetchError> {
        match self {
            Self::WithMarketCap => field_f64(row, cap_label).map(Some),
            Self::WithoutMarketCap => Ok(None),
        }
    }
}

fn crypto_daily_series(body: &Value, market: &str) -> Result<TimeSeries, FetchError> {
    let rows = series_rows(body, CRYPTO_DAILY_KEY)?;

    let open_label = format!("1a. open ({market})");
    let high_label = format!("2a. high ({market})");
    let low_label = format!("3a. low ({market})");
    let close_label = format!("4a. close ({market})");

    let Some(probe) = rows.values().next() else {
        return Err(FetchError::InvalidSymbol);
    };
    let shape = CryptoShape::detect(probe, CRYPTO_DAILY_CAP_LABEL);

    let mut points = Vec::with_capacity(rows.len());
    for (stamp, row) in rows {
        points.push(TimeSeriesPoint {
            timestamp: parse_stamp(stamp)?,
            open: field_f64(row, &open_label)?,
            high: field_f64(row, &high_label)?,
            low: field_f64(row, &low_label)?,
            close: field_f64(row, &close_label)?,
            volume: field_u64(row, "5. volume")?,
            market_cap: shape.market_cap(row, CRYPTO_DAILY_CAP_LABEL)?,
        });
    }
    Ok(TimeSeries::from_unordered(points))
}

fn crypto_intraday_series(body: &Value, market: &str) -> Result<TimeSeries, FetchError> {
    let rows = series_rows(body, CRYPTO_INTRADAY_KEY)?;

    let price_label = format!("1a. price ({market})");

    let Some(probe) = rows.values().next() else {
        return Err(FetchError::InvalidSymbol);
    };
    let shape = CryptoShape::detect(probe, CRYPTO_INTRADAY_CAP_LABEL);

    let mut points = Vec::with_capacity(rows.len());
    for (stamp, row) in rows {
        // Intraday crypto rows carry a single price; it fills all four
        // normalized OHLC fields.
        let price = field_f64(row, &price_label)?;
        points.push(TimeSeriesPoint {
            timestamp: parse_stamp(stamp)?,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: field_u64(row, "2. volume")?,
            market_cap: shape.market_cap(row, CRYPTO_INTRADAY_CAP_LABEL)?,
        });
    }
    Ok(TimeSeries::from_unordered(points))
}

fn parse_stamp(raw: &str) -> Result<NaiveDateTime, FetchError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|_| FetchError::UnexpectedShape(format!("unparseable timestamp {raw:?}")))
}

fn field_value<'a>(row: &'a Value, label: &str) -> Result<&'a Value, FetchError> {
    row.get(label)
        .ok_or_else(|| FetchError::UnexpectedShape(format!("missing field {label:?}")))
}

fn field_f64(row: &Value, label: &str) -> Result<f64, FetchError> {
    let parsed = match field_value(row, label)? {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| FetchError::UnexpectedShape(format!("non-numeric field {label:?}")))
}

fn field_u64(row: &Value, label: &str) -> Result<u64, FetchError> {
    let parsed = match field_value(row, label)? {
        // Crypto volumes can be fractional; truncate to whole units.
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| s.parse::<f64>().ok().map(|v| v as u64))
        }
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|v| v as u64)),
        _ => None,
    };
    parsed.ok_or_else(|| FetchError::UnexpectedShape(format!("non-numeric field {label:?}")))
}
