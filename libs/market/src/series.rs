use chrono::NaiveDateTime;

use crate::error::FetchError;

/// Normalized ticker or currency code derived from raw argument tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Joins tokens with single spaces and uppercases the result.
    /// An empty token list is rejected before any network call happens.
    pub fn from_tokens<'a, I>(tokens: I) -> Result<Self, FetchError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let joined = tokens.into_iter().collect::<Vec<_>>().join(" ");
        if joined.trim().is_empty() {
            return Err(FetchError::InvalidSymbol);
        }
        Ok(Self(joined.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    EquityIntraday,
    EquityDaily,
    CryptoIntraday,
    CryptoDaily,
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub symbol: Symbol,
    pub kind: FetchKind,
}

/// One observation. `market_cap` is only carried by crypto responses that
/// include the column.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub market_cap: Option<f64>,
}

/// Price observations ordered oldest to newest.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    /// The provider's own ordering is not trusted; points are re-sorted so
    /// that `latest` is always the chronologically last observation.
    pub fn from_unordered(mut points: Vec<TimeSeriesPoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self { points }
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn latest(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
