mod chart;
mod client;
mod error;
mod format;
mod parse;
mod series;

pub use chart::{ValueField, render_chart};
pub use client::{MarketClient, MarketData};
pub use error::{FetchError, RenderError};
pub use format::format_quote;
pub use series::{FetchKind, FetchRequest, Symbol, TimeSeries, TimeSeriesPoint};
