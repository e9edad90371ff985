use std::sync::Arc;

use market::MarketData;

pub mod command;
pub mod config;

use config::QuoteStyle;

pub struct Data {
    pub market: Arc<dyn MarketData>,
    pub style: QuoteStyle,
}
