use charming::{
    Chart, ImageFormat, ImageRenderer,
    component::{Axis, Title},
    element::{AxisLabel, AxisType, LineStyle, SplitLine, Symbol, TextStyle},
    series::Line,
};

use crate::error::RenderError;
use crate::series::{TimeSeries, TimeSeriesPoint};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 600;

/// Which observation field a chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    Open,
    High,
    Low,
    Close,
    MarketCap,
}

impl ValueField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::MarketCap => "market cap",
        }
    }

    fn pick(self, point: &TimeSeriesPoint) -> Option<f64> {
        match self {
            Self::Open => Some(point.open),
            Self::High => Some(point.high),
            Self::Low => Some(point.low),
            Self::Close => Some(point.close),
            Self::MarketCap => point.market_cap,
        }
    }
}

/// Plots `field` against time as a single line and returns finalized PNG
/// bytes. Every call builds its own chart and renderer; no drawing state
/// survives the call. An empty series or a field absent from every point is
/// rejected before any drawing happens.
pub fn render_chart(
    series: &TimeSeries,
    field: ValueField,
    title: &str,
) -> Result<Vec<u8>, RenderError> {
    if series.is_empty() {
        return Err(RenderError::EmptySeries);
    }

    let mut stamps = Vec::with_capacity(series.len());
    let mut values = Vec::with_capacity(series.len());
    for point in series.points() {
        if let Some(value) = field.pick(point) {
            stamps.push(point.timestamp.format("%Y-%m-%d %H:%M").to_string());
            values.push(value);
        }
    }
    if values.is_empty() {
        return Err(RenderError::MissingField(field.label()));
    }

    let chart = Chart::new()
        .background_color("#ffffff")
        .title(
            Title::new()
                .text(title)
                .left("center")
                .top("2%")
                .text_style(TextStyle::new().color("#1f1f1f").font_size(14)),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(stamps)
                .axis_label(AxisLabel::new().rotate(45).interval(9).color("#555555")),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .scale(true)
                .axis_label(AxisLabel::new().color("#555555"))
                .split_line(SplitLine::new().line_style(LineStyle::new().color("#dddddd"))),
        )
        .series(
            Line::new()
                .name(field.label())
                .data(values)
                .symbol(Symbol::None)
                .line_style(LineStyle::new().width(2).color("#0064ff")),
        );

    let mut renderer = ImageRenderer::new(WIDTH, HEIGHT);
    renderer
        .render_format(ImageFormat::Png, &chart)
        .map_err(|e| RenderError::Backend(e.to_string()))
}
