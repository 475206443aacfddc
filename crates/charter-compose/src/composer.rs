//! Chart composition: series, indicators and signal in, [`ChartSpec`] out.

use chrono::{DateTime, Utc};

use charter_config::{Config, ConfigError, IndicatorDisplayConfig, Palette, RenderConfig};
use charter_core::{Candle, OhlcvSeries, SignalData, SignalLevel};
use charter_indicators::{Bands, IndicatorSet};

use crate::camera::Camera;
use crate::error::ComposeError;
use crate::labels::resolve_label_positions;
use crate::layout::PlotArea;
use crate::scale::{decimals_for_step, guideline_prices, PriceRange};
use crate::spec::{
    BandFill, ChartSpec, LineOverlay, LineStyle, OverlayKind, PriceTick, SignalLine, Stroke,
    TimeTick,
};

/// Index tickers whose trailing `X` is part of the name.
const KEEP_TRAILING_X: [&str; 4] = ["DAX", "FTMX", "SPX", "NDX"];

/// Number of labelled ticks aimed for on the time axis.
const TARGET_TIME_TICKS: usize = 6;

/// Half the height of a signal label box, in pixels.
const LABEL_HALF_HEIGHT: f64 = 6.0;

const BAND_WIDTH: f64 = 1.0;
const VWAP_LINE_WIDTH: f64 = 1.5;
const ENTRY_WIDTH: f64 = 2.5;
const STOP_WIDTH: f64 = 2.0;
const TARGET_WIDTH: f64 = 2.0;

/// Everything one chart is built from.
#[derive(Debug, Clone, Copy)]
pub struct ComposeInput<'a> {
    pub symbol: &'a str,
    pub series: &'a OhlcvSeries,
    /// Indicators over the full series.
    pub indicators: &'a IndicatorSet,
    pub signal: Option<&'a SignalData>,
    /// Instant printed in the footer.
    pub generated_at: DateTime<Utc>,
}

/// Builds chart layouts. Holds configuration only, so one composer can
/// serve any number of requests.
#[derive(Debug, Clone)]
pub struct ChartComposer {
    render: RenderConfig,
    display: IndicatorDisplayConfig,
    palette: Palette,
}

impl ChartComposer {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::from_parts(
            config.render.clone(),
            config.indicators.clone(),
            config.style.palette()?,
        ))
    }

    pub fn from_parts(
        render: RenderConfig,
        display: IndicatorDisplayConfig,
        palette: Palette,
    ) -> Self {
        Self {
            render,
            display,
            palette,
        }
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    pub fn compose(&self, input: &ComposeInput<'_>) -> Result<ChartSpec, ComposeError> {
        let series = input.series;
        if series.is_empty() {
            return Err(ComposeError::EmptySeries);
        }
        check_aligned("Bollinger Bands", &input.indicators.bollinger, series.len())?;
        check_aligned("VWAP", &input.indicators.vwap, series.len())?;

        let window = series.tail_range(self.render.candles_to_show);
        let candles: Vec<Candle> = series.candles()[window.clone()].to_vec();

        // Only finite, strictly positive levels are drawn. A level at or
        // below zero means "not set" and must not widen the price range.
        let levels: Vec<(SignalLevel, f64)> = input
            .signal
            .map(|s| s.levels().to_vec())
            .unwrap_or_default()
            .into_iter()
            .filter(|(_, price)| price.is_finite() && *price > 0.0)
            .collect();

        let candle_range = PriceRange::of_candles(&candles).ok_or(ComposeError::EmptySeries)?;
        let price = levels
            .iter()
            .fold(candle_range, |range, (_, p)| range.include(*p))
            .with_margin(self.render.y_margin);

        let (width, height) = self.render.pixel_size();
        let camera = Camera::new(PlotArea::for_image(width, height), candles.len(), price);

        let (step, tick_prices) = guideline_prices(price);
        let decimals = decimals_for_step(step);
        let price_ticks = tick_prices
            .into_iter()
            .map(|p| PriceTick {
                price: p,
                y: camera.price_y(p),
                label: format!("{:.*}", decimals, p),
            })
            .collect();

        let bollinger = input.indicators.bollinger.clip(window.clone());
        let vwap = input.indicators.vwap.clip(window);
        let (band_fills, overlays) =
            self.overlays(&bollinger, &vwap, input.indicators.has_vwap());

        let signals = self.signal_lines(&camera, &levels, (decimals + 1).min(10));

        let title = match input.signal {
            Some(signal) => format!(
                "{} - {} Signal",
                clean_symbol(input.symbol),
                signal.signal_type.label()
            ),
            None => clean_symbol(input.symbol).to_string(),
        };
        let footer = self.render.show_timestamp.then(|| {
            input
                .generated_at
                .format("Generated: %Y-%m-%d %H:%M:%S UTC")
                .to_string()
        });

        log::debug!(
            "Composed {}: {} candles, {} overlays, {} signal levels, prices {:.6}..{:.6}",
            title,
            candles.len(),
            overlays.len(),
            signals.len(),
            price.min,
            price.max
        );

        Ok(ChartSpec {
            width,
            height,
            time_ticks: time_ticks(&camera, &candles),
            camera,
            palette: self.palette,
            title,
            footer,
            price_ticks,
            candles,
            band_fills,
            overlays,
            signals,
        })
    }

    fn overlays(
        &self,
        bollinger: &Bands,
        vwap: &Bands,
        has_vwap: bool,
    ) -> (Vec<BandFill>, Vec<LineOverlay>) {
        let mut fills = Vec::new();
        let mut lines = Vec::new();
        let band = Stroke::new(self.palette.bollinger, BAND_WIDTH, LineStyle::Dashed);
        let vwap_band = Stroke::new(self.palette.vwap, BAND_WIDTH, LineStyle::Dotted);

        if !bollinger.is_all_absent() {
            if self.display.show_band_fill {
                fills.push(BandFill {
                    upper: bollinger.upper.clone(),
                    lower: bollinger.lower.clone(),
                    color: self.palette.bollinger_fill,
                });
            }
            if self.display.show_bollinger {
                lines.push(line(OverlayKind::BollingerUpper, &bollinger.upper, band));
                lines.push(line(OverlayKind::BollingerLower, &bollinger.lower, band));
            }
            if self.display.show_bollinger_middle {
                let middle = Stroke::new(self.palette.bollinger, BAND_WIDTH, LineStyle::Solid);
                lines.push(line(OverlayKind::BollingerMiddle, &bollinger.center, middle));
            }
        }

        if has_vwap && !vwap.is_all_absent() {
            if self.display.show_vwap {
                lines.push(line(OverlayKind::VwapUpper, &vwap.upper, vwap_band));
                lines.push(line(OverlayKind::VwapLower, &vwap.lower, vwap_band));
            }
            if self.display.show_vwap_line {
                let center = Stroke::new(self.palette.vwap, VWAP_LINE_WIDTH, LineStyle::Solid);
                lines.push(line(OverlayKind::Vwap, &vwap.center, center));
            }
        }

        (fills, lines)
    }

    fn signal_lines(
        &self,
        camera: &Camera,
        levels: &[(SignalLevel, f64)],
        decimals: usize,
    ) -> Vec<SignalLine> {
        let anchors: Vec<(SignalLevel, f64)> = levels
            .iter()
            .map(|(level, p)| (*level, camera.price_y(*p)))
            .collect();
        let label_rows = resolve_label_positions(
            &anchors,
            self.render.label_spacing_px as f64,
            camera.plot.top + LABEL_HALF_HEIGHT,
            camera.plot.bottom - LABEL_HALF_HEIGHT,
        );

        levels
            .iter()
            .zip(anchors.iter().zip(label_rows))
            .map(|(&(level, price), (&(_, y), label_y))| SignalLine {
                level,
                price,
                y,
                stroke: self.signal_stroke(level),
                label: format!("{} {:.*}", level.label(), decimals, price),
                label_y,
            })
            .collect()
    }

    fn signal_stroke(&self, level: SignalLevel) -> Stroke {
        match level {
            SignalLevel::Entry => Stroke::new(self.palette.entry, ENTRY_WIDTH, LineStyle::Solid),
            SignalLevel::StopLoss => {
                Stroke::new(self.palette.stop_loss, STOP_WIDTH, LineStyle::Dashed)
            }
            SignalLevel::TakeProfit => {
                Stroke::new(self.palette.take_profit, TARGET_WIDTH, LineStyle::DashDot)
            }
        }
    }
}

fn line(kind: OverlayKind, values: &charter_core::TimeSeries<f64>, stroke: Stroke) -> LineOverlay {
    LineOverlay {
        kind,
        values: values.clone(),
        stroke,
    }
}

fn check_aligned(overlay: &'static str, bands: &Bands, expected: usize) -> Result<(), ComposeError> {
    if bands.len() != expected || bands.upper.len() != expected || bands.lower.len() != expected {
        return Err(ComposeError::Misaligned {
            overlay,
            expected,
            actual: bands.len(),
        });
    }
    Ok(())
}

/// Display name of a symbol: drops one trailing `X` except on index tickers.
pub fn clean_symbol(symbol: &str) -> &str {
    match symbol.strip_suffix('X') {
        Some(stripped) if !KEEP_TRAILING_X.contains(&symbol) => stripped,
        _ => symbol,
    }
}

fn time_ticks(camera: &Camera, candles: &[Candle]) -> Vec<TimeTick> {
    let step = candles.len().div_ceil(TARGET_TIME_TICKS).max(1);
    let intraday = match candles {
        [first, second, ..] => (second.timestamp - first.timestamp).num_seconds() < 86_400,
        _ => true,
    };
    let format = if intraday { "%m-%d %H:%M" } else { "%Y-%m-%d" };

    (0..candles.len())
        .step_by(step)
        .map(|slot| TimeTick {
            slot,
            x: camera.slot_x(slot),
            label: candles[slot].timestamp.format(format).to_string(),
        })
        .collect()
}
