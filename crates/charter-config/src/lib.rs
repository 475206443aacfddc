//! Configuration management for charter.
//!
//! Loads rendering, indicator and style settings from TOML files. Every
//! section is optional and falls back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use charter_core::{Rgba, StrategyParams};
use charter_indicators::VwapAnchor;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CHARTER_CONFIG";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid color for `{name}`: {value}")]
    InvalidColor { name: &'static str, value: String },
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    /// Fallback indicator parameters for requests that omit them.
    pub strategy: StrategyParams,
    pub indicators: IndicatorDisplayConfig,
    pub style: StyleConfig,
}

impl Config {
    /// Load and validate configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// Searches in order:
    /// 1. the file named by `$CHARTER_CONFIG`
    /// 2. `./charter.toml`
    /// 3. `~/.config/charter/config.toml`
    ///
    /// Returns default config if no usable file is found.
    pub fn load_default() -> Self {
        for path in Self::search_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("Ignoring config {}: {}", path.display(), e),
            }
        }

        log::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Candidate config files, highest priority first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
            paths.push(PathBuf::from(explicit));
        }
        paths.push(Self::default_path());
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("charter").join("config.toml"));
        }
        paths
    }

    /// Save configuration to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("charter.toml")
    }

    /// Check every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.render.validate()?;

        let strategy = &self.strategy;
        if strategy.bb_window == 0 {
            return Err(invalid("strategy.bb_window", "must be at least 1"));
        }
        if !(strategy.bb_std.is_finite() && strategy.bb_std > 0.0) {
            return Err(invalid("strategy.bb_std", "must be a positive number"));
        }
        if !(strategy.vwap_std.is_finite() && strategy.vwap_std > 0.0) {
            return Err(invalid("strategy.vwap_std", "must be a positive number"));
        }

        self.style.palette().map(|_| ())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

/// Output image and layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Figure width in inches.
    pub figure_width_in: f64,
    /// Figure height in inches.
    pub figure_height_in: f64,
    pub dpi: u32,
    /// Number of trailing candles in the visible window.
    pub candles_to_show: usize,
    /// Fraction of the price span added above and below the Y range.
    pub y_margin: f64,
    /// Minimum vertical distance between signal labels, in pixels.
    pub label_spacing_px: u32,
    /// Draw the "Generated: ..." footer.
    pub show_timestamp: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            figure_width_in: 12.0,
            figure_height_in: 8.0,
            dpi: 100,
            candles_to_show: 100,
            y_margin: 0.02,
            label_spacing_px: 18,
            show_timestamp: true,
        }
    }
}

/// Largest accepted image side, in pixels.
const MAX_SIDE_PX: u32 = 8192;

/// Smallest image side that leaves room for the axes.
const MIN_SIDE_PX: u32 = 200;

impl RenderConfig {
    /// Image size in pixels: figure size times dpi.
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |inches: f64| (inches * self.dpi as f64).round() as u32;
        (px(self.figure_width_in), px(self.figure_height_in))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, inches) in [
            ("render.figure_width_in", self.figure_width_in),
            ("render.figure_height_in", self.figure_height_in),
        ] {
            if !(inches.is_finite() && inches > 0.0) {
                return Err(invalid(field, "must be a positive number"));
            }
        }
        if self.dpi == 0 {
            return Err(invalid("render.dpi", "must be at least 1"));
        }

        let (width, height) = self.pixel_size();
        if !(MIN_SIDE_PX..=MAX_SIDE_PX).contains(&width)
            || !(MIN_SIDE_PX..=MAX_SIDE_PX).contains(&height)
        {
            return Err(ConfigError::Invalid {
                field: "render",
                reason: format!(
                    "image size {width}x{height} must be between {MIN_SIDE_PX} and {MAX_SIDE_PX} pixels per side"
                ),
            });
        }

        if self.candles_to_show == 0 {
            return Err(invalid("render.candles_to_show", "must be at least 1"));
        }
        if !(self.y_margin.is_finite() && (0.0..1.0).contains(&self.y_margin)) {
            return Err(invalid("render.y_margin", "must be in [0, 1)"));
        }
        Ok(())
    }
}

/// Which overlays are drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorDisplayConfig {
    /// Bollinger upper and lower bands.
    pub show_bollinger: bool,
    /// Bollinger middle line (moving average).
    pub show_bollinger_middle: bool,
    /// Shaded area between the Bollinger bands.
    pub show_band_fill: bool,
    /// VWAP upper and lower bands.
    pub show_vwap: bool,
    /// VWAP center line.
    pub show_vwap_line: bool,
    pub vwap_anchor: VwapAnchor,
}

impl Default for IndicatorDisplayConfig {
    fn default() -> Self {
        Self {
            show_bollinger: true,
            show_bollinger_middle: false,
            show_band_fill: true,
            show_vwap: true,
            show_vwap_line: false,
            vwap_anchor: VwapAnchor::Series,
        }
    }
}

/// Colors as `#rrggbb` or `#rrggbbaa` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub background: String,
    pub grid: String,
    pub axis: String,
    pub text: String,
    pub bullish: String,
    pub bearish: String,
    pub bollinger: String,
    pub bollinger_fill: String,
    pub vwap: String,
    pub entry: String,
    pub stop_loss: String,
    pub take_profit: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let p = Palette::default();
        Self {
            background: p.background.to_hex(),
            grid: p.grid.to_hex(),
            axis: p.axis.to_hex(),
            text: p.text.to_hex(),
            bullish: p.bullish.to_hex(),
            bearish: p.bearish.to_hex(),
            bollinger: p.bollinger.to_hex(),
            bollinger_fill: p.bollinger_fill.to_hex(),
            vwap: p.vwap.to_hex(),
            entry: p.entry.to_hex(),
            stop_loss: p.stop_loss.to_hex(),
            take_profit: p.take_profit.to_hex(),
        }
    }
}

impl StyleConfig {
    /// Parse every color.
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        let parse = |name: &'static str, value: &str| {
            Rgba::from_hex(value).ok_or_else(|| ConfigError::InvalidColor {
                name,
                value: value.to_string(),
            })
        };

        Ok(Palette {
            background: parse("background", &self.background)?,
            grid: parse("grid", &self.grid)?,
            axis: parse("axis", &self.axis)?,
            text: parse("text", &self.text)?,
            bullish: parse("bullish", &self.bullish)?,
            bearish: parse("bearish", &self.bearish)?,
            bollinger: parse("bollinger", &self.bollinger)?,
            bollinger_fill: parse("bollinger_fill", &self.bollinger_fill)?,
            vwap: parse("vwap", &self.vwap)?,
            entry: parse("entry", &self.entry)?,
            stop_loss: parse("stop_loss", &self.stop_loss)?,
            take_profit: parse("take_profit", &self.take_profit)?,
        })
    }
}

/// Resolved chart colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgba,
    pub grid: Rgba,
    pub axis: Rgba,
    pub text: Rgba,
    pub bullish: Rgba,
    pub bearish: Rgba,
    pub bollinger: Rgba,
    pub bollinger_fill: Rgba,
    pub vwap: Rgba,
    pub entry: Rgba,
    pub stop_loss: Rgba,
    pub take_profit: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            grid: Rgba::rgb(0xe0, 0xe0, 0xe0),
            axis: Rgba::BLACK,
            text: Rgba::BLACK,
            bullish: Rgba::new(0x26, 0xa6, 0x9a, 0xe6),
            bearish: Rgba::new(0xef, 0x53, 0x50, 0xe6),
            bollinger: Rgba::new(0x80, 0x80, 0x80, 0xb3),
            bollinger_fill: Rgba::new(0x80, 0x80, 0x80, 0x14),
            vwap: Rgba::new(0x99, 0x32, 0xcc, 0x99),
            entry: Rgba::new(0x1f, 0x77, 0xb4, 0xe6),
            stop_loss: Rgba::new(0xd6, 0x27, 0x28, 0xcc),
            take_profit: Rgba::new(0x2c, 0xa0, 0x2c, 0xcc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.pixel_size(), (1200, 800));
        assert_eq!(config.render.candles_to_show, 100);
        assert_eq!(config.strategy.bb_window, 20);
        assert_eq!(config.indicators.vwap_anchor, VwapAnchor::Series);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.background, Rgba::WHITE);
        assert_eq!(palette.bullish, Rgba::new(0x26, 0xa6, 0x9a, 0xe6));
        assert_eq!(palette.grid, Rgba::rgb(0xe0, 0xe0, 0xe0));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r##"
[render]
dpi = 50
candles_to_show = 60

[strategy]
bb_window = 14

[indicators]
show_vwap = false
vwap_anchor = "daily"

[style]
bullish = "#00ff00"
"##;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.render.pixel_size(), (600, 400));
        assert_eq!(config.render.candles_to_show, 60);
        assert_eq!(config.strategy.bb_window, 14);
        assert_eq!(config.strategy.bb_std, 2.0);
        assert!(!config.indicators.show_vwap);
        assert_eq!(config.indicators.vwap_anchor, VwapAnchor::Daily);
        assert_eq!(config.style.palette().unwrap().bullish, Rgba::rgb(0, 255, 0));
        assert_eq!(config.style.bearish, "#ef5350e6");
        assert_eq!(config.style.background, "#ffffff");
    }

    #[test]
    fn test_invalid_color_rejected() {
        let err = Config::from_toml("[style]\nentry = \"blue\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor { name: "entry", .. }));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_toml("[render]\ncandles_to_show = 0\n"),
            Err(ConfigError::Invalid { field: "render.candles_to_show", .. })
        ));
        assert!(matches!(
            Config::from_toml("[render]\ndpi = 10000\n"),
            Err(ConfigError::Invalid { field: "render", .. })
        ));
        assert!(matches!(
            Config::from_toml("[strategy]\nbb_std = -1.0\n"),
            Err(ConfigError::Invalid { field: "strategy.bb_std", .. })
        ));
        assert!(matches!(
            Config::from_toml("[render\n"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("charter-config-{}.toml", std::process::id()));
        let mut config = Config::default();
        config.render.candles_to_show = 42;
        config.indicators.show_band_fill = false;

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }
}
