//! Data source trait definition.

use std::path::{Path, PathBuf};

use crate::raw::RawCandle;

/// Trait for types that can load raw candle records.
///
/// This trait uses `anyhow::Result` for flexible error handling.
pub trait DataSource {
    fn load(&self) -> anyhow::Result<Vec<RawCandle>>;
}

/// Loads a JSON array of candle objects, the same shape as a request's `data`.
pub struct JsonLoader {
    path: PathBuf,
}

impl JsonLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DataSource for JsonLoader {
    fn load(&self) -> anyhow::Result<Vec<RawCandle>> {
        let content = std::fs::read_to_string(&self.path)?;
        let candles: Vec<RawCandle> = serde_json::from_str(&content)?;
        log::info!(
            "Loaded {} candle records from {}",
            candles.len(),
            self.path.display()
        );
        Ok(candles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::CsvLoader;
    use crate::sample::sample_candles;
    use chrono::{TimeZone, Utc};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("charter-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_json_loader_reads_request_data_shape() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles = sample_candles(25, start);
        let path = temp_path("candles.json");
        std::fs::write(&path, serde_json::to_string(&candles).unwrap()).unwrap();

        let loaded = JsonLoader::new(&path).load().unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, candles);
    }

    #[test]
    fn test_json_loader_errors() {
        assert!(JsonLoader::new(temp_path("missing.json")).load().is_err());

        let path = temp_path("object.json");
        std::fs::write(&path, r#"{"symbol": "EURUSD"}"#).unwrap();
        let result = JsonLoader::new(&path).load();
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_loaders_behind_trait_object() {
        let csv_path = temp_path("candles.csv");
        std::fs::write(
            &csv_path,
            "Timestamp,Open,High,Low,Close,Volume\n2024-01-01 00:00:00,1.0,1.1,0.9,1.05,10\n",
        )
        .unwrap();
        let json_path = temp_path("candles-one.json");
        std::fs::write(
            &json_path,
            r#"[{"timestamp": "2024-01-01 00:00:00", "open": 1.0, "high": 1.1, "low": 0.9, "close": 1.05, "volume": 10}]"#,
        )
        .unwrap();

        let sources: Vec<Box<dyn DataSource>> = vec![
            Box::new(CsvLoader::new(&csv_path)),
            Box::new(JsonLoader::new(&json_path)),
        ];
        let loaded: Vec<Vec<RawCandle>> = sources.iter().map(|s| s.load().unwrap()).collect();
        std::fs::remove_file(&csv_path).ok();
        std::fs::remove_file(&json_path).ok();

        assert_eq!(loaded[0].len(), 1);
        assert_eq!(loaded[1].len(), 1);
        assert_eq!(loaded[0][0].close, Some(1.05));
        assert_eq!(loaded[0][0].close, loaded[1][0].close);
        assert_eq!(loaded[0][0].volume, loaded[1][0].volume);
    }
}
