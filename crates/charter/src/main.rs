//! Charter - trading signal chart generator.
//!
//! Usage:
//!   charter render <request.json|-> [--out FILE] [--base64] [--config FILE]
//!   charter csv <file.csv> --symbol SYM [--entry P --stop P --target P] [--side long|short]
//!               [--out FILE] [--base64] [--config FILE]
//!   charter json <candles.json> --symbol SYM [signal flags as for csv]
//!   charter demo [--count N] [--out FILE] [--base64] [--config FILE]
//!
//! Verbosity is controlled with `RUST_LOG`.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Duration, DurationRound, Utc};

use charter::{ChartRequest, ChartResponse, ChartService, Config};
use charter_core::{SignalData, SignalType};
use charter_data::{sample_candles, CsvLoader, DataSource, JsonLoader};

const DEFAULT_OUT: &str = "chart.png";
const DEFAULT_DEMO_COUNT: usize = 100;
const MAX_DEMO_COUNT: usize = 100_000;

/// Options shared by every command.
struct Options {
    out: PathBuf,
    base64: bool,
    config: Option<PathBuf>,
}

/// Arguments left after the shared options are taken out.
struct Args {
    positional: Vec<String>,
    flags: Vec<(String, String)>,
}

impl Args {
    fn value(&self, name: &str) -> Option<&str> {
        self.flags
            .iter()
            .find(|(flag, _)| flag == name)
            .map(|(_, value)| value.as_str())
    }

    fn parsed<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>> {
        self.value(name)
            .map(|raw| {
                raw.parse()
                    .map_err(|_| anyhow!("invalid value for --{name}: {raw}"))
            })
            .transpose()
    }
}

fn parse_args(raw: &[String]) -> Result<(Options, Args)> {
    let mut options = Options {
        out: PathBuf::from(DEFAULT_OUT),
        base64: false,
        config: None,
    };
    let mut args = Args {
        positional: Vec::new(),
        flags: Vec::new(),
    };

    let mut i = 0;
    while i < raw.len() {
        let arg = &raw[i];
        match arg.as_str() {
            "--base64" => options.base64 = true,
            flag if flag.starts_with("--") => {
                let value = raw
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("missing value for {flag}"))?
                    .clone();
                i += 1;
                match flag {
                    "--out" => options.out = PathBuf::from(value),
                    "--config" => options.config = Some(PathBuf::from(value)),
                    _ => args.flags.push((flag[2..].to_string(), value)),
                }
            }
            _ => args.positional.push(arg.clone()),
        }
        i += 1;
    }
    Ok((options, args))
}

fn print_usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("  {program} render <request.json|-> [--out FILE] [--base64] [--config FILE]");
    eprintln!(
        "  {program} csv <file.csv> --symbol SYM [--entry P --stop P --target P] [--side long|short] [--out FILE]"
    );
    eprintln!("  {program} json <candles.json> --symbol SYM [signal flags as for csv]");
    eprintln!("  {program} demo [--count N] [--out FILE]");
    eprintln!();
    eprintln!("PNG is written to --out (default: {DEFAULT_OUT}).");
    eprintln!("With --base64 the JSON response is printed to stdout instead.");
}

fn read_request(path: &str) -> Result<ChartRequest> {
    let json = if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {path}"))?
    };
    ChartRequest::from_json(&json).context("parsing chart request")
}

/// Build a request from candles loaded by `source` plus the signal flags.
fn loader_request(source: &dyn DataSource, args: &Args) -> Result<ChartRequest> {
    let symbol = args
        .value("symbol")
        .ok_or_else(|| anyhow!("--symbol is required"))?;
    let data = source.load().context("loading candles")?;
    let mut request = ChartRequest::new(symbol, data);

    let levels = (
        args.parsed::<f64>("entry")?,
        args.parsed::<f64>("stop")?,
        args.parsed::<f64>("target")?,
    );
    match levels {
        (Some(entry_price), Some(stop_loss), Some(take_profit)) => {
            let signal_type = match args.value("side").unwrap_or("long") {
                "long" => SignalType::Long,
                "short" => SignalType::Short,
                other => bail!("--side must be long or short, got {other}"),
            };
            request = request.with_signal(SignalData {
                entry_price,
                stop_loss,
                take_profit,
                signal_type,
            });
        }
        (None, None, None) => {}
        _ => bail!("--entry, --stop and --target must be given together"),
    }
    Ok(request)
}

fn file_arg<'a>(args: &'a Args, command: &str) -> Result<&'a str> {
    args.positional
        .get(1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{command} needs a file path"))
}

/// First candle time for `count` hourly candles ending at `now`.
fn demo_start(now: DateTime<Utc>, count: usize) -> Result<DateTime<Utc>> {
    if count > MAX_DEMO_COUNT {
        bail!("--count must be at most {MAX_DEMO_COUNT}, got {count}");
    }
    let span = i64::try_from(count)
        .ok()
        .and_then(Duration::try_hours)
        .ok_or_else(|| anyhow!("--count {count} is out of range"))?;
    let now = now.duration_trunc(Duration::hours(1))?;
    now.checked_sub_signed(span)
        .ok_or_else(|| anyhow!("--count {count} reaches before the earliest date"))
}

fn demo_request(args: &Args) -> Result<ChartRequest> {
    let count = args.parsed("count")?.unwrap_or(DEFAULT_DEMO_COUNT);
    let start = demo_start(Utc::now(), count)?;

    Ok(
        ChartRequest::new("EURUSD", sample_candles(count, start)).with_signal(SignalData {
            entry_price: 1.0600,
            stop_loss: 1.0550,
            take_profit: 1.0700,
            signal_type: SignalType::Long,
        }),
    )
}

fn run() -> Result<()> {
    env_logger::init();

    let raw: Vec<String> = env::args().collect();
    let program = raw.first().map(String::as_str).unwrap_or("charter");
    let (options, args) = parse_args(raw.get(1..).unwrap_or_default())?;

    let request = match args.positional.first().map(String::as_str) {
        Some("render") => {
            let path = args
                .positional
                .get(1)
                .ok_or_else(|| anyhow!("render needs a request file or -"))?;
            read_request(path)?
        }
        Some("csv") => loader_request(&CsvLoader::new(file_arg(&args, "csv")?), &args)?,
        Some("json") => loader_request(&JsonLoader::new(file_arg(&args, "json")?), &args)?,
        Some("demo") => demo_request(&args)?,
        _ => {
            print_usage(program);
            bail!("no command given");
        }
    };

    let config = match &options.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default(),
    };
    let service = ChartService::new(config)?;

    if options.base64 {
        let response: ChartResponse = service.respond(&request);
        println!("{}", response.to_json_pretty()?);
        if !response.success {
            bail!("chart generation failed");
        }
        return Ok(());
    }

    let chart = service.generate(&request)?;
    fs::write(&options.out, &chart.png)
        .with_context(|| format!("writing {}", options.out.display()))?;
    log::info!("Wrote {}", options.out.display());
    println!("{}", options.out.display());
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn args(raw: &[&str]) -> Args {
        let raw: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        parse_args(&raw).unwrap().1
    }

    #[test]
    fn test_demo_start_is_hour_aligned() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 45, 0).unwrap();
        let start = demo_start(now, 3).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_demo_count_out_of_range() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 0, 0).unwrap();
        assert!(demo_start(now, MAX_DEMO_COUNT).is_ok());
        assert!(demo_start(now, MAX_DEMO_COUNT + 1).is_err());
        assert!(demo_start(now, usize::MAX).is_err());
        assert!(demo_request(&args(&["demo", "--count", "18446744073709551615"])).is_err());
    }

    #[test]
    fn test_signal_flags_need_all_levels() {
        let path = std::env::temp_dir().join("charter_cli_levels.csv");
        std::fs::write(
            &path,
            "Timestamp,Open,High,Low,Close,Volume\n2024-01-01 00:00:00,1.0,1.1,0.9,1.05,10\n",
        )
        .unwrap();
        let source = CsvLoader::new(&path);

        let flags = args(&[
            "csv", "x", "--symbol", "EURUSD", "--entry", "1.0", "--stop", "1.1", "--target",
            "0.8", "--side", "short",
        ]);
        let request = loader_request(&source, &flags).unwrap();
        assert_eq!(request.data.len(), 1);
        let signal = request.signal_data.unwrap();
        assert_eq!(signal.signal_type, SignalType::Short);

        let partial = args(&["csv", "x", "--symbol", "EURUSD", "--entry", "1.0"]);
        assert!(loader_request(&source, &partial).is_err());
        assert!(loader_request(&source, &args(&["csv", "x"])).is_err());
        std::fs::remove_file(&path).ok();
    }
}
