//! CrossWatch CLI — scan and eval commands.
//!
//! Commands:
//! - `scan` — run the multi-symbol scanner from a TOML config, once or in a loop
//! - `eval` — evaluate one symbol from a recorded candle JSON file

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crosswatch_core::domain::{Candle, Timeframe};
use crosswatch_core::{IndicatorConfig, IndicatorSnapshot, SignalCompositor, SignalConfig};
use crosswatch_scanner::notify::render_signal;
use crosswatch_scanner::{
    JsonDirSource, Notifier, RetryingSource, ScannerConfig, Scanner, StdoutNotifier,
    StdoutProgress, TelegramNotifier,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "crosswatch",
    about = "CrossWatch CLI — multi-timeframe candlestick signal scanner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scanner from a TOML config file.
    Scan {
        /// Path to the TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Run a single cycle and exit.
        #[arg(long, default_value_t = false)]
        once: bool,

        /// Override the candle data directory from the config.
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Evaluate one symbol from a candle JSON file.
    Eval {
        /// JSON file mapping timeframe labels to candle arrays.
        #[arg(long)]
        candles: PathBuf,

        /// Symbol name used in the report.
        #[arg(long, default_value = "UNKNOWN")]
        symbol: String,

        /// Optional TOML config; defaults apply without it.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            config,
            once,
            data_dir,
        } => run_scan(config, once, data_dir),
        Commands::Eval {
            candles,
            symbol,
            config,
        } => run_eval(candles, &symbol, config),
    }
}

fn run_scan(config_path: PathBuf, once: bool, data_dir: Option<PathBuf>) -> Result<()> {
    let mut config = ScannerConfig::from_file(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if let Some(dir) = data_dir {
        config.scanner.data_dir = dir;
    }
    if config.scanner.symbols.is_empty() {
        bail!("no symbols configured under [scanner]");
    }

    let source = RetryingSource::new(
        JsonDirSource::new(&config.scanner.data_dir),
        config.source.retry_policy(),
    );
    let scanner = Scanner::new(
        source,
        config.signal.clone(),
        config.indicators.clone(),
        config.scanner.candle_limit,
    );

    let notifiers: Vec<Box<dyn Notifier>> = vec![
        Box::new(StdoutNotifier),
        Box::new(TelegramNotifier::new(
            config.telegram.bot_token.clone(),
            config.telegram.chat_id.clone(),
        )),
    ];

    println!("CrossWatch scanner");
    println!("==================");
    println!("Symbols: {}", config.scanner.symbols.join(", "));
    println!(
        "Timeframes: {}",
        config
            .signal
            .required_timeframes()
            .iter()
            .map(|tf| tf.label())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Data dir: {}", config.scanner.data_dir.display());
    println!("State file: {}", config.scanner.state_file.display());
    if once {
        println!("Mode: single cycle");
    } else {
        println!("Mode: loop every {} seconds", config.scanner.loop_interval_secs);
    }

    let progress = StdoutProgress;
    let mut iteration = 0u64;
    loop {
        iteration += 1;
        println!(
            "\n=== Cycle #{iteration} — {} ===",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );

        scanner.run_cycle(
            &config.scanner.symbols,
            &config.scanner.state_file,
            &notifiers,
            &progress,
        )?;

        if once {
            return Ok(());
        }
        println!(
            "Waiting {} seconds before the next cycle...",
            config.scanner.loop_interval_secs
        );
        std::thread::sleep(std::time::Duration::from_secs(
            config.scanner.loop_interval_secs,
        ));
    }
}

fn run_eval(candles_path: PathBuf, symbol: &str, config_path: Option<PathBuf>) -> Result<()> {
    let (signal, indicators) = match config_path {
        Some(path) => {
            let config = ScannerConfig::from_file(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            (config.signal, config.indicators)
        }
        None => (SignalConfig::default(), IndicatorConfig::default()),
    };

    let content = std::fs::read_to_string(&candles_path)
        .with_context(|| format!("reading {}", candles_path.display()))?;
    let candles: BTreeMap<Timeframe, Vec<Candle>> = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", candles_path.display()))?;

    for tf in signal.required_timeframes() {
        if !candles.contains_key(&tf) {
            bail!("candle file is missing the required timeframe {tf}");
        }
    }

    let as_of = candles
        .get(&signal.cross_timeframe)
        .and_then(|series| series.last())
        .map(|candle| candle.open_time)
        .unwrap_or_else(chrono::Utc::now);

    let snapshot = IndicatorSnapshot::from_candles(as_of, &candles, &indicators);
    match SignalCompositor::new(signal).evaluate(&snapshot) {
        Some(record) => println!("{}", render_signal(symbol, &record)),
        None => println!("No signal for {symbol}."),
    }
    Ok(())
}
