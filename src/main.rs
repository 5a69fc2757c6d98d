//! Discord Alert Monitor
//!
//! Watches a screen region showing a Discord trade-alert channel, OCRs new
//! content, forwards fresh messages to Telegram and mirrors parsed trade
//! alerts to Bybit.

use alert_monitor::{
    capture::{CommandFrameSource, FrameSource},
    config::Config,
    exchange::{BybitTrader, ExchangeTrader, NoopTrader},
    ledger::DedupLedger,
    monitor::MonitorService,
    notify::TelegramNotifier,
    ocr::{OcrEngine, TesseractOcr},
    segment::Segmenter,
    trade::{format_trade, parse_trade},
};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "alert-monitor")]
#[command(about = "Screen monitor that relays Discord trade alerts to Telegram and Bybit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (defaults to config.toml, then ~/.config/alert-monitor/)
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the monitor loop
    Run {
        /// Dry run mode (no orders sent to the exchange)
        #[arg(long)]
        dry_run: bool,
    },
    /// Capture one frame, OCR it and print the segmented messages
    TestOcr,
    /// Parse a trade alert from a text file and print the extracted fields
    Parse {
        /// File holding one alert block
        file: String,
    },
    /// Show the persisted dedup ledger
    Ledger,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    match cli.command {
        Commands::Run { dry_run } => run_monitor(config, dry_run).await,
        Commands::TestOcr => test_ocr(config).await,
        Commands::Parse { file } => parse_file(&file),
        Commands::Ledger => show_ledger(config),
    }
}

async fn run_monitor(config: Config, dry_run: bool) -> anyhow::Result<()> {
    tracing::info!("Starting Discord alert monitor");

    if dry_run {
        tracing::warn!("Running in DRY RUN mode - no orders will reach the exchange");
    }

    let notifier = if config.telegram.is_configured() {
        TelegramNotifier::new(config.telegram.token.clone(), config.telegram.chat_id.clone())
    } else {
        TelegramNotifier::disabled()
    };

    let trader: Arc<dyn ExchangeTrader> =
        if dry_run || config.bybit.api_key.is_empty() || config.bybit.api_secret.is_empty() {
            Arc::new(NoopTrader)
        } else {
            Arc::new(BybitTrader::new(&config.bybit))
        };

    let source = Arc::new(CommandFrameSource::new(&config.capture));
    let ocr = Arc::new(TesseractOcr::new(&config.ocr));

    let service = MonitorService::new(config, source, ocr, Arc::new(notifier), trader);
    service.start().await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");
    service.stop().await;

    let stats = service.stats();
    tracing::info!(
        "Session: {} iterations, {} frames changed, {} messages, {} trades",
        stats.iterations,
        stats.frames_changed,
        stats.messages_notified,
        stats.trades_placed
    );

    Ok(())
}

async fn test_ocr(config: Config) -> anyhow::Result<()> {
    anyhow::ensure!(config.area.is_configured(), "no capture area configured");

    let source = CommandFrameSource::new(&config.capture);
    let ocr = TesseractOcr::new(&config.ocr);

    let frame = source.capture(&config.area).await?;
    println!("Captured {} bytes", frame.len());

    let text = ocr.extract_text(&frame).await?;
    println!("Recognized {} characters", text.chars().count());
    println!("\n--- Raw OCR output ---\n{}\n", text);

    let segmenter = Segmenter::new(
        config.monitoring.source_filter,
        &config.monitoring.keywords,
        &config.monitoring.trigger_keywords,
    );
    let blocks = segmenter.segment(&text);
    println!("--- {} segmented message(s) ---", blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        println!("\n[{}]\n{}", i + 1, block);
    }

    Ok(())
}

fn parse_file(path: &str) -> anyhow::Result<()> {
    let block = std::fs::read_to_string(path)?;
    let trade = parse_trade(&block);

    println!("Side:        {}", trade.side);
    println!("Limit order: {}", trade.is_limit_order);
    println!("\n{}", format_trade(&trade));

    Ok(())
}

fn show_ledger(config: Config) -> anyhow::Result<()> {
    let ledger = DedupLedger::load(&config.ledger.path);
    println!(
        "{} fingerprint(s) in {}",
        ledger.len(),
        config.ledger.path
    );
    for fp in ledger.entries() {
        println!("  {}", fp);
    }
    Ok(())
}
