//! Monitor loop orchestration
//!
//! Ties the pipeline together: capture a frame, skip unchanged screens,
//! OCR, segment, dedup-filter, notify, trade, persist the ledger. One
//! background worker per session; start/stop is cooperative and observed
//! between iterations, never mid-OCR.


use crate::capture::FrameSource;
use crate::config::Config;
use crate::detect::ChangeDetector;
use crate::error::{MonitorError, Result};
use crate::exchange::{ExchangeTrader, OrderType};
use crate::fingerprint::fingerprint;
use crate::ledger::DedupLedger;
use crate::notify::{self, NotifySink};
use crate::ocr::OcrEngine;
use crate::segment::Segmenter;
use crate::trade::parse_trade;
use crate::types::EntryTrade;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Delay before retrying after a failed iteration.
const FALLBACK_DELAY: Duration = Duration::from_secs(5);

/// How long `stop` waits for the worker before abandoning it.
const STOP_GRACE: Duration = Duration::from_secs(5);

/// Pause after a market order so the position registers before SL/TP.
const MARKET_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Substring marking a block as a parseable trade alert.
const TRADE_MARKER: &str = "Current Trade";

/// Counters the control surface reads for display.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub iterations: u64,
    pub frames_changed: u64,
    pub messages_notified: u64,
    pub trades_placed: u64,
}

/// Mutable state owned by one monitor session's worker.
struct SessionState {
    ledger: DedupLedger,
    detector: ChangeDetector,
    first_message_suppressed: bool,
}

/// Background monitor for one configured screen region.
pub struct MonitorService {
    config: Config,
    source: Arc<dyn FrameSource>,
    ocr: Arc<dyn OcrEngine>,
    notifier: Arc<dyn NotifySink>,
    trader: Arc<dyn ExchangeTrader>,
    running: Arc<RwLock<bool>>,
    stats: Arc<parking_lot::RwLock<SessionStats>>,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl MonitorService {
    pub fn new(
        config: Config,
        source: Arc<dyn FrameSource>,
        ocr: Arc<dyn OcrEngine>,
        notifier: Arc<dyn NotifySink>,
        trader: Arc<dyn ExchangeTrader>,
    ) -> Self {
        Self {
            config,
            source,
            ocr,
            notifier,
            trader,
            running: Arc::new(RwLock::new(false)),
            stats: Arc::new(parking_lot::RwLock::new(SessionStats::default())),
            worker: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the background worker. Starting an already-running monitor is
    /// a warned no-op.
    pub async fn start(&self) -> Result<()> {
        if !self.config.area.is_configured() {
            return Err(MonitorError::Config(
                "no capture area configured".to_string(),
            ));
        }
        if !self.config.telegram.is_configured() {
            return Err(MonitorError::Config(
                "telegram credentials not configured".to_string(),
            ));
        }

        {
            let mut running = self.running.write().await;
            if *running {
                warn!("monitor already running");
                return Ok(());
            }
            *running = true;
        }

        let service = self.clone_for_task();
        let handle = tokio::spawn(async move {
            service.run_loop().await;
        });
        *self.worker.lock().await = Some(handle);

        info!("monitor started");
        Ok(())
    }

    /// Request a stop and wait for the worker, bounded by a grace timeout.
    /// The flag is observed between iterations; a worker stuck in an
    /// external call is abandoned after the grace period.
    pub async fn stop(&self) {
        {
            let mut running = self.running.write().await;
            if !*running {
                warn!("monitor not running");
                return;
            }
            *running = false;
        }

        let handle = self.worker.lock().await.take();
        if let Some(handle) = handle {
            if tokio::time::timeout(STOP_GRACE, handle).await.is_err() {
                warn!("monitor worker did not stop within {:?}, abandoning it", STOP_GRACE);
            }
        }

        info!("monitor stopped");
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    pub fn stats(&self) -> SessionStats {
        self.stats.read().clone()
    }

    /// Clone for spawning the worker task (shares Arc references)
    fn clone_for_task(&self) -> Self {
        Self {
            config: self.config.clone(),
            source: Arc::clone(&self.source),
            ocr: Arc::clone(&self.ocr),
            notifier: Arc::clone(&self.notifier),
            trader: Arc::clone(&self.trader),
            running: Arc::clone(&self.running),
            stats: Arc::clone(&self.stats),
            worker: Arc::clone(&self.worker),
        }
    }

    async fn run_loop(&self) {
        let mut session = SessionState {
            ledger: DedupLedger::load(&self.config.ledger.path),
            detector: ChangeDetector::new(),
            first_message_suppressed: false,
        };
        let segmenter = Segmenter::new(
            self.config.monitoring.source_filter,
            &self.config.monitoring.keywords,
            &self.config.monitoring.trigger_keywords,
        );
        let interval = Duration::from_secs(self.config.monitoring.interval_secs.max(1));

        while *self.running.read().await {
            match self.run_iteration(&segmenter, &mut session).await {
                Ok(()) => tokio::time::sleep(interval).await,
                Err(e) => {
                    error!("monitor iteration failed: {}", e);
                    tokio::time::sleep(FALLBACK_DELAY).await;
                }
            }
        }

        debug!("monitor loop exited");
    }

    /// One polling cycle: capture, change-detect, OCR, segment, then
    /// process each candidate block in segmentation order.
    async fn run_iteration(&self, segmenter: &Segmenter, session: &mut SessionState) -> Result<()> {
        self.stats.write().iterations += 1;

        let frame = self.source.capture(&self.config.area).await?;
        if !session.detector.observe(&frame) {
            return Ok(());
        }
        self.stats.write().frames_changed += 1;

        let text = self.ocr.extract_text(&frame).await?;
        if text.trim().is_empty() {
            return Ok(());
        }

        for block in segmenter.segment(&text) {
            let fp = fingerprint(block.as_bytes());
            if !session.ledger.is_new(&fp) {
                continue;
            }

            if !session.first_message_suppressed {
                // whatever was already on screen at session start is stale;
                // drop it without recording so a genuine repost still lands
                session.first_message_suppressed = true;
                debug!("suppressing first message of session: {}", preview(&block));
                continue;
            }

            info!("new message detected: {}", preview(&block));
            match self.notifier.notify(&notify::frame_alert(&block)).await {
                Ok(()) => self.stats.write().messages_notified += 1,
                Err(e) => error!("notification failed: {}", e),
            }

            if block.contains(TRADE_MARKER) {
                let trade = parse_trade(&block);
                self.execute_trade(&trade).await;
            }

            session.ledger.record(fp);
            if let Err(e) = session.ledger.save(&self.config.ledger.path) {
                error!("failed to persist ledger: {}", e);
            }
        }

        Ok(())
    }

    /// Forward a parsed trade to the exchange. Failures are logged and
    /// reported, never retried within the cycle.
    async fn execute_trade(&self, trade: &EntryTrade) {
        if trade.token_name.is_empty() {
            warn!("trade alert without token name, skipping order");
            return;
        }

        let symbol = format!("{}USDT", trade.token_name);
        let qty = trade.bought_amount.to_string();
        let (order_type, price) = if trade.is_limit_order {
            (OrderType::Limit, Some(trade.entry_price.to_string()))
        } else {
            (OrderType::Market, None)
        };

        let receipt = match self
            .trader
            .place_order(&symbol, trade.side, &qty, order_type, price.as_deref())
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                error!("order placement failed for {}: {}", symbol, e);
                return;
            }
        };
        info!("{} order placed for {}: {}", order_type, symbol, receipt.order_id);
        self.stats.write().trades_placed += 1;

        if order_type == OrderType::Market {
            tokio::time::sleep(MARKET_SETTLE_DELAY).await;
        }

        let stop_loss = trade.stop_loss.as_order_value();
        let take_profit = trade.take_profit.as_order_value();
        if stop_loss.is_some() || take_profit.is_some() {
            if let Err(e) = self
                .trader
                .set_stop_loss_take_profit(&symbol, stop_loss.as_deref(), take_profit.as_deref())
                .await
            {
                error!("failed to set SL/TP for {}: {}", symbol, e);
            }
        }

        if let Err(e) = self.notifier.notify(&notify::frame_trade(trade)).await {
            error!("trade notification failed: {}", e);
        }
    }
}

/// First characters of a block for log lines, newlines flattened.
fn preview(block: &str) -> String {
    let flat = block.replace('\n', " ");
    if flat.chars().count() > 50 {
        let cut: String = flat.chars().take(50).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}
