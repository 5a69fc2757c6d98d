//! Configuration management

use crate::types::{CaptureRegion, SourceFilter};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub bybit: BybitConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    /// Screen region to watch. Zero-sized until the user configures it.
    #[serde(default)]
    pub area: CaptureRegion,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token from @BotFather
    pub token: String,
    /// Destination chat ID
    pub chat_id: String,
}

impl TelegramConfig {
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.chat_id.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BybitConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    /// Trade against the testnet unless explicitly disabled
    #[serde(default = "default_true")]
    pub testnet: bool,
}

impl Default for BybitConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            testnet: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// Seconds between polling cycles (minimum 1)
    pub interval_secs: u64,
    /// Which segmentation policy the monitored channel uses
    pub source_filter: SourceFilter,
    /// Comma-separated keywords for the generic policy
    pub keywords: String,
    /// Comma-separated trigger keywords for the structured policy
    pub trigger_keywords: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            interval_secs: 2,
            source_filter: SourceFilter::Structured,
            keywords: "long,short,@".to_string(),
            trigger_keywords: "current trade".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    /// Shell command producing preprocessed image bytes on stdout.
    /// `{x}`, `{y}`, `{width}`, `{height}` are replaced with the region.
    pub command: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            command: "grim -g \"{x},{y} {width}x{height}\" -".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Tesseract binary name or path
    pub binary: String,
    /// Recognition language
    pub language: String,
    /// Page segmentation mode (6 = uniform block of text)
    pub psm: u8,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: "eng".to_string(),
            psm: 6,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Path of the persisted fingerprint history
    pub path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: "last_messages.json".to_string(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from file, with `ALERT_MONITOR_*` environment
    /// variables layered on top.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("config path is not valid UTF-8: {}", path.display()))?;

        let settings = config::Config::builder()
            .add_source(config::File::with_name(path_str))
            .add_source(config::Environment::with_prefix("ALERT_MONITOR").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    /// Load from default locations
    pub fn load_default() -> anyhow::Result<Self> {
        let paths = ["config.toml", "~/.config/alert-monitor/config.toml"];

        for path in paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::load(expanded.as_ref());
            }
        }

        anyhow::bail!("No configuration file found")
    }
}
