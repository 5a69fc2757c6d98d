//! OCR boundary
//!
//! The engine itself is external; this wrapper pipes preprocessed image
//! bytes through the tesseract binary and hands back the raw text for
//! segmentation. No accuracy guarantees and no correction attempts.

use crate::config::OcrConfig;
use crate::error::{MonitorError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Extract text from a preprocessed image buffer. A blank result is
    /// normal (empty region, capture glitch) and not an error.
    async fn extract_text(&self, image: &[u8]) -> Result<String>;
}

/// Tesseract invoked as a child process, stdin to stdout.
pub struct TesseractOcr {
    binary: String,
    language: String,
    psm: u8,
}

impl TesseractOcr {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            language: config.language.clone(),
            psm: config.psm,
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn extract_text(&self, image: &[u8]) -> Result<String> {
        let mut child = Command::new(&self.binary)
            .arg("stdin")
            .arg("stdout")
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg(self.psm.to_string())
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| MonitorError::Ocr(format!("failed to spawn {}: {}", self.binary, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(image)
                .await
                .map_err(|e| MonitorError::Ocr(format!("failed to feed image: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| MonitorError::Ocr(format!("{} did not finish: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MonitorError::Ocr(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
