//! Screen capture boundary
//!
//! Capture mechanics and image preprocessing live outside the core: the
//! monitor only needs "preprocessed image bytes for this region". The
//! default implementation shells out to a user-configured command so any
//! platform capture tool (grim, maim, screencapture, an ImageMagick
//! pipeline doing the grayscale/sharpen/invert pass) slots in unchanged.

use crate::config::CaptureConfig;
use crate::error::{MonitorError, Result};
use crate::types::CaptureRegion;
use async_trait::async_trait;
use tokio::process::Command;

/// Source of preprocessed frames for the monitored region.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn capture(&self, region: &CaptureRegion) -> Result<Vec<u8>>;
}

/// Runs the configured capture command and reads image bytes from stdout.
pub struct CommandFrameSource {
    command: String,
}

impl CommandFrameSource {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            command: config.command.clone(),
        }
    }
}

#[async_trait]
impl FrameSource for CommandFrameSource {
    async fn capture(&self, region: &CaptureRegion) -> Result<Vec<u8>> {
        let command = render_command(&self.command, region);

        let output = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .output()
            .await
            .map_err(|e| MonitorError::Capture(format!("failed to spawn `{}`: {}", command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MonitorError::Capture(format!(
                "capture command exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        if output.stdout.is_empty() {
            return Err(MonitorError::Capture("capture command produced no output".into()));
        }

        Ok(output.stdout)
    }
}

/// Substitute region placeholders into the capture command template.
fn render_command(template: &str, region: &CaptureRegion) -> String {
    template
        .replace("{x}", &region.x.to_string())
        .replace("{y}", &region.y.to_string())
        .replace("{width}", &region.width.to_string())
        .replace("{height}", &region.height.to_string())
}
