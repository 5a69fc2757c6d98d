//! Dedup ledger
//!
//! Bounded FIFO history of message fingerprints already notified. Persisted
//! as a JSON array of strings so a restart does not replay the whole
//! on-screen backlog. Eviction means a long-gone message can resurface as
//! "new"; that is the accepted cost of bounded memory.

#[cfg(test)]
mod tests;

use crate::error::Result;
use crate::fingerprint::Fingerprint;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Maximum number of fingerprints kept; oldest evicted first.
pub const LEDGER_CAPACITY: usize = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupLedger {
    entries: Vec<String>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Membership test: true if this fingerprint has not been seen.
    pub fn is_new(&self, fp: &Fingerprint) -> bool {
        !self.entries.iter().any(|seen| seen == fp.as_str())
    }

    /// Append a fingerprint, evicting the oldest entries past capacity.
    pub fn record(&mut self, fp: Fingerprint) {
        self.entries.push(fp.into());
        if self.entries.len() > LEDGER_CAPACITY {
            let excess = self.entries.len() - LEDGER_CAPACITY;
            self.entries.drain(..excess);
        }
    }

    /// Load the persisted ledger. A missing or unreadable file means an
    /// empty ledger, never an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => {
                info!("no ledger file at {}, starting empty", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(mut entries) => {
                if entries.len() > LEDGER_CAPACITY {
                    let excess = entries.len() - LEDGER_CAPACITY;
                    entries.drain(..excess);
                }
                debug!("loaded {} fingerprints from {}", entries.len(), path.display());
                Self { entries }
            }
            Err(e) => {
                warn!("ledger file {} is invalid, starting empty: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Persist as a whole-file overwrite. Callers log-and-ignore failures;
    /// the worst case is one duplicate notification after a crash.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
