//! Content fingerprints for message dedup and frame change detection.

use sha2::{Digest, Sha256};
use std::fmt;

/// 128-bit content hash, lowercase hex.
///
/// Used identically for UTF-8 message text and raw preprocessed image
/// buffers. Fingerprints are only ever compared within a single ledger,
/// so the exact algorithm is an implementation detail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

/// Deterministic fingerprint of a byte buffer.
pub fn fingerprint(data: &[u8]) -> Fingerprint {
    let digest = Sha256::digest(data);
    Fingerprint(hex::encode(&digest[..16]))
}
