//! Frame change detection
//!
//! OCR is the expensive call in the loop, so each captured frame is
//! fingerprinted and compared to the previous one; an unchanged screen
//! skips OCR entirely. No semantic understanding of the image content.

use crate::fingerprint::{fingerprint, Fingerprint};

#[derive(Debug, Default)]
pub struct ChangeDetector {
    last: Option<Fingerprint>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint the frame and report whether it differs from the
    /// previous observation. The first frame always counts as changed.
    pub fn observe(&mut self, frame: &[u8]) -> bool {
        let fp = fingerprint(frame);
        let changed = self.last.as_ref() != Some(&fp);
        self.last = Some(fp);
        changed
    }

    pub fn last_fingerprint(&self) -> Option<&Fingerprint> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_a_change() {
        let mut detector = ChangeDetector::new();
        assert!(detector.observe(b"frame-1"));
    }

    #[test]
    fn identical_frame_is_not_a_change() {
        let mut detector = ChangeDetector::new();
        detector.observe(b"frame-1");
        assert!(!detector.observe(b"frame-1"));
        assert!(!detector.observe(b"frame-1"));
    }

    #[test]
    fn modified_frame_is_a_change() {
        let mut detector = ChangeDetector::new();
        detector.observe(b"frame-1");
        assert!(detector.observe(b"frame-2"));
        // and flipping back counts again
        assert!(detector.observe(b"frame-1"));
    }

    #[test]
    fn carries_latest_fingerprint_forward() {
        let mut detector = ChangeDetector::new();
        assert!(detector.last_fingerprint().is_none());
        detector.observe(b"frame-1");
        let first = detector.last_fingerprint().cloned();
        detector.observe(b"frame-2");
        assert_ne!(detector.last_fingerprint().cloned(), first);
    }
}
