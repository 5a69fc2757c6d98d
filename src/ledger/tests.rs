//! Tests for the dedup ledger

use super::{DedupLedger, LEDGER_CAPACITY};
use crate::fingerprint::fingerprint;

#[test]
fn unseen_fingerprint_is_new() {
    let ledger = DedupLedger::new();
    assert!(ledger.is_new(&fingerprint(b"hello")));
}

#[test]
fn recorded_fingerprint_is_not_new() {
    let mut ledger = DedupLedger::new();
    let fp = fingerprint(b"hello");
    ledger.record(fp.clone());
    assert!(!ledger.is_new(&fp));
    assert_eq!(ledger.len(), 1);
}

#[test]
fn capacity_evicts_oldest_first() {
    let mut ledger = DedupLedger::new();
    let first = fingerprint(b"message 0");

    for i in 0..=LEDGER_CAPACITY {
        ledger.record(fingerprint(format!("message {}", i).as_bytes()));
    }

    assert_eq!(ledger.len(), LEDGER_CAPACITY);
    // the evicted first fingerprint counts as new again
    assert!(ledger.is_new(&first));
    // the remaining 30 are exactly messages 1..=30
    for i in 1..=LEDGER_CAPACITY {
        let fp = fingerprint(format!("message {}", i).as_bytes());
        assert!(!ledger.is_new(&fp), "message {} should still be present", i);
    }
}

#[test]
fn insertion_order_is_preserved() {
    let mut ledger = DedupLedger::new();
    let a = fingerprint(b"a");
    let b = fingerprint(b"b");
    ledger.record(a.clone());
    ledger.record(b.clone());
    assert_eq!(ledger.entries(), &[String::from(a), String::from(b)]);
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("last_messages.json");

    let mut ledger = DedupLedger::new();
    ledger.record(fingerprint(b"one"));
    ledger.record(fingerprint(b"two"));
    ledger.save(&path).unwrap();

    let loaded = DedupLedger::load(&path);
    assert_eq!(loaded, ledger);
}

#[test]
fn load_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = DedupLedger::load(dir.path().join("does_not_exist.json"));
    assert!(ledger.is_empty());
}

#[test]
fn load_invalid_json_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("last_messages.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(DedupLedger::load(&path).is_empty());
}

#[test]
fn load_truncates_oversized_file_keeping_most_recent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("last_messages.json");

    let entries: Vec<String> = (0..40).map(|i| format!("fp-{}", i)).collect();
    std::fs::write(&path, serde_json::to_string(&entries).unwrap()).unwrap();

    let ledger = DedupLedger::load(&path);
    assert_eq!(ledger.len(), LEDGER_CAPACITY);
    assert_eq!(ledger.entries()[0], "fp-10");
    assert_eq!(ledger.entries()[LEDGER_CAPACITY - 1], "fp-39");
}

#[test]
fn save_overwrites_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("last_messages.json");

    let mut ledger = DedupLedger::new();
    ledger.record(fingerprint(b"one"));
    ledger.save(&path).unwrap();

    ledger.record(fingerprint(b"two"));
    ledger.save(&path).unwrap();

    let loaded = DedupLedger::load(&path);
    assert_eq!(loaded.len(), 2);
}
