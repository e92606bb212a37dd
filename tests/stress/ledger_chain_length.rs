//! Stress test: long ledgers replay and verify to the same head.

use std::collections::HashSet;

use lucidia_kernel::ledger::{chain_hash, GENESIS_HASH};
use lucidia_kernel::Ledger;
use serde_json::json;

#[test]
fn stress_5k_appends_replay_to_same_head() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("ledger.jsonl");

    let head = {
        let ledger = Ledger::open(&path).unwrap();
        let mut head = GENESIS_HASH.to_string();
        for i in 0..5_000 {
            head = ledger
                .append(&json!({"step": i, "value": i as f64 * 0.001}))
                .unwrap();
        }
        assert_eq!(ledger.count(), 5_000);
        head
    };

    let reopened = Ledger::open(&path).unwrap();
    assert_eq!(reopened.fingerprint(), head);
    assert_eq!(reopened.count(), 5_000);
    assert!(reopened.verify().unwrap().intact);
}

#[test]
fn stress_chain_hashes_unique() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = Ledger::open(tmp.path().join("ledger.jsonl")).unwrap();
    let mut seen = HashSet::new();

    // Identical records still yield distinct hashes because each one folds
    // in the previous head.
    for i in 0..1_000 {
        let hash = ledger.append(&json!({"same": true})).unwrap();
        assert!(seen.insert(hash), "duplicate chain hash at entry {i}");
    }
}

#[test]
fn stress_entries_match_manual_chain() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = Ledger::open(tmp.path().join("ledger.jsonl")).unwrap();
    for i in 0..200 {
        ledger.append(&json!({"i": i})).unwrap();
    }

    let mut prev = GENESIS_HASH.to_string();
    for entry in ledger.entries().unwrap() {
        prev = chain_hash(&prev, &entry.canonical);
        assert_eq!(entry.hash, prev);
    }
    assert_eq!(prev, ledger.fingerprint());
}
