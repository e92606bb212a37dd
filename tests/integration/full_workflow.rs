//! End-to-end workflow: compute signals, checkpoint them into the ledger,
//! fold them into the continuity fingerprint, and audit everything back.

use std::sync::Arc;

use lucidia_kernel::continuity::fingerprint_of;
use lucidia_kernel::signal::{render_break, truthstream};
use lucidia_kernel::{
    Breath, ContinuityTracker, ContradictionLog, Fragment, InfinityAccumulator, KernelConfig,
    Ledger, ManualClock, SignalInputs, SignalReport, GENESIS_HASH,
};

fn fixture() -> (Breath, Vec<Fragment>) {
    let breath = Breath::new(vec![0.2, 0.3, 0.1, 0.0, -0.1, -0.2, -0.15, 0.05, 0.2, 0.25]);
    let fragments = vec![
        Fragment::new("x1", 0.9).with_mirror(-0.8).with_emotion(0.7),
        Fragment::new("x2", -0.6).with_mirror(0.6).with_emotion(-0.3),
        Fragment::new("x3", 0.4).with_emotion(0.2),
    ];
    (breath, fragments)
}

#[test]
fn workflow_fixture_metrics_are_bit_reproducible() {
    let (breath, fragments) = fixture();
    let t1 = truthstream(&fragments, &breath);
    let r1 = render_break(&fragments, 10);

    let (breath, fragments) = fixture();
    let t2 = truthstream(&fragments, &breath);
    let r2 = render_break(&fragments, 10);

    assert_eq!(t1.to_bits(), t2.to_bits());
    assert_eq!(r1.to_bits(), r2.to_bits());
}

#[test]
fn workflow_checkpoint_signals_into_ledger_and_continuity() {
    let tmp = tempfile::tempdir().unwrap();
    let config = KernelConfig::with_root(tmp.path());
    let clock = Arc::new(ManualClock::new(1_700_000_000.0));

    let ledger = Ledger::open(&config.ledger_file).unwrap();
    let tracker = ContinuityTracker::with_clock(&config.continuity_file, clock.clone()).unwrap();
    assert_eq!(ledger.fingerprint(), GENESIS_HASH);
    assert!(!tracker.amnesia_alert());

    let inputs = SignalInputs::demo();
    let mut accumulator = InfinityAccumulator::new();

    let mut heads = Vec::new();
    for _ in 0..3 {
        let report = SignalReport::compute(&inputs, &mut accumulator);
        heads.push(ledger.append(&report).unwrap());
        tracker
            .update_fingerprint(report.materials().as_slice())
            .unwrap();
        clock.advance(10.0);
    }

    // The shared accumulator moves the genesis digest every round, so every
    // round is a new fingerprint.
    assert_eq!(ledger.count(), 3);
    assert_eq!(tracker.history().len(), 3);
    assert!(tracker.amnesia_alert());

    clock.advance(60.0);
    assert!(!tracker.amnesia_alert());

    let entries = ledger.entries().unwrap();
    let hashes: Vec<_> = entries.iter().map(|e| e.hash.clone()).collect();
    assert_eq!(hashes, heads);
    assert!(entries[0].record["genesis_identity"].is_string());

    assert!(ledger.audit(&heads[2]).unwrap().intact);
    assert!(!ledger.audit(&heads[1]).unwrap().intact);

    // A second ledger fed the same reports lands on the same head.
    let replica = Ledger::open(tmp.path().join("replica.jsonl")).unwrap();
    let mut replica_accumulator = InfinityAccumulator::new();
    for _ in 0..3 {
        let report = SignalReport::compute(&inputs, &mut replica_accumulator);
        replica.append(&report).unwrap();
    }
    assert_eq!(replica.fingerprint(), ledger.fingerprint());
}

#[test]
fn workflow_contradiction_log_feeds_continuity() {
    let tmp = tempfile::tempdir().unwrap();
    let config = KernelConfig::with_root(tmp.path());
    let clock = Arc::new(ManualClock::new(500.0));

    let log = ContradictionLog::with_clock(&config.contradiction_log_file, clock.clone()).unwrap();
    log.append("is the sky green?", "yes").unwrap();
    clock.advance(1.0);
    log.append("is the sky green?", "no").unwrap();

    let materials: Vec<String> = log
        .read_all()
        .unwrap()
        .into_iter()
        .map(|e| format!("{}={}", e.prompt, e.reply))
        .collect();

    let tracker = ContinuityTracker::with_clock(&config.continuity_file, clock.clone()).unwrap();
    let (fp, prev) = tracker.update_fingerprint(materials.as_slice()).unwrap();
    assert!(prev.is_none());
    assert_eq!(fp, fingerprint_of(materials.as_slice()));

    let summary = log.summary().unwrap();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.oldest_timestamp, Some(500.0));
    assert_eq!(summary.newest_timestamp, Some(501.0));
}

#[test]
fn workflow_restart_preserves_chain_and_history() {
    let tmp = tempfile::tempdir().unwrap();
    let config = KernelConfig::with_root(tmp.path());
    let clock = Arc::new(ManualClock::new(0.0));

    let (head, state) = {
        let ledger = Ledger::open(&config.ledger_file).unwrap();
        let tracker =
            ContinuityTracker::with_clock(&config.continuity_file, clock.clone()).unwrap();
        ledger.append(&serde_json::json!({"boot": 1})).unwrap();
        let head = ledger.append(&serde_json::json!({"boot": 2})).unwrap();
        tracker.update_fingerprint(&["session-1"]).unwrap();
        (head, tracker.state())
    };

    let ledger = Ledger::open_verified(&config.ledger_file, &head).unwrap();
    assert_eq!(ledger.count(), 2);

    let tracker = ContinuityTracker::with_clock(&config.continuity_file, clock).unwrap();
    assert_eq!(tracker.state(), state);
    let (_, prev) = tracker.update_fingerprint(&["session-2"]).unwrap();
    assert_eq!(prev, state.fingerprint);
    assert_eq!(tracker.history().len(), 2);
}
