//! Resilience tests: missing files, corrupted files, tampered data,
//! unwritable locations.

use lucidia_kernel::storage::{ContinuityStore, StoreLoad};
use lucidia_kernel::{
    Breath, ContinuityTracker, ContradictionLog, InfinityAccumulator, KernelError, Ledger,
    SignalInputs, SignalReport,
};
use serde_json::json;

#[test]
fn resilience_missing_files_are_empty_state() {
    let tmp = tempfile::tempdir().unwrap();

    let store = ContinuityStore::new(tmp.path().join("continuity.json")).unwrap();
    assert_eq!(store.load().unwrap(), StoreLoad::Empty);

    let tracker = ContinuityTracker::open(tmp.path().join("continuity.json")).unwrap();
    assert!(tracker.fingerprint().is_none());
    assert!(tracker.history().is_empty());

    let ledger = Ledger::open(tmp.path().join("ledger.jsonl")).unwrap();
    assert_eq!(ledger.count(), 0);

    let log = ContradictionLog::new(tmp.path().join("log.jsonl")).unwrap();
    assert!(log.read_all().unwrap().is_empty());
}

#[test]
fn resilience_corrupted_continuity_file_detected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("continuity.json");

    {
        let tracker = ContinuityTracker::open(&path).unwrap();
        tracker.update_fingerprint(&["a"]).unwrap();
    }

    // Truncate the file
    let data = std::fs::read(&path).unwrap();
    std::fs::write(&path, &data[..data.len() / 2]).unwrap();

    let result = ContinuityTracker::open(&path);
    assert!(matches!(result, Err(KernelError::Decode { .. })));
}

#[test]
fn resilience_corrupted_ledger_line_detected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("ledger.jsonl");

    {
        let ledger = Ledger::open(&path).unwrap();
        ledger.append(&json!({"n": 1})).unwrap();
        ledger.append(&json!({"n": 2})).unwrap();
    }

    let mut raw = std::fs::read_to_string(&path).unwrap();
    raw.push_str("{\"n\": 3");
    std::fs::write(&path, raw).unwrap();

    match Ledger::open(&path) {
        Err(KernelError::Decode { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn resilience_tampered_ledger_fails_audit() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("ledger.jsonl");

    let head = {
        let ledger = Ledger::open(&path).unwrap();
        ledger.append(&json!({"amount": 10})).unwrap();
        ledger.append(&json!({"amount": 20})).unwrap()
    };

    let raw = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, raw.replace("10", "11")).unwrap();

    let reopened = Ledger::open(&path).unwrap();
    assert!(!reopened.audit(&head).unwrap().intact);
    assert!(matches!(
        Ledger::open_verified(&path, &head),
        Err(KernelError::ChainMismatch { .. })
    ));
}

#[test]
fn resilience_corrupted_log_line_detected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("log.jsonl");
    let log = ContradictionLog::new(&path).unwrap();
    log.append("p", "r").unwrap();

    let mut raw = std::fs::read_to_string(&path).unwrap();
    raw.push_str("{\"prompt\": \"missing fields\"}\n");
    std::fs::write(&path, raw).unwrap();

    assert!(matches!(log.read_all(), Err(KernelError::Decode { .. })));
}

#[test]
fn resilience_failed_write_leaves_state_unchanged() {
    let tmp = tempfile::tempdir().unwrap();

    // A directory where the ledger file should be makes every append fail.
    let ledger_path = tmp.path().join("ledger.jsonl");
    let ledger = Ledger::open(&ledger_path).unwrap();
    std::fs::create_dir(&ledger_path).unwrap();

    let before = ledger.fingerprint();
    assert!(matches!(
        ledger.append(&json!({"n": 1})),
        Err(KernelError::Io(_))
    ));
    assert_eq!(ledger.fingerprint(), before);
    assert_eq!(ledger.count(), 0);

    let continuity_path = tmp.path().join("continuity.json");
    let tracker = ContinuityTracker::open(&continuity_path).unwrap();
    std::fs::create_dir(&continuity_path).unwrap();

    assert!(matches!(
        tracker.update_fingerprint(&["x"]),
        Err(KernelError::Io(_))
    ));
    assert!(tracker.fingerprint().is_none());
    assert!(tracker.history().is_empty());
}

#[test]
fn resilience_non_finite_report_is_not_checkpointed() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = Ledger::open(tmp.path().join("ledger.jsonl")).unwrap();

    let clean = SignalReport::compute(&SignalInputs::demo(), &mut InfinityAccumulator::new());
    let head = ledger.append(&clean).unwrap();

    let mut inputs = SignalInputs::demo();
    inputs.breath = Breath::new(vec![f64::NAN, 0.5]);
    let poisoned = SignalReport::compute(&inputs, &mut InfinityAccumulator::new());
    assert!(poisoned.emotional_gravity.is_nan());

    assert!(matches!(
        ledger.append(&poisoned),
        Err(KernelError::InvalidInput(_))
    ));
    assert_eq!(ledger.fingerprint(), head);
    assert_eq!(ledger.count(), 1);

    let reopened = Ledger::open(ledger.path()).unwrap();
    assert_eq!(reopened.fingerprint(), head);
    assert!(reopened.entries().unwrap()[0].canonical.find("null").is_none());
}
