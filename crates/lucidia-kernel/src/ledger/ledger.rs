//! The `Ledger` handle: chain head in memory, canonical lines on disk.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use crate::error::{KernelError, Result};
use crate::storage::LinesFile;

use super::canonical::canonicalize;
use super::chain::{
    chain_hash, replay_head, verify_chain, verify_chain_against, ChainVerification, LedgerEntry,
    GENESIS_HASH,
};

#[derive(Debug)]
struct ChainHead {
    hash: String,
    count: u64,
}

/// Append-only ledger with a rolling hash to detect tampering.
///
/// The head is guarded by a single lock held across the hash computation and
/// the file write, so one `Ledger` may be shared between threads. Two
/// ledgers fed the same records in the same order from an empty file end on
/// the same head hash.
#[derive(Debug)]
pub struct Ledger {
    file: LinesFile,
    head: Mutex<ChainHead>,
}

impl Ledger {
    /// Open the ledger at `path`.
    ///
    /// A missing file starts from the genesis hash. An existing file is
    /// replayed to restore the head and count.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::Decode` if a stored line is not valid JSON, or
    /// `KernelError::Io` for filesystem errors.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = LinesFile::new(path.as_ref())?;
        let lines = file.read_lines()?.unwrap_or_default();

        for (i, line) in lines.iter().enumerate() {
            file.decode_line::<serde_json::Value>(i + 1, line)?;
        }
        let (hash, count) = replay_head(lines.as_slice());

        log::debug!(
            "ledger opened at {} with {count} entries, head {hash}",
            file.path().display()
        );

        Ok(Self {
            file,
            head: Mutex::new(ChainHead { hash, count }),
        })
    }

    /// Open the ledger at `path` and require its head to equal `expected_head`.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::ChainMismatch` if the replayed head differs.
    pub fn open_verified(path: impl AsRef<Path>, expected_head: &str) -> Result<Self> {
        let ledger = Self::open(path)?;
        let actual = ledger.fingerprint();
        if actual != expected_head {
            log::warn!("ledger head mismatch: expected {expected_head}, found {actual}");
            return Err(KernelError::ChainMismatch {
                expected: expected_head.to_string(),
                actual,
            });
        }
        Ok(ledger)
    }

    // The head is replaced in a single assignment after a successful write,
    // so a poisoned guard still holds a consistent head.
    fn lock(&self) -> MutexGuard<'_, ChainHead> {
        self.head.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append `record` and return the new head hash.
    ///
    /// The canonical line is persisted before the head advances; if the
    /// write fails the head and count are unchanged.
    pub fn append<T: Serialize + ?Sized>(&self, record: &T) -> Result<String> {
        let line = canonicalize(record)?;

        let mut head = self.lock();
        let new_hash = chain_hash(&head.hash, &line);
        self.file.append_line(&line)?;
        head.hash = new_hash.clone();
        head.count += 1;

        log::debug!("ledger append #{} -> {new_hash}", head.count);
        Ok(new_hash)
    }

    /// Current head hash.
    pub fn fingerprint(&self) -> String {
        self.lock().hash.clone()
    }

    /// Number of successful appends, including replayed ones.
    pub fn count(&self) -> u64 {
        self.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read every stored record with the chain hash it produced.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>> {
        let _head = self.lock();
        let lines = self.file.read_lines()?.unwrap_or_default();

        let mut prev = GENESIS_HASH.to_string();
        let mut entries = Vec::with_capacity(lines.len());
        for (i, line) in lines.into_iter().enumerate() {
            let record = self.file.decode_line(i + 1, &line)?;
            let hash = chain_hash(&prev, &line);
            prev = hash.clone();
            entries.push(LedgerEntry {
                index: i as u64,
                record,
                canonical: line,
                hash,
            });
        }
        Ok(entries)
    }

    /// Recompute the chain from the file and compare it with `expected_head`.
    pub fn audit(&self, expected_head: &str) -> Result<ChainVerification> {
        let _head = self.lock();
        let lines = self.file.read_lines()?.unwrap_or_default();
        let verification = verify_chain(lines.as_slice(), expected_head);
        if !verification.intact {
            log::warn!(
                "ledger audit failed for {}: expected {}, recomputed {}",
                self.file.path().display(),
                verification.expected_head,
                verification.head_hash
            );
        }
        Ok(verification)
    }

    /// Recompute the chain from the file and compare it entry by entry with
    /// `exported`, a snapshot previously taken with [`Ledger::entries`].
    ///
    /// `mismatch_at` names the first entry that no longer matches.
    pub fn audit_entries(&self, exported: &[LedgerEntry]) -> Result<ChainVerification> {
        let _head = self.lock();
        let lines = self.file.read_lines()?.unwrap_or_default();
        let hashes: Vec<&str> = exported.iter().map(|entry| entry.hash.as_str()).collect();
        let verification = verify_chain_against(lines.as_slice(), hashes.as_slice());
        if let Some(index) = verification.mismatch_at {
            log::warn!(
                "ledger audit failed for {}: first mismatch at entry {index}",
                self.file.path().display()
            );
        }
        Ok(verification)
    }

    /// Recompute the chain from the file and compare it with the in-memory head.
    pub fn verify(&self) -> Result<ChainVerification> {
        let expected = self.fingerprint();
        self.audit(&expected)
    }
}
