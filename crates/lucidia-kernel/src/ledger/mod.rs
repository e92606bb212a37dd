//! Memory ledger: an append-only, hash-chained log of canonical records.

pub mod canonical;
pub mod chain;
#[allow(clippy::module_inception)]
pub mod ledger;

pub use canonical::canonicalize;
pub use chain::{
    chain_hash, replay_head, verify_chain, verify_chain_against, ChainVerification, LedgerEntry,
    GENESIS_HASH,
};
pub use ledger::Ledger;
