//! # openvest-persistence
//!
//! Durable snapshot persistence for the OpenVest ledger: the order arena,
//! the withdrawable balance book, and the custody tallies are written as a
//! versioned JSON envelope, atomically (temp file + rename), and verified
//! for solvency on restore.

pub mod snapshot;

pub use snapshot::{LedgerSnapshot, load_snapshot, save_snapshot, snapshot_path};
