//! Versioned JSON snapshot of the full ledger state.
//!
//! Snapshots are written atomically: the envelope is serialized to a
//! temporary file in the same directory, then renamed over the target, so
//! a crash mid-write never leaves a torn snapshot behind. Restore rejects
//! unknown envelope versions and re-verifies the solvency invariant
//! before handing the ledger back.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use openvest_ledger::{BalanceBook, CustodyBook, OrderLedger, OrderStore};
use openvest_types::{LedgerConfig, OpenvestError, Order, Result, constants};

/// The persisted envelope: everything needed to rebuild an [`OrderLedger`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    /// Order records in arena (ascending id) order.
    pub orders: Vec<Order>,
    pub balances: BalanceBook,
    pub custody: CustodyBook,
}

impl LedgerSnapshot {
    /// Capture the current ledger state.
    #[must_use]
    pub fn capture(ledger: &OrderLedger) -> Self {
        Self {
            version: constants::SNAPSHOT_VERSION,
            orders: ledger.store().records().to_vec(),
            balances: ledger.balances().clone(),
            custody: *ledger.custody(),
        }
    }

    /// Rebuild a ledger from this envelope, verifying solvency.
    ///
    /// # Errors
    /// - `Serialization` on an unknown envelope version
    /// - `SolvencyViolation` if the restored parts disagree
    pub fn restore(self, config: LedgerConfig) -> Result<OrderLedger> {
        if self.version != constants::SNAPSHOT_VERSION {
            return Err(OpenvestError::Serialization(format!(
                "unsupported snapshot version {} (expected {})",
                self.version,
                constants::SNAPSHOT_VERSION
            )));
        }
        OrderLedger::from_parts(
            config,
            OrderStore::from_records(self.orders),
            self.balances,
            self.custody,
        )
    }
}

/// Default snapshot location for a configuration.
#[must_use]
pub fn snapshot_path(config: &LedgerConfig) -> PathBuf {
    Path::new(&config.data_dir).join(constants::SNAPSHOT_FILE_NAME)
}

/// Write the ledger state to `path` atomically.
///
/// # Errors
/// Returns `Io` on filesystem failures and `Serialization` if the
/// envelope cannot be encoded.
pub fn save_snapshot(ledger: &OrderLedger, path: &Path) -> Result<()> {
    let snapshot = LedgerSnapshot::capture(ledger);
    let json = serde_json::to_vec_pretty(&snapshot)
        .map_err(|e| OpenvestError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &json)?;
    fs::rename(&tmp, path)?;

    tracing::debug!(
        path = %path.display(),
        orders = snapshot.orders.len(),
        bytes = json.len(),
        "Snapshot written"
    );
    Ok(())
}

/// Load a ledger from a snapshot file.
///
/// # Errors
/// `Io` if the file cannot be read, `Serialization` on a malformed or
/// version-mismatched envelope, `SolvencyViolation` on inconsistent state.
pub fn load_snapshot(path: &Path, config: LedgerConfig) -> Result<OrderLedger> {
    let json = fs::read_to_string(path)?;
    let snapshot: LedgerSnapshot =
        serde_json::from_str(&json).map_err(|e| OpenvestError::Serialization(e.to_string()))?;
    snapshot.restore(config)
}
