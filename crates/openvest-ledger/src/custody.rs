//! Custody conservation invariant checker.
//!
//! Invariant enforced after every mutating batch:
//! ```text
//! Σ(total - released) over ACTIVE orders == Σ(deposits) - Σ(releases) - Σ(refunds)
//! ```
//!
//! Every native unit locked by a create (or edit increase) leaves custody
//! exactly once: as a release to the beneficiary/destination or as a refund
//! to the creator, never both. If this tally ever disagrees with the
//! arena, something has gone catastrophically wrong and the operation
//! reports a critical error.

use serde::{Deserialize, Serialize};

use openvest_types::{OpenvestError, Result};

/// Tracks custody in/out totals since genesis and validates conservation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CustodyBook {
    /// Value locked by creates and edit increases.
    deposits: u128,
    /// Value released to beneficiaries or accepted by the gateway.
    releases: u128,
    /// Value refunded to creators by cancellation or edit decrease.
    refunds: u128,
}

impl CustodyBook {
    /// Create a new custody tracker with zero tallies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record value entering custody.
    pub fn record_deposit(&mut self, amount: u128) {
        self.deposits += amount;
    }

    /// Record value leaving custody as a release.
    pub fn record_release(&mut self, amount: u128) {
        self.releases += amount;
    }

    /// Record value leaving custody as a refund to the creator.
    pub fn record_refund(&mut self, amount: u128) {
        self.refunds += amount;
    }

    /// Expected locked balance: deposits - releases - refunds.
    #[must_use]
    pub fn expected_locked(&self) -> u128 {
        self.deposits - self.releases - self.refunds
    }

    /// Verify that the actual locked balance (scanned from the arena)
    /// matches the expected locked balance.
    ///
    /// # Errors
    /// Returns [`OpenvestError::SolvencyViolation`] if actual ≠ expected.
    pub fn verify(&self, actual_locked: u128) -> Result<()> {
        let expected = self.expected_locked();
        if actual_locked != expected {
            return Err(OpenvestError::SolvencyViolation {
                reason: format!(
                    "locked balance {actual_locked} != expected {expected} \
                     (deposits={}, releases={}, refunds={})",
                    self.deposits, self.releases, self.refunds,
                ),
            });
        }
        Ok(())
    }

    /// Total value ever locked.
    #[must_use]
    pub fn total_deposits(&self) -> u128 {
        self.deposits
    }

    /// Total value ever released.
    #[must_use]
    pub fn total_releases(&self) -> u128 {
        self.releases
    }

    /// Total value ever refunded.
    #[must_use]
    pub fn total_refunds(&self) -> u128 {
        self.refunds
    }
}
