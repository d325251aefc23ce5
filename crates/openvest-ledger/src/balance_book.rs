//! Per-address withdrawable balances.
//!
//! Releases and refunds accrue here instead of being pushed out directly;
//! the owner pulls the whole balance with an explicit withdraw. This
//! decouples payout computation from external transfer failures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use openvest_types::{AccountId, OpenvestError, Result};

/// Tracks the withdrawable balance of every address that has ever been
/// credited.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceBook {
    balances: HashMap<AccountId, u128>,
}

impl BalanceBook {
    /// Create a new empty balance book.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Credit an address with released or refunded value.
    ///
    /// # Errors
    /// Returns `BalanceOverflow` if the accumulator would overflow; the
    /// balance is unchanged in that case.
    pub fn credit(&mut self, account: AccountId, amount: u128) -> Result<()> {
        let entry = self.balances.entry(account).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(OpenvestError::BalanceOverflow { account })?;
        Ok(())
    }

    /// Pull the full withdrawable balance of an address, zeroing it.
    ///
    /// # Errors
    /// Returns `NothingToWithdraw` if the balance is zero.
    pub fn withdraw(&mut self, account: AccountId) -> Result<u128> {
        match self.balances.get_mut(&account) {
            Some(balance) if *balance > 0 => Ok(std::mem::take(balance)),
            _ => Err(OpenvestError::NothingToWithdraw(account)),
        }
    }

    /// Current withdrawable balance of an address.
    #[must_use]
    pub fn balance(&self, account: AccountId) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// Sum of all withdrawable balances.
    #[must_use]
    pub fn total_withdrawable(&self) -> u128 {
        self.balances.values().sum()
    }

    /// All (address, balance) entries, for snapshotting.
    pub fn entries(&self) -> impl Iterator<Item = (AccountId, u128)> + '_ {
        self.balances.iter().map(|(k, v)| (*k, *v))
    }
}
