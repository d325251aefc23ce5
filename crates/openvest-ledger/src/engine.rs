//! Order lifecycle engine.
//!
//! [`OrderLedger`] is the single serialization point for all state
//! transitions: one logical operation at a time touches the arena, the
//! balance book, and the custody tallies. Every operation validates fully
//! before mutating anything, so a rejected call leaves no partial state.

use chrono::Utc;

use openvest_types::{
    AccountId, Destination, OpenvestError, Order, OrderId, OrderParams, OrderStatus, Result,
    constants, LedgerConfig,
};

use crate::balance_book::BalanceBook;
use crate::custody::CustodyBook;
use crate::store::OrderStore;

/// The escrow ledger: order arena, withdrawable balances, custody tallies.
#[derive(Debug, Clone)]
pub struct OrderLedger {
    config: LedgerConfig,
    store: OrderStore,
    balances: BalanceBook,
    custody: CustodyBook,
}

impl OrderLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            store: OrderStore::new(),
            balances: BalanceBook::new(),
            custody: CustodyBook::new(),
        }
    }

    /// Rebuild a ledger from persisted parts, verifying solvency before
    /// accepting them.
    ///
    /// # Errors
    /// Returns `SolvencyViolation` if the parts disagree.
    pub fn from_parts(
        config: LedgerConfig,
        store: OrderStore,
        balances: BalanceBook,
        custody: CustodyBook,
    ) -> Result<Self> {
        custody.verify(store.locked_total())?;
        Ok(Self {
            config,
            store,
            balances,
            custody,
        })
    }

    // =====================================================================
    // Creation
    // =====================================================================

    /// Create a locally-paying order funded with `funded_value`.
    ///
    /// # Errors
    /// - `InvalidSchedule` if `start_time >= end_time`, `interval == 0`,
    ///   or the amount exceeds [`constants::MAX_ORDER_AMOUNT`]
    /// - `FundingMismatch` if `funded_value != total_amount`
    pub fn create_order(
        &mut self,
        caller: AccountId,
        params: OrderParams,
        funded_value: u128,
    ) -> Result<OrderId> {
        Self::validate_schedule(params.start_time, params.end_time, params.interval)?;
        Self::validate_amount(params.total_amount)?;
        Self::validate_funding(params.total_amount, funded_value)?;
        Ok(self.insert_order(caller, params, None))
    }

    /// Create an order whose releases are forwarded to a remote domain.
    ///
    /// # Errors
    /// Same as [`Self::create_order`], plus `InvalidDestination` if the
    /// destination domain is empty or not in the configured registry.
    pub fn create_order_interchain(
        &mut self,
        caller: AccountId,
        params: OrderParams,
        destination: Destination,
        funded_value: u128,
    ) -> Result<OrderId> {
        Self::validate_schedule(params.start_time, params.end_time, params.interval)?;
        Self::validate_amount(params.total_amount)?;
        Self::validate_funding(params.total_amount, funded_value)?;
        if destination.domain.is_empty() {
            return Err(OpenvestError::InvalidDestination {
                reason: "destination domain is empty".to_string(),
            });
        }
        if !self.config.resolves(destination.domain) {
            return Err(OpenvestError::InvalidDestination {
                reason: format!("{} is not a known destination", destination.domain),
            });
        }
        Ok(self.insert_order(caller, params, Some(destination)))
    }

    fn insert_order(
        &mut self,
        caller: AccountId,
        params: OrderParams,
        destination: Option<Destination>,
    ) -> OrderId {
        let now = Utc::now();
        let total_amount = params.total_amount;
        let order = Order {
            id: self.store.next_id(),
            name: params.name,
            total_amount,
            released_amount: 0,
            start_time: params.start_time,
            end_time: params.end_time,
            interval: params.interval,
            beneficiary: params.beneficiary,
            creator: caller,
            destination,
            status: OrderStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let id = self.store.insert(order);
        self.custody.record_deposit(total_amount);
        tracing::info!(
            order = %id,
            creator = %caller,
            total = total_amount,
            interchain = destination.is_some(),
            "Order created"
        );
        id
    }

    // =====================================================================
    // Edit / delete
    // =====================================================================

    /// Replace the mutable schedule fields of an Active order.
    ///
    /// A `total_amount` increase must be funded: `funded_value` must equal
    /// `new_total - total`. A decrease refunds the difference to the
    /// creator's withdrawable balance. `released_amount` and past history
    /// are preserved.
    ///
    /// # Errors
    /// - `NotFound` if the id is unknown
    /// - `Forbidden` if `caller` is not the creator
    /// - `InvalidState` if the order is not Active
    /// - `InvalidSchedule` if `new_total < released_amount` or the new
    ///   schedule is internally inconsistent
    /// - `FundingMismatch` if `funded_value` does not cover the increase
    pub fn edit_order(
        &mut self,
        caller: AccountId,
        id: OrderId,
        new_total: u128,
        new_end_time: u64,
        new_interval: u64,
        funded_value: u128,
    ) -> Result<()> {
        let order = self.store.get(id).ok_or(OpenvestError::NotFound(id))?;
        Self::require_creator(order, caller)?;
        Self::require_active(order)?;
        if new_total < order.released_amount {
            return Err(OpenvestError::InvalidSchedule {
                reason: format!(
                    "new total {new_total} is below released amount {}",
                    order.released_amount
                ),
            });
        }
        Self::validate_schedule(order.start_time, new_end_time, new_interval)?;
        Self::validate_amount(new_total)?;

        let old_total = order.total_amount;
        let creator = order.creator;
        let required = new_total.saturating_sub(old_total);
        if funded_value != required {
            return Err(OpenvestError::FundingMismatch {
                declared: required,
                funded: funded_value,
            });
        }

        if new_total > old_total {
            self.custody.record_deposit(new_total - old_total);
        } else if new_total < old_total {
            let refund = old_total - new_total;
            self.balances.credit(creator, refund)?;
            self.custody.record_refund(refund);
        }

        let order = self
            .store
            .get_mut(id)
            .ok_or(OpenvestError::NotFound(id))?;
        order.total_amount = new_total;
        order.end_time = new_end_time;
        order.interval = new_interval;
        order.updated_at = Utc::now();
        tracing::info!(order = %id, total = new_total, "Order edited");
        Ok(())
    }

    /// Cancel an Active order, refunding the still-locked value to the
    /// creator's withdrawable balance. Returns the refunded amount.
    ///
    /// A second call fails with `InvalidState`: Cancelled is terminal.
    ///
    /// # Errors
    /// `NotFound` / `Forbidden` / `InvalidState` as for [`Self::edit_order`].
    pub fn delete_order(&mut self, caller: AccountId, id: OrderId) -> Result<u128> {
        let order = self.store.get(id).ok_or(OpenvestError::NotFound(id))?;
        Self::require_creator(order, caller)?;
        Self::require_active(order)?;

        let refund = order.remaining();
        let creator = order.creator;
        self.balances.credit(creator, refund)?;
        self.custody.record_refund(refund);

        let order = self
            .store
            .get_mut(id)
            .ok_or(OpenvestError::NotFound(id))?;
        order.status = OrderStatus::Cancelled;
        order.updated_at = Utc::now();
        tracing::info!(order = %id, refund, "Order cancelled");
        Ok(refund)
    }

    // =====================================================================
    // Withdrawal
    // =====================================================================

    /// Pull the caller's entire withdrawable balance.
    ///
    /// # Errors
    /// Returns `NothingToWithdraw` if the caller's balance is zero.
    pub fn withdraw(&mut self, caller: AccountId) -> Result<u128> {
        let amount = self.balances.withdraw(caller)?;
        tracing::info!(account = %caller, amount, "Withdrawal");
        Ok(amount)
    }

    // =====================================================================
    // Release commits (invoked by the payout scheduler)
    // =====================================================================

    /// Commit a local release: increase `released_amount` and credit the
    /// beneficiary's withdrawable balance.
    ///
    /// # Errors
    /// - `NotFound` / `InvalidState` for unknown or terminal orders
    /// - `Internal` if `amount` exceeds the still-locked value
    pub fn commit_local_release(&mut self, id: OrderId, amount: u128, now: u64) -> Result<()> {
        let order = self.store.get(id).ok_or(OpenvestError::NotFound(id))?;
        Self::require_active(order)?;
        Self::require_within_remaining(order, amount)?;
        let beneficiary = order.beneficiary;

        self.balances.credit(beneficiary, amount)?;
        self.custody.record_release(amount);
        self.apply_release(id, amount, now)
    }

    /// Commit a release that the forwarding gateway has accepted: the value
    /// leaves custody entirely, so no local balance is credited.
    ///
    /// # Errors
    /// Same as [`Self::commit_local_release`].
    pub fn commit_forwarded_release(&mut self, id: OrderId, amount: u128, now: u64) -> Result<()> {
        let order = self.store.get(id).ok_or(OpenvestError::NotFound(id))?;
        Self::require_active(order)?;
        Self::require_within_remaining(order, amount)?;

        self.custody.record_release(amount);
        self.apply_release(id, amount, now)
    }

    fn apply_release(&mut self, id: OrderId, amount: u128, now: u64) -> Result<()> {
        let order = self
            .store
            .get_mut(id)
            .ok_or(OpenvestError::NotFound(id))?;
        order.released_amount += amount;
        if now >= order.end_time && order.released_amount == order.total_amount {
            order.status = OrderStatus::Completed;
        }
        order.updated_at = Utc::now();
        tracing::debug!(
            order = %id,
            amount,
            released = order.released_amount,
            status = %order.status,
            "Release committed"
        );
        Ok(())
    }

    // =====================================================================
    // Invariants & accessors
    // =====================================================================

    /// Verify the solvency invariant: the arena's locked total must equal
    /// the custody tallies' expected locked balance.
    ///
    /// # Errors
    /// Returns `SolvencyViolation` on disagreement.
    pub fn check_solvency(&self) -> Result<()> {
        self.custody.verify(self.store.locked_total())
    }

    /// Look up an order by id.
    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.store.get(id)
    }

    /// Withdrawable balance of an address.
    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> u128 {
        self.balances.balance(account)
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    #[must_use]
    pub fn balances(&self) -> &BalanceBook {
        &self.balances
    }

    #[must_use]
    pub fn custody(&self) -> &CustodyBook {
        &self.custody
    }

    // =====================================================================
    // Validation helpers
    // =====================================================================

    fn validate_schedule(start_time: u64, end_time: u64, interval: u64) -> Result<()> {
        if start_time >= end_time {
            return Err(OpenvestError::InvalidSchedule {
                reason: format!("start_time {start_time} must precede end_time {end_time}"),
            });
        }
        if interval == 0 {
            return Err(OpenvestError::InvalidSchedule {
                reason: "interval must be nonzero".to_string(),
            });
        }
        Ok(())
    }

    fn validate_amount(total_amount: u128) -> Result<()> {
        if total_amount > constants::MAX_ORDER_AMOUNT {
            return Err(OpenvestError::InvalidSchedule {
                reason: format!(
                    "total amount {total_amount} exceeds maximum {}",
                    constants::MAX_ORDER_AMOUNT
                ),
            });
        }
        Ok(())
    }

    fn validate_funding(total_amount: u128, funded_value: u128) -> Result<()> {
        if funded_value != total_amount {
            return Err(OpenvestError::FundingMismatch {
                declared: total_amount,
                funded: funded_value,
            });
        }
        Ok(())
    }

    fn require_creator(order: &Order, caller: AccountId) -> Result<()> {
        if order.creator != caller {
            return Err(OpenvestError::Forbidden {
                order: order.id,
                caller,
            });
        }
        Ok(())
    }

    fn require_active(order: &Order) -> Result<()> {
        if !order.is_active() {
            return Err(OpenvestError::InvalidState {
                order: order.id,
                status: order.status,
            });
        }
        Ok(())
    }

    fn require_within_remaining(order: &Order, amount: u128) -> Result<()> {
        if amount > order.remaining() {
            return Err(OpenvestError::Internal(format!(
                "release of {amount} exceeds locked {} for {}",
                order.remaining(),
                order.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openvest_types::DomainId;

    const DAY: u64 = 86_400;

    fn acct(byte: u8) -> AccountId {
        AccountId([byte; 20])
    }

    fn params(total: u128) -> OrderParams {
        OrderParams {
            name: "ST".to_string(),
            total_amount: total,
            start_time: 0,
            end_time: 10 * DAY,
            interval: DAY,
            beneficiary: acct(0xbe),
        }
    }

    fn ledger() -> OrderLedger {
        OrderLedger::new(LedgerConfig {
            known_domains: vec![DomainId(2)],
            ..LedgerConfig::default()
        })
    }

    #[test]
    fn create_order_assigns_sequential_ids() {
        let mut ledger = ledger();
        let a = ledger.create_order(acct(1), params(20), 20).unwrap();
        let b = ledger.create_order(acct(1), params(30), 30).unwrap();
        assert_eq!(a, OrderId(1));
        assert_eq!(b, OrderId(2));
        let order = ledger.order(a).unwrap();
        assert_eq!(order.released_amount, 0);
        assert_eq!(order.creator, acct(1));
        assert_eq!(order.status, OrderStatus::Active);
        ledger.check_solvency().unwrap();
    }

    #[test]
    fn create_order_rejects_bad_schedule() {
        let mut ledger = ledger();
        let mut p = params(20);
        p.start_time = 10 * DAY;
        p.end_time = 10 * DAY;
        let err = ledger.create_order(acct(1), p, 20).unwrap_err();
        assert!(matches!(err, OpenvestError::InvalidSchedule { .. }));

        let mut p = params(20);
        p.interval = 0;
        let err = ledger.create_order(acct(1), p, 20).unwrap_err();
        assert!(matches!(err, OpenvestError::InvalidSchedule { .. }));

        // Nothing stored, nothing locked.
        assert!(ledger.store().is_empty());
        ledger.check_solvency().unwrap();
    }

    #[test]
    fn create_order_rejects_funding_mismatch() {
        let mut ledger = ledger();
        let err = ledger.create_order(acct(1), params(20), 19).unwrap_err();
        assert!(matches!(
            err,
            OpenvestError::FundingMismatch {
                declared: 20,
                funded: 19
            }
        ));
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn create_order_rejects_oversized_amount() {
        let mut ledger = ledger();
        let huge = constants::MAX_ORDER_AMOUNT + 1;
        let err = ledger.create_order(acct(1), params(huge), huge).unwrap_err();
        assert!(matches!(err, OpenvestError::InvalidSchedule { .. }));
    }

    #[test]
    fn interchain_create_validates_destination() {
        let mut ledger = ledger();
        let dest = |domain| Destination {
            domain,
            address: acct(0xdd),
        };

        let err = ledger
            .create_order_interchain(acct(1), params(20), dest(DomainId::EMPTY), 20)
            .unwrap_err();
        assert!(matches!(err, OpenvestError::InvalidDestination { .. }));

        let err = ledger
            .create_order_interchain(acct(1), params(20), dest(DomainId(99)), 20)
            .unwrap_err();
        assert!(matches!(err, OpenvestError::InvalidDestination { .. }));

        let id = ledger
            .create_order_interchain(acct(1), params(20), dest(DomainId(2)), 20)
            .unwrap();
        assert!(ledger.order(id).unwrap().is_interchain());
    }

    #[test]
    fn edit_order_replaces_schedule_fields() {
        let mut ledger = ledger();
        let id = ledger.create_order(acct(1), params(20), 20).unwrap();
        ledger
            .edit_order(acct(1), id, 30, 20 * DAY, 2 * DAY, 10)
            .unwrap();
        let order = ledger.order(id).unwrap();
        assert_eq!(order.total_amount, 30);
        assert_eq!(order.end_time, 20 * DAY);
        assert_eq!(order.interval, 2 * DAY);
        ledger.check_solvency().unwrap();
    }

    #[test]
    fn edit_order_unknown_id() {
        let mut ledger = ledger();
        let err = ledger
            .edit_order(acct(1), OrderId(5), 10, DAY, DAY, 10)
            .unwrap_err();
        assert!(matches!(err, OpenvestError::NotFound(OrderId(5))));
    }

    #[test]
    fn edit_order_wrong_caller() {
        let mut ledger = ledger();
        let id = ledger.create_order(acct(1), params(20), 20).unwrap();
        let err = ledger
            .edit_order(acct(2), id, 30, 20 * DAY, DAY, 10)
            .unwrap_err();
        assert!(matches!(err, OpenvestError::Forbidden { .. }));
        // Original order unchanged.
        assert_eq!(ledger.order(id).unwrap().total_amount, 20);
    }

    #[test]
    fn edit_order_below_released_rejected() {
        let mut ledger = ledger();
        let id = ledger.create_order(acct(1), params(20), 20).unwrap();
        ledger.commit_local_release(id, 6, 3 * DAY).unwrap();

        let err = ledger
            .edit_order(acct(1), id, 5, 10 * DAY, DAY, 0)
            .unwrap_err();
        assert!(matches!(err, OpenvestError::InvalidSchedule { .. }));
        let order = ledger.order(id).unwrap();
        assert_eq!(order.total_amount, 20);
        assert_eq!(order.released_amount, 6);
    }

    #[test]
    fn edit_order_increase_requires_funding() {
        let mut ledger = ledger();
        let id = ledger.create_order(acct(1), params(20), 20).unwrap();
        let err = ledger
            .edit_order(acct(1), id, 30, 10 * DAY, DAY, 0)
            .unwrap_err();
        assert!(matches!(
            err,
            OpenvestError::FundingMismatch {
                declared: 10,
                funded: 0
            }
        ));
    }

    #[test]
    fn edit_order_decrease_refunds_creator() {
        let mut ledger = ledger();
        let id = ledger.create_order(acct(1), params(20), 20).unwrap();
        ledger
            .edit_order(acct(1), id, 12, 10 * DAY, DAY, 0)
            .unwrap();
        assert_eq!(ledger.balance_of(acct(1)), 8);
        ledger.check_solvency().unwrap();
    }

    #[test]
    fn delete_order_refunds_remaining_and_cancels() {
        let mut ledger = ledger();
        let id = ledger.create_order(acct(1), params(20), 20).unwrap();
        ledger.commit_local_release(id, 4, 2 * DAY).unwrap();

        let refund = ledger.delete_order(acct(1), id).unwrap();
        assert_eq!(refund, 16);
        assert_eq!(ledger.balance_of(acct(1)), 16);
        assert_eq!(ledger.order(id).unwrap().status, OrderStatus::Cancelled);
        ledger.check_solvency().unwrap();
    }

    #[test]
    fn delete_order_is_guarded_against_double_cancel() {
        let mut ledger = ledger();
        let id = ledger.create_order(acct(1), params(20), 20).unwrap();
        ledger.delete_order(acct(1), id).unwrap();
        let err = ledger.delete_order(acct(1), id).unwrap_err();
        assert!(matches!(err, OpenvestError::InvalidState { .. }));
        // Balance credited exactly once.
        assert_eq!(ledger.balance_of(acct(1)), 20);
    }

    #[test]
    fn terminal_order_rejects_edit() {
        let mut ledger = ledger();
        let id = ledger.create_order(acct(1), params(20), 20).unwrap();
        ledger.delete_order(acct(1), id).unwrap();
        let err = ledger
            .edit_order(acct(1), id, 30, 20 * DAY, DAY, 10)
            .unwrap_err();
        assert!(matches!(err, OpenvestError::InvalidState { .. }));
    }

    #[test]
    fn withdraw_pulls_and_zeroes() {
        let mut ledger = ledger();
        let id = ledger.create_order(acct(1), params(20), 20).unwrap();
        ledger.commit_local_release(id, 6, 3 * DAY).unwrap();

        assert_eq!(ledger.withdraw(acct(0xbe)).unwrap(), 6);
        let err = ledger.withdraw(acct(0xbe)).unwrap_err();
        assert!(matches!(err, OpenvestError::NothingToWithdraw(_)));
    }

    #[test]
    fn release_completes_at_end_time() {
        let mut ledger = ledger();
        let id = ledger.create_order(acct(1), params(20), 20).unwrap();
        ledger.commit_local_release(id, 20, 10 * DAY).unwrap();
        let order = ledger.order(id).unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.released_amount, 20);
        ledger.check_solvency().unwrap();
    }

    #[test]
    fn full_release_before_end_stays_active() {
        let mut ledger = ledger();
        let id = ledger.create_order(acct(1), params(20), 20).unwrap();
        ledger.commit_local_release(id, 20, 5 * DAY).unwrap();
        assert_eq!(ledger.order(id).unwrap().status, OrderStatus::Active);
    }

    #[test]
    fn release_beyond_locked_is_refused() {
        let mut ledger = ledger();
        let id = ledger.create_order(acct(1), params(20), 20).unwrap();
        let err = ledger.commit_local_release(id, 21, DAY).unwrap_err();
        assert!(matches!(err, OpenvestError::Internal(_)));
        assert_eq!(ledger.order(id).unwrap().released_amount, 0);
    }

    #[test]
    fn forwarded_release_does_not_credit_locally() {
        let mut ledger = ledger();
        let dest = Destination {
            domain: DomainId(2),
            address: acct(0xdd),
        };
        let id = ledger
            .create_order_interchain(acct(1), params(20), dest, 20)
            .unwrap();
        ledger.commit_forwarded_release(id, 2, DAY).unwrap();
        assert_eq!(ledger.order(id).unwrap().released_amount, 2);
        assert_eq!(ledger.balance_of(acct(0xbe)), 0);
        assert_eq!(ledger.balance_of(acct(0xdd)), 0);
        ledger.check_solvency().unwrap();
    }

    #[test]
    fn from_parts_rejects_insolvent_state() {
        let mut store = OrderStore::new();
        store.insert(Order::dummy(100, 0, 1000, 10));
        // Custody never saw the deposit.
        let err = OrderLedger::from_parts(
            LedgerConfig::default(),
            store,
            BalanceBook::new(),
            CustodyBook::new(),
        )
        .unwrap_err();
        assert!(matches!(err, OpenvestError::SolvencyViolation { .. }));
    }
}
