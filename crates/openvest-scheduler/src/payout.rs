//! Caller-triggered payout batch over all Active orders.
//!
//! `pay_order` is callable by anyone and idempotent within an epoch: a
//! second call with no elapsed time computes `releasable = 0` for every
//! order and commits nothing. A forwarding rejection is scoped to its own
//! order; releases already committed for other orders in the same batch
//! stand.

use openvest_ledger::OrderLedger;
use openvest_types::{Destination, ForwardId, OrderId, OrderStatus, Result};

use crate::forwarding::{ForwardOutcome, ForwardRequest, ForwardingGateway};
use crate::vesting;

/// Outcome of one `pay_order` batch.
#[derive(Debug, Clone, Default)]
pub struct PayoutReport {
    /// Committed releases, ascending order id.
    pub released: Vec<(OrderId, u128)>,
    /// Orders that reached Completed in this batch.
    pub completed: Vec<OrderId>,
    /// Forwarding rejections: the order was left untouched.
    pub rejected: Vec<(OrderId, String)>,
}

impl PayoutReport {
    /// Sum of all committed releases in this batch.
    #[must_use]
    pub fn total_released(&self) -> u128 {
        self.released.iter().map(|(_, amount)| amount).sum()
    }

    /// Whether the batch changed nothing and reported nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.released.is_empty() && self.rejected.is_empty()
    }
}

/// One eligible order in the payout scan.
#[derive(Debug, Clone, Copy)]
struct DueRelease {
    id: OrderId,
    amount: u128,
    destination: Option<Destination>,
    /// Elapsed whole epochs at `now`; doubles as the forward sequence.
    epochs: u64,
}

/// Releases vested value for due orders, routing interchain orders through
/// the forwarding gateway.
pub struct PayoutScheduler {
    gateway: Box<dyn ForwardingGateway>,
}

impl PayoutScheduler {
    /// Create a scheduler over the given forwarding gateway.
    #[must_use]
    pub fn new(gateway: Box<dyn ForwardingGateway>) -> Self {
        Self { gateway }
    }

    /// Release vested-but-unreleased value for every due Active order.
    ///
    /// Orders are processed in ascending id order. Local releases credit
    /// the beneficiary's withdrawable balance; interchain releases commit
    /// only after the gateway accepts the hand-off. All missed epochs are
    /// caught up in one call, bounded by each order's total.
    ///
    /// # Errors
    /// Returns `SolvencyViolation` (or `Internal`) only if ledger state is
    /// corrupt; per-order forwarding rejections are reported, not raised.
    pub fn pay_order(&self, ledger: &mut OrderLedger, now: u64) -> Result<PayoutReport> {
        let due = Self::scan_due(ledger, now);
        let mut report = PayoutReport::default();

        for entry in due {
            match entry.destination {
                None => {
                    ledger.commit_local_release(entry.id, entry.amount, now)?;
                    report.released.push((entry.id, entry.amount));
                }
                Some(destination) => {
                    let request = ForwardRequest {
                        domain: destination.domain,
                        address: destination.address,
                        amount: entry.amount,
                        correlation_id: ForwardId::deterministic(entry.id, entry.epochs),
                    };
                    match self.gateway.submit_forward(&request) {
                        ForwardOutcome::Accepted => {
                            ledger.commit_forwarded_release(entry.id, entry.amount, now)?;
                            report.released.push((entry.id, entry.amount));
                        }
                        ForwardOutcome::Rejected(reason) => {
                            tracing::warn!(
                                order = %entry.id,
                                domain = %destination.domain,
                                amount = entry.amount,
                                reason = %reason,
                                "Forwarding rejected; release rolled back"
                            );
                            report.rejected.push((entry.id, reason));
                        }
                    }
                }
            }
            if ledger
                .order(entry.id)
                .is_some_and(|o| o.status == OrderStatus::Completed)
            {
                report.completed.push(entry.id);
            }
        }

        ledger.check_solvency()?;
        tracing::info!(
            now,
            released = report.released.len(),
            total = report.total_released(),
            completed = report.completed.len(),
            rejected = report.rejected.len(),
            "Payout batch complete"
        );
        Ok(report)
    }

    /// Read-only preview: the `(order id, releasable amount)` pairs a
    /// `pay_order` call at `now` would release, ascending ids, non-zero
    /// entries only.
    #[must_use]
    pub fn due_releases(ledger: &OrderLedger, now: u64) -> Vec<(OrderId, u128)> {
        Self::scan_due(ledger, now)
            .into_iter()
            .map(|entry| (entry.id, entry.amount))
            .collect()
    }

    fn scan_due(ledger: &OrderLedger, now: u64) -> Vec<DueRelease> {
        // The arena iterates in ascending id order already.
        ledger
            .store()
            .active()
            .filter_map(|order| {
                let amount = vesting::releasable_amount(order, now);
                if amount == 0 {
                    return None;
                }
                let elapsed = now.clamp(order.start_time, order.end_time) - order.start_time;
                Some(DueRelease {
                    id: order.id,
                    amount,
                    destination: order.destination,
                    epochs: elapsed / order.interval,
                })
            })
            .collect()
    }
}
