//! # openvest-scheduler
//!
//! **Payout plane**: computes vested-but-unreleased value for every Active
//! order and releases it, either into the beneficiary's withdrawable
//! balance or through the interchain forwarding gateway.
//!
//! There is no background timer anywhere: time advances only as observed
//! via the caller's `now`, so payout is caller-triggered and tolerates
//! arbitrarily late calls (all missed epochs are paid in one batch,
//! bounded by each order's total).
//!
//! ## Payout Flow
//!
//! ```text
//! caller → PayoutScheduler::pay_order(ledger, now)
//!        → vesting::releasable_amount(order, now) per Active order
//!        → local:      OrderLedger::commit_local_release()
//!        → interchain: ForwardingGateway::submit_forward()
//!                      └ Accepted → OrderLedger::commit_forwarded_release()
//!                      └ Rejected → reported, order untouched
//! ```

pub mod forwarding;
pub mod payout;
pub mod vesting;

pub use forwarding::{ForwardOutcome, ForwardRequest, ForwardingGateway, NullGateway};
pub use payout::{PayoutReport, PayoutScheduler};
