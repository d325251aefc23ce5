//! Linear, epoch-quantized vesting arithmetic.
//!
//! Vesting is a pure function of `(order, now)`:
//!
//! ```text
//! elapsed    = clamp(now, start, end) - start
//! epochs     = elapsed / interval              (integer division)
//! vested     = min(total, total * (epochs * interval) / (end - start))
//! releasable = vested - released
//! ```
//!
//! At or after `end_time` the whole amount has vested regardless of epoch
//! alignment, so a window whose length is not a multiple of `interval`
//! still drains completely on the final payout.

use openvest_types::Order;

/// Value vested by `now`, in native units.
///
/// Monotonically non-decreasing in `now` and never above
/// `order.total_amount`. Orders still inside their first epoch vest zero.
#[must_use]
pub fn vested_amount(order: &Order, now: u64) -> u128 {
    if now >= order.end_time {
        return order.total_amount;
    }
    let elapsed = now.clamp(order.start_time, order.end_time) - order.start_time;
    let epochs = elapsed / order.interval;
    // epochs * interval <= elapsed, so this cannot overflow u64.
    let quantized = epochs * order.interval;
    let duration = order.duration();
    order
        .total_amount
        .checked_mul(u128::from(quantized))
        .map_or(order.total_amount, |n| n / u128::from(duration))
        .min(order.total_amount)
}

/// Vested-but-unreleased value for an order at `now`.
#[must_use]
pub fn releasable_amount(order: &Order, now: u64) -> u128 {
    vested_amount(order, now).saturating_sub(order.released_amount)
}
