//! Order model for the OpenVest ledger.
//!
//! An [`Order`] locks a native-unit value amount against a beneficiary and
//! releases it linearly between `start_time` and `end_time`, quantized to
//! whole `interval`-length epochs. Orders are stored append-only: terminal
//! orders stay in the arena as an audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, DomainId, OrderId};

/// Lifecycle status of an order.
///
/// Transitions are monotonic: `Active → Completed` (fully paid out at or
/// after `end_time`) or `Active → Cancelled` (deleted by its creator).
/// There is no transition out of a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderStatus {
    Active,
    Completed,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Remote delivery target for an interchain order.
///
/// Releases of an order carrying a destination are handed to the
/// forwarding gateway instead of credited locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub domain: DomainId,
    pub address: AccountId,
}

/// Caller-supplied parameters shared by both order creation entry points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderParams {
    /// Opaque label, no uniqueness constraint.
    pub name: String,
    /// Value locked at creation, in native units.
    pub total_amount: u128,
    /// Vesting window start (UNIX seconds).
    pub start_time: u64,
    /// Vesting window end (UNIX seconds); must be after `start_time`.
    pub end_time: u64,
    /// Payout epoch length in seconds; must be nonzero.
    pub interval: u64,
    /// Address that receives releases.
    pub beneficiary: AccountId,
}

/// A locked-value record scheduled for time-gated release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub name: String,
    pub total_amount: u128,
    /// Cumulative value already paid out; never exceeds `total_amount`.
    pub released_amount: u128,
    pub start_time: u64,
    pub end_time: u64,
    pub interval: u64,
    pub beneficiary: AccountId,
    /// Address that funded the order; owns edit/delete rights.
    pub creator: AccountId,
    pub destination: Option<Destination>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Value still locked: `total_amount - released_amount`.
    #[must_use]
    pub fn remaining(&self) -> u128 {
        self.total_amount - self.released_amount
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == OrderStatus::Active
    }

    /// Length of the vesting window in seconds.
    #[must_use]
    pub fn duration(&self) -> u64 {
        self.end_time - self.start_time
    }

    /// Whether releases route through the forwarding gateway.
    #[must_use]
    pub fn is_interchain(&self) -> bool {
        self.destination.is_some()
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy(total_amount: u128, start_time: u64, end_time: u64, interval: u64) -> Self {
        Self {
            id: OrderId(1),
            name: "test".to_string(),
            total_amount,
            released_amount: 0,
            start_time,
            end_time,
            interval,
            beneficiary: AccountId([0xbe; 20]),
            creator: AccountId([0xcc; 20]),
            destination: None,
            status: OrderStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn dummy_interchain(
        total_amount: u128,
        start_time: u64,
        end_time: u64,
        interval: u64,
        domain: DomainId,
    ) -> Self {
        Self {
            destination: Some(Destination {
                domain,
                address: AccountId([0xdd; 20]),
            }),
            ..Self::dummy(total_amount, start_time, end_time, interval)
        }
    }
}
