//! Error types for the OpenVest ledger.
//!
//! All errors use the `OV_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order lifecycle errors
//! - 2xx: Balance errors
//! - 3xx: Forwarding errors
//! - 8xx: Safety errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{AccountId, OrderId, OrderStatus};

/// Central error enum for all OpenVest operations.
///
/// Every rejected operation is reported with a specific kind, never a
/// generic failure; all validation errors are raised before any state
/// mutation.
#[derive(Debug, Error)]
pub enum OpenvestError {
    // =================================================================
    // Order Lifecycle Errors (1xx)
    // =================================================================
    /// The requested order id is unknown.
    #[error("OV_ERR_100: Order not found: {0}")]
    NotFound(OrderId),

    /// The payout schedule is internally inconsistent.
    #[error("OV_ERR_101: Invalid schedule: {reason}")]
    InvalidSchedule { reason: String },

    /// The value transferred with the call does not match the declared amount.
    #[error("OV_ERR_102: Funding mismatch: declared {declared}, funded {funded}")]
    FundingMismatch { declared: u128, funded: u128 },

    /// The caller is not the order's creator.
    #[error("OV_ERR_103: Forbidden: {caller} is not the creator of {order}")]
    Forbidden { order: OrderId, caller: AccountId },

    /// The order is in a terminal state and cannot be mutated.
    #[error("OV_ERR_104: Invalid state: {order} is {status}, not ACTIVE")]
    InvalidState {
        order: OrderId,
        status: OrderStatus,
    },

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// The caller has no withdrawable balance to pull.
    #[error("OV_ERR_200: Nothing to withdraw for {0}")]
    NothingToWithdraw(AccountId),

    /// A balance credit would overflow the native-unit accumulator.
    #[error("OV_ERR_201: Balance overflow crediting {account}")]
    BalanceOverflow { account: AccountId },

    // =================================================================
    // Forwarding Errors (3xx)
    // =================================================================
    /// The interchain destination is empty or unresolvable.
    #[error("OV_ERR_300: Invalid destination: {reason}")]
    InvalidDestination { reason: String },

    /// The forwarding gateway rejected a hand-off for this order.
    #[error("OV_ERR_301: Forwarding rejected for {order}: {reason}")]
    ForwardingRejected { order: OrderId, reason: String },

    // =================================================================
    // Safety Errors (8xx)
    // =================================================================
    /// Solvency invariant violated. Critical safety alert.
    #[error("OV_ERR_800: Solvency violation: {reason}")]
    SolvencyViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("OV_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("OV_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config, missing fields, etc.).
    #[error("OV_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (disk).
    #[error("OV_ERR_903: I/O error: {0}")]
    Io(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OpenvestError>;

// Conversion from std::io::Error
impl From<std::io::Error> for OpenvestError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = OpenvestError::NotFound(OrderId(7));
        let msg = format!("{err}");
        assert!(msg.starts_with("OV_ERR_100"), "Got: {msg}");
        assert!(msg.contains("order:7"));
    }

    #[test]
    fn funding_mismatch_display() {
        let err = OpenvestError::FundingMismatch {
            declared: 20,
            funded: 19,
        };
        let msg = format!("{err}");
        assert!(msg.contains("OV_ERR_102"));
        assert!(msg.contains("20"));
        assert!(msg.contains("19"));
    }

    #[test]
    fn invalid_state_names_status() {
        let err = OpenvestError::InvalidState {
            order: OrderId(3),
            status: OrderStatus::Cancelled,
        };
        let msg = format!("{err}");
        assert!(msg.contains("OV_ERR_104"));
        assert!(msg.contains("CANCELLED"));
    }

    #[test]
    fn all_errors_have_ov_err_prefix() {
        let account = AccountId([1u8; 20]);
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(OpenvestError::InvalidSchedule {
                reason: "test".into(),
            }),
            Box::new(OpenvestError::Forbidden {
                order: OrderId(1),
                caller: account,
            }),
            Box::new(OpenvestError::NothingToWithdraw(account)),
            Box::new(OpenvestError::InvalidDestination {
                reason: "test".into(),
            }),
            Box::new(OpenvestError::ForwardingRejected {
                order: OrderId(1),
                reason: "remote down".into(),
            }),
            Box::new(OpenvestError::SolvencyViolation {
                reason: "test".into(),
            }),
            Box::new(OpenvestError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("OV_ERR_"),
                "Error missing OV_ERR_ prefix: {msg}"
            );
        }
    }
}
