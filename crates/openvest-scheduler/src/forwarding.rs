//! Interchain forwarding gateway interface.
//!
//! The gateway is an external collaborator: it accepts a forwarding
//! request and reports success or failure synchronously. On `Accepted`
//! the value is irrevocable from this ledger's perspective: the gateway
//! owns eventual delivery or refund on the remote domain. Remote delivery
//! confirmation is not tracked here.

use openvest_types::{AccountId, DomainId, ForwardId};

/// A single hand-off to the cross-domain messaging collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardRequest {
    pub domain: DomainId,
    pub address: AccountId,
    /// Value to deliver, in native units.
    pub amount: u128,
    /// Correlation id, deterministic per (order, release sequence).
    pub correlation_id: ForwardId,
}

/// Synchronous outcome of a forwarding submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// The gateway took custody of the value.
    Accepted,
    /// The gateway refused the hand-off; the ledger must keep the value.
    Rejected(String),
}

/// Capability interface over the cross-domain transport.
///
/// Implementations must not block the payout batch on remote finality:
/// accept/reject is a local admission decision only.
pub trait ForwardingGateway {
    fn submit_forward(&self, request: &ForwardRequest) -> ForwardOutcome;
}

/// Gateway that accepts every request. Placeholder for deployments with no
/// interchain orders, and a convenient default in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGateway;

impl ForwardingGateway for NullGateway {
    fn submit_forward(&self, _request: &ForwardRequest) -> ForwardOutcome {
        ForwardOutcome::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openvest_types::OrderId;

    #[test]
    fn null_gateway_accepts_everything() {
        let request = ForwardRequest {
            domain: DomainId(7),
            address: AccountId([1u8; 20]),
            amount: 500,
            correlation_id: ForwardId::deterministic(OrderId(1), 0),
        };
        assert_eq!(NullGateway.submit_forward(&request), ForwardOutcome::Accepted);
    }
}
