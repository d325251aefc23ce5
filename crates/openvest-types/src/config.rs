//! Configuration for an OpenVest ledger deployment.

use serde::{Deserialize, Serialize};

use crate::DomainId;

/// Deployment configuration for a ledger instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Path to the data directory (snapshots).
    pub data_dir: String,
    /// Remote domains the forwarding gateway can reach. Interchain order
    /// creation is rejected for any domain outside this registry.
    pub known_domains: Vec<DomainId>,
}

impl LedgerConfig {
    /// Whether a domain is resolvable from this deployment.
    #[must_use]
    pub fn resolves(&self, domain: DomainId) -> bool {
        !domain.is_empty() && self.known_domains.contains(&domain)
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            known_domains: Vec::new(),
        }
    }
}
