//! Identifiers used throughout OpenVest.
//!
//! `OrderId` is a sequential arena index (ids are assigned in creation
//! order, starting at 1). `AccountId` is a raw 20-byte address and
//! serializes as a `0x`-prefixed hex string so it can key JSON maps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Sequential unique order identifier, assigned at creation, immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl OrderId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// A party's address: the raw 20-byte account identifier.
///
/// Displayed and serialized as `0x`-prefixed lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct AccountId(pub [u8; 20]);

impl AccountId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// First four bytes as hex, for compact log fields.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|e| format!("invalid hex: {e}"))?;
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| "address must be exactly 20 bytes".to_string())?;
        Ok(Self(arr))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// DomainId
// ---------------------------------------------------------------------------

/// Identifier for a remote network domain reachable via forwarding.
///
/// Domain 0 is the empty domain and never resolvable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DomainId(pub u32);

impl DomainId {
    /// The empty (unset) domain.
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ForwardId
// ---------------------------------------------------------------------------

/// Correlation identifier for a forwarding request handed to the
/// cross-domain gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ForwardId(pub Uuid);

impl ForwardId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Deterministic `ForwardId` from order id and release sequence.
    ///
    /// The same release of the same order always maps to the same
    /// correlation id, so a retried hand-off is recognizable downstream.
    #[must_use]
    pub fn deterministic(order_id: OrderId, release_sequence: u64) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"openvest:forward_id:v1:");
        hasher.update(order_id.0.to_le_bytes());
        hasher.update(release_sequence.to_le_bytes());
        let hash = hasher.finalize();
        let bytes: [u8; 16] = hash[..16].try_into().expect("SHA-256 produces 32 bytes");
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for ForwardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ForwardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fwd:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
