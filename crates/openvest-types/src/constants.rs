//! System-wide constants for the OpenVest ledger.

/// Maximum value an order may lock, in native units (2^96).
///
/// Leaves 32 bits of headroom in `u128` for the vesting product
/// `total_amount * quantized_elapsed`; products past that saturate.
pub const MAX_ORDER_AMOUNT: u128 = 1 << 96;

/// Current snapshot envelope version accepted by the persistence layer.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Default snapshot file name inside the data directory.
pub const SNAPSHOT_FILE_NAME: &str = "ledger.json";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenVest";
