//! # openvest-types
//!
//! Shared types, errors, and configuration for the **OpenVest**
//! scheduled-payout ledger.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderId`], [`AccountId`], [`DomainId`], [`ForwardId`]
//! - **Order model**: [`Order`], [`OrderStatus`], [`OrderParams`], [`Destination`]
//! - **Configuration**: [`LedgerConfig`]
//! - **Errors**: [`OpenvestError`] with `OV_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod order;

// Re-export all primary types at crate root for ergonomic imports:
//   use openvest_types::{Order, OrderStatus, AccountId, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use order::*;

// Constants are accessed via `openvest_types::constants::FOO`
// (not re-exported to avoid name collisions).
