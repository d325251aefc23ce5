//! # openvest-ledger
//!
//! **Custody plane**: the durable order arena, the lifecycle engine that
//! validates and applies create/edit/delete/withdraw operations, the
//! per-address withdrawable balance book, and the custody-conservation
//! tracker behind the solvency invariant.
//!
//! ## Architecture
//!
//! 1. **OrderStore**: append-only arena of orders keyed by sequential id
//! 2. **BalanceBook**: per-address withdrawable balances (accrue-then-withdraw)
//! 3. **CustodyBook**: deposits/releases/refunds tallies; verifies that the
//!    arena's locked total matches what custody has tracked
//! 4. **OrderLedger**: the single serialization point; every operation
//!    takes `&mut OrderLedger` and validates fully before mutating
//!
//! ## Operation Flow
//!
//! ```text
//! caller → OrderLedger::create_order() → OrderStore.insert() + CustodyBook.record_deposit()
//!        → [scheduler] commit_local_release() / commit_forwarded_release()
//!        → OrderLedger::withdraw() → BalanceBook.withdraw()
//! ```

pub mod balance_book;
pub mod custody;
pub mod engine;
pub mod store;

pub use balance_book::BalanceBook;
pub use custody::CustodyBook;
pub use engine::OrderLedger;
pub use store::OrderStore;
