//! Keyed server status storage.
//!
//! [`StatusStore`] is the only shared mutable resource of the relay. Every operation touches a
//! single row, so implementations only need per-row atomicity. Rows are provisioned outside the
//! relay; updates against a missing row are no-ops.

mod base;
pub mod memory;
pub mod postgres;

pub use base::StatusStore;
