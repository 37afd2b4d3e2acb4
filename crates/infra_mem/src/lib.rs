//! In-Memory Storage Adapter
//!
//! Implements the ledger and finance storage ports over process memory.
//! Sessions are fully serialized behind one async mutex and roll back on
//! drop, giving the same atomicity and isolation guarantees the engine
//! expects from a SQL transaction: no intermediate state is ever visible,
//! and uniqueness constraints are enforced on insert with the normalized
//! [`core_kernel::StoreError::UniqueViolation`] signal.
//!
//! This is both the reference adapter for embedding the engine and the
//! test double used across the workspace.

pub mod store;

pub use store::MemStore;
