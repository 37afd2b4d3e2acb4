//! Test Utilities
//!
//! Builders and fixtures for constructing engine test data with sensible
//! defaults, plus a shared tracing bootstrap so test runs honor
//! `RUST_LOG`. The cross-domain end-to-end suite lives in this crate's
//! `tests/` directory.

pub mod builders;
pub mod fixtures;
pub mod tracing_setup;

pub use builders::{ManualLinesBuilder, TestRuleBuilder, TestTransactionBuilder};
pub use tracing_setup::init_tracing;
