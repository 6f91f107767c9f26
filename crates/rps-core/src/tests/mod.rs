//! Cross-module tests.
//!
//! - `determinism.rs`: equal seeds give equal trajectories
//! - `integration.rs`: end-to-end session behavior
//! - `properties.rs`: proptest invariants over random populations
//! - `helpers.rs`: setup utilities and factory functions

mod helpers;
