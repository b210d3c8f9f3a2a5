//! Crate-level test suites.
//!
//! - `helpers.rs`: session/entity factories shared by the suites
//! - `integration.rs`: end-to-end verb and physics scenarios
//! - `determinism.rs`: identical inputs produce identical worlds

mod helpers;

pub use helpers::*;
