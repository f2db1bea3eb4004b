//! Test Utilities Crate
//!
//! Provides shared test infrastructure for the claim engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data construction
//! - `harness`: A fully wired engine over in-memory ports

pub mod fixtures;
pub mod builders;
pub mod harness;

pub use fixtures::*;
pub use builders::*;
pub use harness::*;
