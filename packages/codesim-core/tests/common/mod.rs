//! Common test utilities for codesim-core
//!
//! This module provides shared fixtures, assertions, and builders
//! for integration and end-to-end tests.

#![allow(dead_code)]

mod assertions;
mod builders;
mod fixtures;

// Re-export all utilities
pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
