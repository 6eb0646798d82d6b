//! Feature modules
//!
//! Each feature follows the same layout:
//! - `domain`: models and pure logic
//! - `infrastructure`: algorithms and adapters to external systems

pub mod normalization;
pub mod submission;
pub mod tiling;
pub mod tokenization;
