//! Problem envelope data model
//!
//! This crate provides pure data types for error responses, with no dependencies
//! on HTTP frameworks (axum support is behind the `axum` feature). It includes:
//! - the `Problem` envelope and its `ProblemObject` items
//! - the closed `ProblemType` catalog with fixed status/type/title entries
//! - `ProblemBuilder` for assembling envelopes
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod builder;
pub mod problem;
pub mod problem_type;

// Re-export commonly used types
pub use builder::ProblemBuilder;
pub use problem::{APPLICATION_PROBLEM_JSON, GENERIC_USER_MESSAGE, Problem, ProblemObject};
pub use problem_type::{DEFAULT_TYPE_BASE_URI, ProblemType, ProblemTypeDef};
