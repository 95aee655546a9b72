//! Failure classification into problem envelopes
//!
//! Turns any raised failure into one [`Problem`]:
//! - [`RootCauseResolver`] walks the `source()` chain of the failure
//! - [`ExceptionClassifier`] picks the category from the deepest matching cause
//! - [`ValidationErrorCollector`] turns constraint violations into field-level objects
//! - [`ProblemDispatcher`] ties it together and guarantees a safe fallback
//!
//! ```
//! use problemkit::{DomainError, ProblemDispatcher, RequestContext};
//!
//! let dispatcher = ProblemDispatcher::default();
//! let problem = dispatcher.dispatch(
//!     &DomainError::entity_not_found("cozinha", 9),
//!     &RequestContext::default(),
//! );
//! assert_eq!(problem.status().as_u16(), 404);
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod chain;
pub mod classify;
pub mod config;
pub mod dispatcher;
pub mod failure;
pub mod field_path;
pub mod messages;
pub mod validation;

pub use chain::{ExceptionChain, MAX_CHAIN_DEPTH, RootCauseResolver};
pub use classify::{Classification, ExceptionClassifier, RULES, Rule};
pub use config::{ConfigError, LoggingConfig, ProblemsConfig};
pub use dispatcher::{DispatchError, ProblemDispatcher, RequestContext, StatusHint};
pub use failure::{BodyError, BoxError, DomainError, ParameterTypeMismatch, UnreadableBody};
pub use field_path::{FieldLocation, FieldPathFormatter};
pub use messages::{Locale, MessageCatalog, MessageError, MessageResolver};
pub use validation::{ValidationErrorCollector, ValidationFailure, Violation, ViolationScope};

// Envelope types, so callers need only this crate
pub use problemkit_envelope::{
    APPLICATION_PROBLEM_JSON, GENERIC_USER_MESSAGE, Problem, ProblemBuilder, ProblemObject,
    ProblemType,
};
