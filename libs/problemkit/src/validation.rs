//! Constraint violations and their conversion into problem objects.
#![allow(clippy::non_ascii_literal)] // pt-BR fallback message

use thiserror::Error;

use problemkit_envelope::ProblemObject;

use crate::field_path::{FieldLocation, FieldPathFormatter};
use crate::messages::{Locale, MessageResolver};

/// What a violation is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationScope {
    /// The object as a whole (cross-field rules).
    Object,
    /// A single, possibly nested, field.
    Field(FieldLocation),
}

/// One failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    scope: ViolationScope,
    code: String,
    arguments: Vec<String>,
    default_message: Option<String>,
}

impl Violation {
    /// Violation of constraint `code` on the field at `path`.
    ///
    /// An empty path makes the violation object-scoped.
    pub fn field(path: impl Into<FieldLocation>, code: impl Into<String>) -> Self {
        let path = path.into();
        let scope = if path.is_empty() {
            ViolationScope::Object
        } else {
            ViolationScope::Field(path)
        };
        Self::new(scope, code)
    }

    /// Violation of constraint `code` on the object as a whole.
    pub fn object(code: impl Into<String>) -> Self {
        Self::new(ViolationScope::Object, code)
    }

    fn new(scope: ViolationScope, code: impl Into<String>) -> Self {
        Self {
            scope,
            code: code.into(),
            arguments: Vec::new(),
            default_message: None,
        }
    }

    /// Template arguments, bound to `{1}`, `{2}`, ... in order.
    #[must_use]
    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    /// Template used when the catalog has none for this code.
    #[must_use]
    pub fn with_default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = Some(message.into());
        self
    }

    #[must_use]
    pub const fn scope(&self) -> &ViolationScope {
        &self.scope
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    #[must_use]
    pub fn default_message(&self) -> Option<&str> {
        self.default_message.as_deref()
    }
}

/// Binding or constraint validation of a request object failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation of '{object_name}' failed with {} violation(s)", .violations.len())]
pub struct ValidationFailure {
    pub object_name: String,
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            violations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_violation(mut self, violation: Violation) -> Self {
        self.violations.push(violation);
        self
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Turns a [`ValidationFailure`] into ordered [`ProblemObject`]s.
pub struct ValidationErrorCollector<'r> {
    resolver: &'r dyn MessageResolver,
}

impl<'r> ValidationErrorCollector<'r> {
    /// Messages are always resolved in Brazilian Portuguese, whatever the
    /// request asked for.
    pub const RESOLUTION_LOCALE: Locale = Locale::PT_BR;

    #[must_use]
    pub fn new(resolver: &'r dyn MessageResolver) -> Self {
        Self { resolver }
    }

    /// One object per violation, in the order the violations were raised.
    ///
    /// A violation whose message cannot be resolved gets a generic message
    /// for its name instead; nothing is dropped.
    #[must_use]
    pub fn collect(&self, failure: &ValidationFailure) -> Vec<ProblemObject> {
        failure
            .violations
            .iter()
            .map(|violation| {
                let name = match violation.scope() {
                    ViolationScope::Field(path) => FieldPathFormatter::format(path),
                    ViolationScope::Object => failure.object_name.clone(),
                };
                let message = self
                    .resolver
                    .resolve(&failure.object_name, violation, &Self::RESOLUTION_LOCALE)
                    .unwrap_or_else(|e| {
                        tracing::warn!(
                            error = %e,
                            object = %failure.object_name,
                            code = violation.code(),
                            "violation message not resolved, using fallback"
                        );
                        fallback_message(&name)
                    });
                ProblemObject::new(name, message)
            })
            .collect()
    }
}

fn fallback_message(name: &str) -> String {
    format!("O valor informado para '{name}' é inválido")
}
