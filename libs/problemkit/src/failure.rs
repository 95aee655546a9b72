//! Failures callers raise for classification.
//!
//! Domain code raises [`DomainError`]; request plumbing raises the structural
//! failures ([`ParameterTypeMismatch`], [`BodyError`], [`UnreadableBody`],
//! [`crate::ValidationFailure`]). Any of them may be wrapped inside other
//! errors; classification walks `source()` links to find them.
#![allow(clippy::non_ascii_literal)] // pt-BR messages

use std::fmt::Display;

use thiserror::Error;

use crate::field_path::FieldLocation;

/// Boxed error usable as a cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures raised by business code with a category already decided.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The entity addressed by the request does not exist.
    #[error("{message}")]
    NotFound { message: String },

    /// The entity cannot be changed because other records reference it.
    #[error("{message}")]
    InUse { message: String },

    /// A business rule rejected the operation.
    #[error("{message}")]
    BusinessRule { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Not-found failure for an entity looked up by id.
    pub fn entity_not_found(entity: &str, id: impl Display) -> Self {
        Self::not_found(format!(
            "Não existe um cadastro de {entity} com código {id}"
        ))
    }

    pub fn in_use(message: impl Into<String>) -> Self {
        Self::InUse {
            message: message.into(),
        }
    }

    /// In-use failure for an entity that is still referenced.
    pub fn entity_in_use(entity: &str, id: impl Display) -> Self {
        Self::in_use(format!(
            "O cadastro de {entity} de código {id} não pode ser removido, pois está em uso"
        ))
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRule {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message } | Self::InUse { message } | Self::BusinessRule { message } => {
                message
            }
        }
    }
}

/// A URL path or query parameter could not be converted to its declared type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parameter '{name}' got value '{value}', expected {required_type}")]
pub struct ParameterTypeMismatch {
    pub name: String,
    pub value: String,
    pub required_type: String,
}

impl ParameterTypeMismatch {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        required_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            required_type: required_type.into(),
        }
    }
}

/// Structural failures found while binding a request body to its target shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BodyError {
    /// A value could not be converted to the field's type.
    #[error("invalid value '{value}' for '{path}', expected {target_type}")]
    InvalidFormat {
        path: FieldLocation,
        value: String,
        target_type: String,
    },

    /// The body sets a field that is marked as ignored on the target shape.
    #[error("ignored property '{path}'")]
    IgnoredProperty { path: FieldLocation },

    /// The body sets a field the target shape does not have.
    #[error("unrecognized property '{path}'")]
    UnrecognizedProperty { path: FieldLocation },
}

impl BodyError {
    pub fn invalid_format(
        path: impl Into<FieldLocation>,
        value: impl Into<String>,
        target_type: impl Into<String>,
    ) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            value: value.into(),
            target_type: target_type.into(),
        }
    }

    pub fn ignored_property(path: impl Into<FieldLocation>) -> Self {
        Self::IgnoredProperty { path: path.into() }
    }

    pub fn unrecognized_property(path: impl Into<FieldLocation>) -> Self {
        Self::UnrecognizedProperty { path: path.into() }
    }

    #[must_use]
    pub const fn path(&self) -> &FieldLocation {
        match self {
            Self::InvalidFormat { path, .. }
            | Self::IgnoredProperty { path }
            | Self::UnrecognizedProperty { path } => path,
        }
    }
}

/// The request body could not be read at all, or reading it failed for the
/// wrapped reason.
#[derive(Error, Debug)]
#[error("unreadable request body: {message}")]
pub struct UnreadableBody {
    pub message: String,
    #[source]
    pub source: Option<BoxError>,
}

impl UnreadableBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl From<serde_json::Error> for UnreadableBody {
    fn from(e: serde_json::Error) -> Self {
        Self::with_source(e.to_string(), e)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::non_ascii_literal)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn domain_error_displays_its_message() {
        let e = DomainError::business_rule("Status do pedido X não pode ser alterado");
        assert_eq!(e.to_string(), "Status do pedido X não pode ser alterado");
        assert_eq!(e.message(), e.to_string());
    }

    #[test]
    fn entity_constructors_name_entity_and_id() {
        let e = DomainError::entity_not_found("cidade", 42);
        assert!(matches!(e, DomainError::NotFound { .. }));
        assert!(e.message().contains("cidade"));
        assert!(e.message().contains("42"));

        let e = DomainError::entity_in_use("cozinha", 1);
        assert!(matches!(e, DomainError::InUse { .. }));
        assert!(e.message().contains("em uso"));
    }

    #[test]
    fn unreadable_body_exposes_its_cause() {
        let e = UnreadableBody::with_source("bad", DomainError::not_found("x"));
        let cause = e.source().unwrap();
        assert!(cause.downcast_ref::<DomainError>().is_some());
        assert!(UnreadableBody::new("bad").source().is_none());
    }

    #[test]
    fn serde_json_errors_become_unreadable_bodies() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = UnreadableBody::from(err);
        assert!(e.source().unwrap().is::<serde_json::Error>());
    }

    #[test]
    fn body_error_path_is_shared_across_variants() {
        let e = BodyError::unrecognized_property(vec!["cozinha", "apelido"]);
        assert_eq!(e.path().to_string(), "cozinha.apelido");
        assert_eq!(e.to_string(), "unrecognized property 'cozinha.apelido'");
    }
}
