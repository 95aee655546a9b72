//! YAML failure fixtures: a description of a raised failure that the CLI
//! rebuilds into real error values before dispatching it.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use problemkit::{
    BodyError, BoxError, DomainError, FieldLocation, ParameterTypeMismatch, RequestContext,
    StatusHint, UnreadableBody, ValidationFailure, Violation,
};

/// Errors a fixture can describe that the library has no type for.
#[derive(thiserror::Error, Debug)]
pub enum FixtureError {
    /// A framework-style wrapper around another failure.
    #[error("{message}")]
    Wrapped {
        message: String,
        #[source]
        source: BoxError,
    },
    /// A failure no classification rule knows.
    #[error("{0}")]
    Unclassified(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub instance: Option<String>,
    #[serde(default)]
    pub trace_id: Option<String>,
    /// Path of a request no route matched.
    #[serde(default)]
    pub no_handler: Option<String>,
    pub failure: FailureSpec,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum FailureSpec {
    NotFound {
        message: String,
    },
    EntityNotFound {
        entity: String,
        id: String,
    },
    InUse {
        message: String,
    },
    EntityInUse {
        entity: String,
        id: String,
    },
    BusinessRule {
        message: String,
    },
    ParameterMismatch {
        name: String,
        value: String,
        required_type: String,
    },
    InvalidFormat {
        path: String,
        value: String,
        target_type: String,
    },
    IgnoredProperty {
        path: String,
    },
    UnrecognizedProperty {
        path: String,
    },
    UnreadableBody {
        message: String,
        #[serde(default)]
        cause: Option<Box<FailureSpec>>,
    },
    /// A body that must fail JSON parsing.
    MalformedJson {
        body: String,
    },
    Validation {
        object: String,
        #[serde(default)]
        violations: Vec<ViolationSpec>,
    },
    Wrapped {
        message: String,
        cause: Box<FailureSpec>,
    },
    Unclassified {
        message: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViolationSpec {
    /// Dotted field path; absent for object-level violations.
    #[serde(default)]
    pub field: Option<String>,
    pub code: String,
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub default_message: Option<String>,
}

impl Fixture {
    /// Read and parse a fixture file.
    ///
    /// # Errors
    /// Fails if the file cannot be read or is not a valid fixture.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        serde_saphyr::from_str(&raw)
            .with_context(|| format!("invalid fixture {}", path.display()))
    }

    #[must_use]
    pub fn context(&self) -> RequestContext {
        RequestContext {
            status_hint: self
                .no_handler
                .clone()
                .map(|path| StatusHint::NoHandlerFound { path }),
            instance: self.instance.clone(),
            trace_id: self.trace_id.clone(),
        }
    }
}

impl FailureSpec {
    /// Build the failure this spec describes.
    ///
    /// # Errors
    /// Fails for a `malformed_json` body that is in fact valid JSON.
    pub fn build(self) -> Result<BoxError> {
        let failure: BoxError = match self {
            Self::NotFound { message } => Box::new(DomainError::not_found(message)),
            Self::EntityNotFound { entity, id } => {
                Box::new(DomainError::entity_not_found(&entity, id))
            }
            Self::InUse { message } => Box::new(DomainError::in_use(message)),
            Self::EntityInUse { entity, id } => Box::new(DomainError::entity_in_use(&entity, id)),
            Self::BusinessRule { message } => Box::new(DomainError::business_rule(message)),
            Self::ParameterMismatch {
                name,
                value,
                required_type,
            } => Box::new(ParameterTypeMismatch::new(name, value, required_type)),
            Self::InvalidFormat {
                path,
                value,
                target_type,
            } => Box::new(BodyError::invalid_format(
                FieldLocation::parse(&path),
                value,
                target_type,
            )),
            Self::IgnoredProperty { path } => {
                Box::new(BodyError::ignored_property(FieldLocation::parse(&path)))
            }
            Self::UnrecognizedProperty { path } => {
                Box::new(BodyError::unrecognized_property(FieldLocation::parse(&path)))
            }
            Self::UnreadableBody { message, cause } => match cause {
                Some(cause) => Box::new(UnreadableBody::with_source(message, cause.build()?)),
                None => Box::new(UnreadableBody::new(message)),
            },
            Self::MalformedJson { body } => {
                match serde_json::from_str::<serde_json::Value>(&body) {
                    Ok(_) => bail!("malformed_json body parses as valid JSON"),
                    Err(e) => Box::new(e),
                }
            }
            Self::Validation { object, violations } => {
                let mut failure = ValidationFailure::new(object);
                for v in violations {
                    failure.push(v.into_violation());
                }
                Box::new(failure)
            }
            Self::Wrapped { message, cause } => Box::new(FixtureError::Wrapped {
                message,
                source: cause.build()?,
            }),
            Self::Unclassified { message } => Box::new(FixtureError::Unclassified(message)),
        };
        Ok(failure)
    }
}

impl ViolationSpec {
    fn into_violation(self) -> Violation {
        let violation = match self.field {
            Some(field) => Violation::field(field, self.code),
            None => Violation::object(self.code),
        }
        .with_arguments(self.arguments);
        match self.default_message {
            Some(message) => violation.with_default_message(message),
            None => violation,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Fixture {
        serde_saphyr::from_str(yaml).unwrap()
    }

    #[test]
    fn nested_fixture_builds_a_source_chain() {
        let fixture = parse(
            r"
failure:
  kind: unreadable_body
  message: bad body
  cause:
    kind: not_found
    message: gone
",
        );
        let failure = fixture.failure.build().unwrap();
        let cause = failure.source().unwrap();
        assert!(cause.downcast_ref::<DomainError>().is_some());
    }

    #[test]
    fn validation_fixture_keeps_violation_order() {
        let fixture = parse(
            r"
failure:
  kind: validation
  object: restaurante
  violations:
    - field: nome
      code: NotBlank
    - code: ValorZeroIncluiDescricao
",
        );
        let failure = fixture.failure.build().unwrap();
        let validation = failure.downcast_ref::<ValidationFailure>().unwrap();
        assert_eq!(validation.violations.len(), 2);
        assert_eq!(validation.violations[0].code(), "NotBlank");
    }

    #[test]
    fn valid_json_is_rejected_as_malformed_fixture() {
        let fixture = parse("failure:\n  kind: malformed_json\n  body: '{}'\n");
        assert!(fixture.failure.build().is_err());
    }

    #[test]
    fn context_carries_hint_and_ids() {
        let fixture = parse(
            "no_handler: /nada\ninstance: /nada\ntrace_id: t-1\nfailure:\n  kind: unclassified\n  message: x\n",
        );
        let ctx = fixture.context();
        assert_eq!(
            ctx.status_hint,
            Some(StatusHint::NoHandlerFound {
                path: "/nada".to_owned()
            })
        );
        assert_eq!(ctx.trace_id.as_deref(), Some("t-1"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let parsed: Result<Fixture, _> = serde_saphyr::from_str("failure:\n  kind: meteor\n");
        assert!(parsed.is_err());
    }
}
