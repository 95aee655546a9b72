//! Priority-ordered classification of a cause chain.
#![allow(clippy::non_ascii_literal)] // pt-BR detail texts

use std::error::Error;

use problemkit_envelope::ProblemType;

use crate::chain::ExceptionChain;
use crate::failure::{BodyError, DomainError, ParameterTypeMismatch, UnreadableBody};
use crate::field_path::FieldPathFormatter;
use crate::validation::ValidationFailure;

/// Detail for a body that could not be parsed or bound at all.
pub const UNREADABLE_BODY_DETAIL: &str =
    "O corpo da requisição é inválido, favor verificar erros de sintaxe";

/// Outcome of classifying a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification<'a> {
    /// A domain failure; its message is both detail and user message.
    Domain {
        problem_type: ProblemType,
        message: String,
    },
    InvalidParameter {
        detail: String,
    },
    UnreadableBody {
        detail: String,
    },
    InvalidData {
        failure: &'a ValidationFailure,
    },
    /// Nothing in the chain matched.
    System,
}

impl Classification<'_> {
    #[must_use]
    pub const fn problem_type(&self) -> ProblemType {
        match self {
            Self::Domain { problem_type, .. } => *problem_type,
            Self::InvalidParameter { .. } => ProblemType::InvalidParameter,
            Self::UnreadableBody { .. } => ProblemType::UnreadableBody,
            Self::InvalidData { .. } => ProblemType::InvalidData,
            Self::System => ProblemType::SystemError,
        }
    }
}

/// A classification rule: matches one cause or passes.
pub type Rule = for<'a> fn(&'a (dyn Error + 'static)) -> Option<Classification<'a>>;

/// Rules in priority order. Within one cause the first matching rule wins.
pub const RULES: [Rule; 8] = [
    resource_not_found,
    entity_in_use,
    business_rule,
    parameter_type_mismatch,
    invalid_format,
    property_binding,
    unreadable_body,
    invalid_data,
];

/// Maps an [`ExceptionChain`] to a [`Classification`].
pub struct ExceptionClassifier;

impl ExceptionClassifier {
    /// Classify `chain`, scanning causes from the root cause up to the raised
    /// failure and stopping at the first cause any rule matches.
    ///
    /// The most specific underlying cause wins over generic wrappers: a
    /// not-found raised under a body-parsing wrapper is reported as not-found.
    #[must_use]
    pub fn classify<'a>(chain: &ExceptionChain<'a>) -> Classification<'a> {
        for (from_root, cause) in chain.iter_from_root().enumerate() {
            if let Some(found) = RULES.iter().find_map(|rule| rule(cause)) {
                tracing::debug!(
                    from_root,
                    problem_type = ?found.problem_type(),
                    "failure classified"
                );
                return found;
            }
        }
        Classification::System
    }
}

fn domain_message(
    cause: &(dyn Error + 'static),
    expected: fn(&DomainError) -> bool,
    problem_type: ProblemType,
) -> Option<Classification<'static>> {
    let e = cause.downcast_ref::<DomainError>()?;
    expected(e).then(|| Classification::Domain {
        problem_type,
        message: e.message().to_owned(),
    })
}

fn resource_not_found<'a>(cause: &'a (dyn Error + 'static)) -> Option<Classification<'a>> {
    domain_message(
        cause,
        |e| matches!(e, DomainError::NotFound { .. }),
        ProblemType::ResourceNotFound,
    )
}

fn entity_in_use<'a>(cause: &'a (dyn Error + 'static)) -> Option<Classification<'a>> {
    domain_message(
        cause,
        |e| matches!(e, DomainError::InUse { .. }),
        ProblemType::EntityInUse,
    )
}

fn business_rule<'a>(cause: &'a (dyn Error + 'static)) -> Option<Classification<'a>> {
    domain_message(
        cause,
        |e| matches!(e, DomainError::BusinessRule { .. }),
        ProblemType::BusinessRuleViolation,
    )
}

fn parameter_type_mismatch<'a>(cause: &'a (dyn Error + 'static)) -> Option<Classification<'a>> {
    let e = cause.downcast_ref::<ParameterTypeMismatch>()?;
    Some(Classification::InvalidParameter {
        detail: format!(
            "O parâmetro de URL '{}' recebeu um valor '{}' que é do tipo inválido, por gentileza informe um valor do tipo '{}'",
            e.name, e.value, e.required_type
        ),
    })
}

fn invalid_format<'a>(cause: &'a (dyn Error + 'static)) -> Option<Classification<'a>> {
    let BodyError::InvalidFormat {
        path,
        value,
        target_type,
    } = cause.downcast_ref::<BodyError>()?
    else {
        return None;
    };
    Some(Classification::UnreadableBody {
        detail: format!(
            "O parâmetro '{}' recebeu um valor '{value}' que não é compatível. Por gentileza verificar, o correto é o tipo '{target_type}'",
            FieldPathFormatter::format(path)
        ),
    })
}

fn property_binding<'a>(cause: &'a (dyn Error + 'static)) -> Option<Classification<'a>> {
    let detail = match cause.downcast_ref::<BodyError>()? {
        BodyError::IgnoredProperty { path } => format!(
            "O campo '{}' está sendo ignorado e não deve ser enviado na requisição.",
            FieldPathFormatter::format(path)
        ),
        BodyError::UnrecognizedProperty { path } => format!(
            "O campo '{}' não existe, por gentileza verificar",
            FieldPathFormatter::format(path)
        ),
        BodyError::InvalidFormat { .. } => return None,
    };
    Some(Classification::UnreadableBody { detail })
}

fn unreadable_body<'a>(cause: &'a (dyn Error + 'static)) -> Option<Classification<'a>> {
    (cause.is::<UnreadableBody>() || cause.is::<serde_json::Error>()).then(|| {
        Classification::UnreadableBody {
            detail: UNREADABLE_BODY_DETAIL.to_owned(),
        }
    })
}

fn invalid_data<'a>(cause: &'a (dyn Error + 'static)) -> Option<Classification<'a>> {
    cause
        .downcast_ref::<ValidationFailure>()
        .map(|failure| Classification::InvalidData { failure })
}
