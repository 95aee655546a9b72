//! Entry point: any failure in, one [`Problem`] out.
#![allow(clippy::non_ascii_literal)] // pt-BR detail texts

use std::error::Error;
use std::sync::Arc;

use problemkit_envelope::{GENERIC_USER_MESSAGE, Problem, ProblemBuilder, ProblemType};

use crate::chain::RootCauseResolver;
use crate::classify::{Classification, ExceptionClassifier};
use crate::config::ProblemsConfig;
use crate::failure::DomainError;
use crate::messages::{MessageCatalog, MessageResolver};
use crate::validation::{ValidationErrorCollector, ValidationFailure};

/// Detail and user message of the invalid-data envelope.
pub const INVALID_DATA_MESSAGE: &str =
    "Um ou mais campos estão inválidos. Faça o preenchimento correto e tente novamente";

/// Hints the transport layer can pass along with a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusHint {
    /// No route matched the request; answered as resource-not-found.
    NoHandlerFound { path: String },
}

/// Request facts that shape the envelope but not its category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub status_hint: Option<StatusHint>,
    pub instance: Option<String>,
    pub trace_id: Option<String>,
}

impl RequestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_status_hint(mut self, hint: StatusHint) -> Self {
        self.status_hint = Some(hint);
        self
    }

    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

/// Invariant breaches found while building an envelope.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("validation failure for '{object_name}' carries no violations")]
    EmptyValidation { object_name: String },
}

/// Turns failures into [`Problem`] envelopes.
///
/// Stateless apart from its configuration and message resolver, so one
/// instance can be shared across request handlers.
#[derive(Clone)]
pub struct ProblemDispatcher {
    config: ProblemsConfig,
    resolver: Arc<dyn MessageResolver>,
}

impl Default for ProblemDispatcher {
    fn default() -> Self {
        Self::new(ProblemsConfig::default(), MessageCatalog::pt_br())
    }
}

impl std::fmt::Debug for ProblemDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProblemDispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ProblemDispatcher {
    #[must_use]
    pub fn new(config: ProblemsConfig, resolver: Arc<dyn MessageResolver>) -> Self {
        Self { config, resolver }
    }

    #[must_use]
    pub const fn config(&self) -> &ProblemsConfig {
        &self.config
    }

    /// Build the envelope for `failure`. Never fails: anything that cannot be
    /// classified, or breaks an internal invariant, becomes a system error
    /// whose texts reveal nothing about the failure.
    #[must_use]
    pub fn dispatch(&self, failure: &(dyn Error + 'static), ctx: &RequestContext) -> Problem {
        if let Some(StatusHint::NoHandlerFound { path }) = &ctx.status_hint {
            return self.no_handler_found(path, ctx);
        }

        match self.try_build(failure, ctx) {
            Ok(problem) => problem,
            Err(e) => {
                tracing::error!(error = %e, "problem envelope invariant broken, answering with system error");
                self.system_error(ctx)
            }
        }
    }

    fn try_build(
        &self,
        failure: &(dyn Error + 'static),
        ctx: &RequestContext,
    ) -> Result<Problem, DispatchError> {
        let chain = RootCauseResolver::resolve(failure);
        let problem = match ExceptionClassifier::classify(&chain) {
            Classification::Domain {
                problem_type,
                message,
            } => self
                .builder(problem_type, message.clone(), ctx)
                .user_message(message)
                .build(),
            Classification::InvalidParameter { detail } => self
                .builder(ProblemType::InvalidParameter, detail, ctx)
                .user_message(GENERIC_USER_MESSAGE)
                .build(),
            Classification::UnreadableBody { detail } => self
                .builder(ProblemType::UnreadableBody, detail, ctx)
                .user_message(GENERIC_USER_MESSAGE)
                .build(),
            Classification::InvalidData { failure } => self.invalid_data(failure, ctx)?,
            Classification::System => {
                if self.config.log_unclassified {
                    tracing::error!(
                        error = %chain.original(),
                        causes = ?chain.messages(),
                        "unhandled failure"
                    );
                }
                self.system_error(ctx)
            }
        };
        Ok(problem)
    }

    fn invalid_data(
        &self,
        failure: &ValidationFailure,
        ctx: &RequestContext,
    ) -> Result<Problem, DispatchError> {
        if failure.is_empty() {
            return Err(DispatchError::EmptyValidation {
                object_name: failure.object_name.clone(),
            });
        }
        let objects = ValidationErrorCollector::new(self.resolver.as_ref()).collect(failure);
        Ok(self
            .builder(ProblemType::InvalidData, INVALID_DATA_MESSAGE, ctx)
            .user_message(INVALID_DATA_MESSAGE)
            .objects(objects)
            .build())
    }

    fn no_handler_found(&self, path: &str, ctx: &RequestContext) -> Problem {
        let detail = format!(
            "O recurso '{path}' que você tentou acessar é inexistente, por gentileza informe um recurso válido."
        );
        self.builder(ProblemType::ResourceNotFound, detail, ctx)
            .user_message(GENERIC_USER_MESSAGE)
            .build()
    }

    fn system_error(&self, ctx: &RequestContext) -> Problem {
        self.builder(ProblemType::SystemError, GENERIC_USER_MESSAGE, ctx)
            .user_message(GENERIC_USER_MESSAGE)
            .build()
    }

    fn builder(
        &self,
        problem_type: ProblemType,
        detail: impl Into<String>,
        ctx: &RequestContext,
    ) -> ProblemBuilder {
        let mut builder =
            ProblemBuilder::new(problem_type, detail).base_uri(self.config.type_base_uri.as_str());
        if let Some(instance) = &ctx.instance {
            builder = builder.instance(instance.as_str());
        }
        if let Some(trace_id) = &ctx.trace_id {
            builder = builder.trace_id(trace_id.as_str());
        }
        builder
    }
}

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        ProblemDispatcher::default().dispatch(&e, &RequestContext::default())
    }
}
