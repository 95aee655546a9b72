//! Assembly of [`Problem`] envelopes.

use crate::problem::{GENERIC_USER_MESSAGE, Problem, ProblemObject};
use crate::problem_type::{DEFAULT_TYPE_BASE_URI, ProblemType};

/// Builder for an immutable [`Problem`].
///
/// `status`, `type` and `title` always come from the [`ProblemType`] definition
/// and the timestamp is taken when [`ProblemBuilder::build`] runs. The builder does no
/// redaction: callers that must not expose internals pass
/// [`GENERIC_USER_MESSAGE`] (also the default when no user message is set).
#[derive(Debug, Clone)]
#[must_use]
pub struct ProblemBuilder {
    problem_type: ProblemType,
    detail: String,
    user_message: Option<String>,
    objects: Vec<ProblemObject>,
    base_uri: String,
    instance: Option<String>,
    trace_id: Option<String>,
}

impl ProblemBuilder {
    pub fn new(problem_type: ProblemType, detail: impl Into<String>) -> Self {
        Self {
            problem_type,
            detail: detail.into(),
            user_message: None,
            objects: Vec::new(),
            base_uri: DEFAULT_TYPE_BASE_URI.to_owned(),
            instance: None,
            trace_id: None,
        }
    }

    pub fn user_message(mut self, message: impl Into<String>) -> Self {
        self.user_message = Some(message.into());
        self
    }

    /// Field level issues. An empty list leaves `objects` absent, and so does
    /// a category that is not field level.
    pub fn objects(mut self, objects: Vec<ProblemObject>) -> Self {
        self.objects = objects;
        self
    }

    pub fn base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }

    pub fn instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = Some(uri.into());
        self
    }

    pub fn trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn build(self) -> Problem {
        let def = self.problem_type.def();
        let objects = if self.problem_type.is_field_level() {
            self.objects
        } else {
            Vec::new()
        };
        Problem::assemble(
            def.status,
            self.problem_type.type_url(&self.base_uri),
            def.title.to_owned(),
            self.detail,
            self.user_message
                .unwrap_or_else(|| GENERIC_USER_MESSAGE.to_owned()),
            objects,
            self.instance,
            self.trace_id,
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn problem_builder_pattern() {
        let p = ProblemBuilder::new(ProblemType::InvalidData, "Input validation errors")
            .user_message("Input validation errors")
            .instance("/restaurantes/1")
            .trace_id("req-456")
            .objects(vec![ProblemObject::new("nome", "required")])
            .build();

        assert_eq!(p.status(), StatusCode::BAD_REQUEST);
        assert_eq!(p.title(), ProblemType::InvalidData.title());
        assert_eq!(p.type_url(), "https://algafood.com.br/dados-invalidos");
        assert_eq!(p.instance(), Some("/restaurantes/1"));
        assert_eq!(p.trace_id(), Some("req-456"));
        assert_eq!(p.objects().map(<[ProblemObject]>::len), Some(1));
    }

    #[test]
    fn empty_objects_are_absent() {
        let p = ProblemBuilder::new(ProblemType::InvalidData, "x")
            .objects(Vec::new())
            .build();
        assert!(p.objects().is_none());
    }

    #[test]
    fn user_message_defaults_to_generic_sentence() {
        let p = ProblemBuilder::new(ProblemType::SystemError, "boom").build();
        assert_eq!(p.user_message(), GENERIC_USER_MESSAGE);
        assert_eq!(p.detail(), "boom");
    }

    #[test]
    fn status_always_matches_the_category() {
        for problem_type in ProblemType::ALL {
            let p = ProblemBuilder::new(problem_type, "x")
                .base_uri("https://errors.example.com/")
                .build();
            assert_eq!(p.status(), problem_type.def().status);
            assert_eq!(p.problem_type(), Some(problem_type));
        }
    }

    #[test]
    fn objects_only_on_field_level_categories() {
        for problem_type in ProblemType::ALL {
            let p = ProblemBuilder::new(problem_type, "x")
                .objects(vec![ProblemObject::new("nome", "required")])
                .build();
            assert_eq!(
                p.objects().is_some(),
                problem_type.is_field_level(),
                "{problem_type:?}"
            );
        }
    }

    #[test]
    fn timestamp_is_taken_at_build_time() {
        let before = chrono::Utc::now();
        let p = ProblemBuilder::new(ProblemType::EntityInUse, "in use").build();
        let after = chrono::Utc::now();
        assert!(p.timestamp() >= before && p.timestamp() <= after);
    }
}
