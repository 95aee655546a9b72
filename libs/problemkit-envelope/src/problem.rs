//! Problem envelope (pure data model, no HTTP framework dependencies)

use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::problem_type::ProblemType;

/// Content type for problem envelopes.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// The only end-user message allowed for system and unreadable-body problems.
pub const GENERIC_USER_MESSAGE: &str = "Ocorreu um erro interno inesperado. Tente novamente, se o problema persistir, entre em contato com o administrador do sistema";

/// Custom serializer for `StatusCode` to u16
#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

/// Custom deserializer for `StatusCode` from u16
fn deserialize_status_code<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// Standardized error response body.
///
/// Built once by [`crate::ProblemBuilder`] and read-only afterwards. Optional
/// members are omitted from the wire form instead of being written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[cfg_attr(
    feature = "utoipa",
    schema(title = "Problem", description = "Standardized error response body")
)]
#[must_use]
pub struct Problem {
    /// The HTTP status code. Serializes as u16.
    #[serde(
        serialize_with = "serialize_status_code",
        deserialize_with = "deserialize_status_code"
    )]
    #[cfg_attr(feature = "utoipa", schema(value_type = u16))]
    status: StatusCode,
    /// URI-like identifier of the problem category.
    #[serde(rename = "type")]
    type_url: String,
    /// Short title of the problem category.
    title: String,
    /// Operator/developer-facing explanation of this occurrence.
    detail: String,
    /// Message that is safe to show to the end user.
    user_message: String,
    /// Capture time of the envelope.
    timestamp: DateTime<Utc>,
    /// Field or object level issues, in the order they were raised.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    objects: Vec<ProblemObject>,
    /// Request path the problem occurred on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

/// A single field or object level issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[cfg_attr(feature = "utoipa", schema(title = "ProblemObject"))]
pub struct ProblemObject {
    /// Field name, dotted path (e.g. "cozinha.id") or object name
    pub name: String,
    /// Resolved, locale-aware message for this issue
    pub user_message: String,
}

impl ProblemObject {
    #[must_use]
    pub fn new(name: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user_message: user_message.into(),
        }
    }
}

impl Problem {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        status: StatusCode,
        type_url: String,
        title: String,
        detail: String,
        user_message: String,
        objects: Vec<ProblemObject>,
        instance: Option<String>,
        trace_id: Option<String>,
    ) -> Self {
        Self {
            status,
            type_url,
            title,
            detail,
            user_message,
            timestamp: Utc::now(),
            objects,
            instance,
            trace_id,
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn type_url(&self) -> &str {
        &self.type_url
    }

    /// Category this envelope was built for, recovered from its `type`.
    #[must_use]
    pub fn problem_type(&self) -> Option<ProblemType> {
        ProblemType::from_type_url(&self.type_url)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    #[must_use]
    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Field level issues; `None` when there are none.
    #[must_use]
    pub fn objects(&self) -> Option<&[ProblemObject]> {
        if self.objects.is_empty() {
            None
        } else {
            Some(&self.objects)
        }
    }

    #[must_use]
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

/// Axum integration: make Problem directly usable as a response
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for Problem {
    fn into_response(self) -> axum::response::Response {
        use axum::http::HeaderValue;

        let status = self.status;
        let mut resp = axum::Json(self).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::non_ascii_literal)]
mod tests {
    use super::*;
    use crate::ProblemBuilder;

    #[test]
    fn problem_serializes_status_as_u16() {
        let p = ProblemBuilder::new(ProblemType::ResourceNotFound, "Resource not found").build();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"status\":404"));
    }

    #[test]
    fn absent_members_are_omitted_not_null() {
        let p = ProblemBuilder::new(ProblemType::BusinessRuleViolation, "rule broken").build();
        let value = serde_json::to_value(&p).unwrap();
        let obj = value.as_object().unwrap();

        assert!(!obj.contains_key("objects"));
        assert!(!obj.contains_key("instance"));
        assert!(!obj.contains_key("traceId"));
        assert!(obj.values().all(|v| !v.is_null()));
        for key in ["status", "type", "title", "detail", "userMessage", "timestamp"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn objects_use_camel_case_wire_names() {
        let p = ProblemBuilder::new(ProblemType::InvalidData, "invalid")
            .objects(vec![ProblemObject::new("nome", "Nome é obrigatório")])
            .build();
        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["objects"][0]["name"], "nome");
        assert_eq!(value["objects"][0]["userMessage"], "Nome é obrigatório");
    }

    #[test]
    fn timestamp_is_rfc3339_with_offset() {
        let p = ProblemBuilder::new(ProblemType::SystemError, GENERIC_USER_MESSAGE).build();
        let value = serde_json::to_value(&p).unwrap();
        let raw = value["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(raw).is_ok(), "{raw}");
    }

    #[test]
    fn problem_deserializes_from_wire_form() {
        let json = r#"{"status":409,"type":"https://algafood.com.br/entidade-em-uso","title":"Entidade em uso","detail":"em uso","userMessage":"em uso","timestamp":"2024-05-01T10:00:00Z"}"#;
        let p: Problem = serde_json::from_str(json).unwrap();
        assert_eq!(p.status(), StatusCode::CONFLICT);
        assert_eq!(p.problem_type(), Some(ProblemType::EntityInUse));
        assert!(p.objects().is_none());
    }

    #[cfg(feature = "axum")]
    #[test]
    fn problem_into_response_sets_status_and_content_type() {
        use axum::response::IntoResponse;

        let p = ProblemBuilder::new(ProblemType::EntityInUse, "in use").build();
        let resp = p.into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let ct = resp
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, APPLICATION_PROBLEM_JSON);
    }
}
