//! Locale-aware message resolution for constraint violations.
//!
//! The default resolver is a [`MessageCatalog`] built from the message table
//! embedded at compile time (`messages/pt_BR.json`). It is parsed once and
//! shared read-only for the life of the process.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use serde::Deserialize;
use thiserror::Error;

use crate::validation::{Violation, ViolationScope};

/// Raw Brazilian Portuguese message table.
pub const PT_BR_MESSAGES: &str = include_str!("../messages/pt_BR.json");

static PT_BR_CATALOG: LazyLock<Arc<MessageCatalog>> = LazyLock::new(|| {
    let catalog = MessageCatalog::from_json(Locale::PT_BR, PT_BR_MESSAGES).unwrap_or_else(|e| {
        tracing::error!(error = %e, "embedded pt-BR message catalog is invalid, using an empty one");
        MessageCatalog::empty(Locale::PT_BR)
    });
    Arc::new(catalog)
});

/// Language and region a message is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    language: &'static str,
    region: &'static str,
}

impl Locale {
    /// Brazilian Portuguese.
    pub const PT_BR: Self = Self::new("pt", "BR");

    #[must_use]
    pub const fn new(language: &'static str, region: &'static str) -> Self {
        Self { language, region }
    }

    #[must_use]
    pub const fn language(&self) -> &'static str {
        self.language
    }

    #[must_use]
    pub const fn region(&self) -> &'static str {
        self.region
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.language, self.region)
    }
}

/// Why a violation message could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("no message for code '{code}'")]
    NotFound { code: String },

    #[error("message for '{code}' references missing argument {{{index}}}")]
    MissingArgument { code: String, index: usize },

    #[error("no messages for locale {locale}")]
    UnsupportedLocale { locale: Locale },

    #[error("invalid message catalog: {0}")]
    InvalidCatalog(String),
}

/// Resolves the human message of a constraint violation.
pub trait MessageResolver: Send + Sync {
    /// Resolve `violation`, raised on the object named `object_name`, for `locale`.
    ///
    /// # Errors
    /// Returns [`MessageError`] when no template applies, a template needs an
    /// argument the violation does not carry, or the locale is not served.
    fn resolve(
        &self,
        object_name: &str,
        violation: &Violation,
        locale: &Locale,
    ) -> Result<String, MessageError>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    messages: HashMap<String, String>,
    #[serde(default)]
    labels: HashMap<String, String>,
}

/// Read-only table of message templates and field labels for one locale.
///
/// Templates are looked up most specific first: `code.object.field`,
/// `code.field`, then `code` (object-scoped violations use `code.object`,
/// then `code`). When none exists the violation's default message is used.
/// `{0}` expands to the field (or object) label, `{1}`, `{2}`, ... to the
/// violation arguments in order.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    locale: Locale,
    messages: HashMap<String, String>,
    labels: HashMap<String, String>,
}

impl MessageCatalog {
    /// Shared catalog built from [`PT_BR_MESSAGES`].
    #[must_use]
    pub fn pt_br() -> Arc<Self> {
        Arc::clone(&PT_BR_CATALOG)
    }

    #[must_use]
    pub fn empty(locale: Locale) -> Self {
        Self {
            locale,
            messages: HashMap::new(),
            labels: HashMap::new(),
        }
    }

    /// Parse a catalog from its JSON form (`{"messages": {..}, "labels": {..}}`).
    ///
    /// # Errors
    /// Returns [`MessageError::InvalidCatalog`] if the JSON does not match that shape.
    pub fn from_json(locale: Locale, json: &str) -> Result<Self, MessageError> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| MessageError::InvalidCatalog(e.to_string()))?;
        Ok(Self {
            locale,
            messages: file.messages,
            labels: file.labels,
        })
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub fn message(&self, code: &str) -> Option<&str> {
        self.messages.get(code).map(String::as_str)
    }

    /// Human label for a field path or object name, if the catalog has one.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    fn candidate_codes(code: &str, object_name: &str, scope: &ViolationScope) -> Vec<String> {
        match scope {
            ViolationScope::Field(path) => vec![
                format!("{code}.{object_name}.{path}"),
                format!("{code}.{path}"),
                code.to_owned(),
            ],
            ViolationScope::Object => vec![format!("{code}.{object_name}"), code.to_owned()],
        }
    }

    fn subject_label(&self, object_name: &str, scope: &ViolationScope) -> String {
        match scope {
            ViolationScope::Field(path) => {
                let path = path.to_string();
                self.label(&format!("{object_name}.{path}"))
                    .or_else(|| self.label(&path))
                    .map_or(path, ToOwned::to_owned)
            }
            ViolationScope::Object => self
                .label(object_name)
                .unwrap_or(object_name)
                .to_owned(),
        }
    }
}

impl MessageResolver for MessageCatalog {
    fn resolve(
        &self,
        object_name: &str,
        violation: &Violation,
        locale: &Locale,
    ) -> Result<String, MessageError> {
        if *locale != self.locale {
            return Err(MessageError::UnsupportedLocale { locale: *locale });
        }

        let code = violation.code();
        let template = Self::candidate_codes(code, object_name, violation.scope())
            .iter()
            .find_map(|c| self.message(c))
            .or_else(|| violation.default_message())
            .ok_or_else(|| MessageError::NotFound {
                code: code.to_owned(),
            })?;

        let label = self.subject_label(object_name, violation.scope());
        render(template, code, &label, violation.arguments())
    }
}

/// Expand `{n}` placeholders; anything that is not `{digits}` is kept verbatim.
fn render(template: &str, code: &str, label: &str, args: &[String]) -> Result<String, MessageError> {
    let mut out = String::with_capacity(template.len() + label.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return Ok(out);
        };

        let key = &after[..close];
        let index = if key.bytes().all(|b| b.is_ascii_digit()) {
            key.parse::<usize>().ok()
        } else {
            None
        };
        match index {
            Some(0) => out.push_str(label),
            Some(index) => {
                let arg = args.get(index - 1).ok_or_else(|| MessageError::MissingArgument {
                    code: code.to_owned(),
                    index,
                })?;
                out.push_str(arg);
            }
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::non_ascii_literal)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses() {
        let catalog = MessageCatalog::from_json(Locale::PT_BR, PT_BR_MESSAGES).unwrap();
        assert!(catalog.message("NotBlank").is_some());
        assert_eq!(catalog.label("restaurante.nome"), Some("Nome do restaurante"));
    }

    #[test]
    fn shared_catalog_is_loaded_once() {
        let a = MessageCatalog::pt_br();
        let b = MessageCatalog::pt_br();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.locale(), Locale::PT_BR);
    }

    #[test]
    fn locale_displays_as_language_tag() {
        assert_eq!(Locale::PT_BR.to_string(), "pt-BR");
        assert_eq!(Locale::new("en", "US").language(), "en");
    }

    #[test]
    fn field_message_uses_label_and_arguments() {
        let catalog = MessageCatalog::pt_br();
        let v = Violation::field("nome", "Size").with_arguments(["1", "80"]);
        let msg = catalog.resolve("restaurante", &v, &Locale::PT_BR).unwrap();
        assert_eq!(msg, "Nome do restaurante deve ter entre 1 e 80 caracteres");
    }

    #[test]
    fn most_specific_code_wins() {
        let catalog = MessageCatalog::from_json(
            Locale::PT_BR,
            r#"{"messages": {"NotBlank": "generic {0}", "NotBlank.nome": "by field {0}", "NotBlank.restaurante.nome": "by object {0}"}}"#,
        )
        .unwrap();

        let v = Violation::field("nome", "NotBlank");
        assert_eq!(catalog.resolve("restaurante", &v, &Locale::PT_BR).unwrap(), "by object nome");
        assert_eq!(catalog.resolve("cozinha", &v, &Locale::PT_BR).unwrap(), "by field nome");

        let other = Violation::field("descricao", "NotBlank");
        assert_eq!(catalog.resolve("cozinha", &other, &Locale::PT_BR).unwrap(), "generic descricao");
    }

    #[test]
    fn default_message_is_used_when_no_template_matches() {
        let catalog = MessageCatalog::empty(Locale::PT_BR);
        let v = Violation::object("Custom").with_default_message("{0} rejeitado");
        assert_eq!(catalog.resolve("pedido", &v, &Locale::PT_BR).unwrap(), "pedido rejeitado");
    }

    #[test]
    fn unknown_code_without_default_is_an_error() {
        let catalog = MessageCatalog::empty(Locale::PT_BR);
        let v = Violation::field("nome", "Unknown");
        assert_eq!(
            catalog.resolve("restaurante", &v, &Locale::PT_BR),
            Err(MessageError::NotFound {
                code: "Unknown".to_owned()
            })
        );
    }

    #[test]
    fn missing_argument_is_an_error() {
        let catalog = MessageCatalog::pt_br();
        let v = Violation::field("nome", "Size").with_arguments(["1"]);
        assert_eq!(
            catalog.resolve("restaurante", &v, &Locale::PT_BR),
            Err(MessageError::MissingArgument {
                code: "Size".to_owned(),
                index: 2
            })
        );
    }

    #[test]
    fn other_locales_are_rejected() {
        let catalog = MessageCatalog::pt_br();
        let v = Violation::field("nome", "NotBlank");
        let en = Locale::new("en", "US");
        assert_eq!(
            catalog.resolve("restaurante", &v, &en),
            Err(MessageError::UnsupportedLocale { locale: en })
        );
    }

    #[test]
    fn non_numeric_braces_are_kept() {
        assert_eq!(render("a {x} {} b {", "c", "L", &[]).unwrap(), "a {x} {} b {");
        assert_eq!(render("{0}!", "c", "L", &[]).unwrap(), "L!");
    }

    #[test]
    fn invalid_catalog_json_is_rejected() {
        assert!(matches!(
            MessageCatalog::from_json(Locale::PT_BR, "{\"unexpected\": 1}"),
            Err(MessageError::InvalidCatalog(_))
        ));
    }
}
