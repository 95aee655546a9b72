//! Closed catalog of problem categories (`ProblemType`) and their fixed definitions.
#![allow(clippy::non_ascii_literal)] // titles are pt-BR wire texts

use http::StatusCode;

/// Base URI used to build `type` identifiers when none is configured.
pub const DEFAULT_TYPE_BASE_URI: &str = "https://algafood.com.br";

/// Static definition of a problem category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemTypeDef {
    pub status: StatusCode,
    pub title: &'static str,
    pub uri_suffix: &'static str,
}

/// Problem categories an envelope can be assigned to.
///
/// The set is closed: a new category means a new variant here, which makes
/// every `match` over it fail to compile until it is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemType {
    ResourceNotFound,
    EntityInUse,
    BusinessRuleViolation,
    InvalidParameter,
    UnreadableBody,
    InvalidData,
    SystemError,
}

impl ProblemType {
    pub const ALL: [Self; 7] = [
        Self::ResourceNotFound,
        Self::EntityInUse,
        Self::BusinessRuleViolation,
        Self::InvalidParameter,
        Self::UnreadableBody,
        Self::InvalidData,
        Self::SystemError,
    ];

    /// Get the fixed definition for this category
    #[must_use]
    pub const fn def(self) -> ProblemTypeDef {
        match self {
            Self::ResourceNotFound => ProblemTypeDef {
                status: StatusCode::NOT_FOUND,
                title: "Recurso não encontrado",
                uri_suffix: "recurso-nao-encontrado",
            },
            Self::EntityInUse => ProblemTypeDef {
                status: StatusCode::CONFLICT,
                title: "Entidade em uso",
                uri_suffix: "entidade-em-uso",
            },
            Self::BusinessRuleViolation => ProblemTypeDef {
                status: StatusCode::BAD_REQUEST,
                title: "Violação de regra de negócio",
                uri_suffix: "erro-negocio",
            },
            Self::InvalidParameter => ProblemTypeDef {
                status: StatusCode::BAD_REQUEST,
                title: "Parâmetro inválido",
                uri_suffix: "parametro-invalido",
            },
            Self::UnreadableBody => ProblemTypeDef {
                status: StatusCode::BAD_REQUEST,
                title: "Mensagem incompreensível",
                uri_suffix: "mensagem-incompreensivel",
            },
            Self::InvalidData => ProblemTypeDef {
                status: StatusCode::BAD_REQUEST,
                title: "Dados inválidos",
                uri_suffix: "dados-invalidos",
            },
            Self::SystemError => ProblemTypeDef {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                title: "Erro de sistema",
                uri_suffix: "erro-de-sistema",
            },
        }
    }

    #[must_use]
    pub const fn status(self) -> StatusCode {
        self.def().status
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        self.def().title
    }

    #[must_use]
    pub const fn uri_suffix(self) -> &'static str {
        self.def().uri_suffix
    }

    /// Build the `type` identifier under the given base URI.
    ///
    /// A trailing slash on `base_uri` is ignored.
    #[must_use]
    pub fn type_url(self, base_uri: &str) -> String {
        format!("{}/{}", base_uri.trim_end_matches('/'), self.uri_suffix())
    }

    /// Recover the category from a `type` identifier produced by [`Self::type_url`].
    #[must_use]
    pub fn from_type_url(type_url: &str) -> Option<Self> {
        let suffix = type_url.rsplit('/').next()?;
        Self::ALL.into_iter().find(|t| t.uri_suffix() == suffix)
    }

    /// Whether envelopes of this category carry field-level `objects`.
    #[must_use]
    pub const fn is_field_level(self) -> bool {
        matches!(self, Self::InvalidData)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn status_table_is_fixed() {
        assert_eq!(ProblemType::ResourceNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ProblemType::EntityInUse.status(), StatusCode::CONFLICT);
        assert_eq!(
            ProblemType::SystemError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        for t in [
            ProblemType::BusinessRuleViolation,
            ProblemType::InvalidParameter,
            ProblemType::UnreadableBody,
            ProblemType::InvalidData,
        ] {
            assert_eq!(t.status(), StatusCode::BAD_REQUEST, "{t:?}");
        }
    }

    #[test]
    fn uri_suffixes_are_unique() {
        for (i, a) in ProblemType::ALL.iter().enumerate() {
            for b in &ProblemType::ALL[i + 1..] {
                assert_ne!(a.uri_suffix(), b.uri_suffix());
            }
        }
    }

    #[test]
    fn type_url_roundtrips_through_suffix() {
        for t in ProblemType::ALL {
            let url = t.type_url("https://api.example.com/");
            assert!(url.starts_with("https://api.example.com/"));
            assert!(!url.contains("com//"));
            assert_eq!(ProblemType::from_type_url(&url), Some(t));
        }
        assert_eq!(ProblemType::from_type_url("about:blank"), None);
    }

    #[test]
    fn only_invalid_data_is_field_level() {
        let field_level: Vec<_> = ProblemType::ALL
            .into_iter()
            .filter(|t| t.is_field_level())
            .collect();
        assert_eq!(field_level, vec![ProblemType::InvalidData]);
    }
}
