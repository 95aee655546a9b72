//! Field locations inside a request body and their dotted rendering.

use std::fmt;

/// Ordered field-name segments leading to an offending field,
/// e.g. `["cozinha", "id"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldLocation {
    segments: Vec<String>,
}

impl FieldLocation {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Split a dotted path such as `"endereco.cidade.id"` into segments.
    ///
    /// Empty segments are skipped, so `""` yields an empty location.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        path.split('.').filter(|s| !s.is_empty()).collect()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl<S: Into<String>> FromIterator<S> for FieldLocation {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> From<Vec<S>> for FieldLocation {
    fn from(segments: Vec<S>) -> Self {
        segments.into_iter().collect()
    }
}

impl<S: Into<String> + Clone> From<&[S]> for FieldLocation {
    fn from(segments: &[S]) -> Self {
        segments.iter().cloned().collect()
    }
}

impl From<&str> for FieldLocation {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for FieldLocation {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&FieldPathFormatter::format(self))
    }
}

/// Renders a [`FieldLocation`] as a dotted path.
pub struct FieldPathFormatter;

impl FieldPathFormatter {
    /// Join the segments with `.`; segment casing is kept as is.
    ///
    /// An empty location gives an empty string, which callers treat as an
    /// object-level (not field-level) location.
    #[must_use]
    pub fn format(location: &FieldLocation) -> String {
        location.segments.join(".")
    }
}
