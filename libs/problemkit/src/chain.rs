//! Cause-chain resolution.

use std::collections::HashSet;
use std::error::Error;

/// Ordered causes of a failure: index 0 is the raised failure, the last
/// entry its deepest cause.
#[derive(Debug, Clone)]
pub struct ExceptionChain<'a> {
    causes: Vec<&'a (dyn Error + 'static)>,
}

impl<'a> ExceptionChain<'a> {
    /// The failure as originally raised.
    #[must_use]
    pub fn original(&self) -> &'a (dyn Error + 'static) {
        self.causes[0]
    }

    /// The deepest cause reached before the chain ended or looped.
    #[must_use]
    pub fn root_cause(&self) -> &'a (dyn Error + 'static) {
        self.causes[self.causes.len() - 1]
    }

    /// Causes from the raised failure down to the root cause.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &'a (dyn Error + 'static)> + '_ {
        self.causes.iter().copied()
    }

    /// Causes from the root cause up to the raised failure.
    pub fn iter_from_root(&self) -> impl Iterator<Item = &'a (dyn Error + 'static)> + '_ {
        self.iter().rev()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.causes.len()
    }

    /// Always `false`: a chain holds at least the raised failure.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }

    /// Display text of every cause, outermost first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

/// Longest chain kept; deeper causes are dropped.
pub const MAX_CHAIN_DEPTH: usize = 64;

/// Walks `source()` links of a failure.
pub struct RootCauseResolver;

impl RootCauseResolver {
    /// Build the chain from `failure` down to its deepest cause.
    ///
    /// A cause is identified by address and type together: a wrapper whose
    /// source field sits at offset zero shares its address with that source.
    /// The walk stops at the first cause already visited, or after
    /// [`MAX_CHAIN_DEPTH`] causes.
    #[must_use]
    pub fn resolve<'a>(failure: &'a (dyn Error + 'static)) -> ExceptionChain<'a> {
        let mut causes = Vec::new();
        let mut seen: HashSet<*const (dyn Error + 'static)> = HashSet::new();
        let mut current = Some(failure);

        while let Some(err) = current {
            if causes.len() == MAX_CHAIN_DEPTH {
                tracing::debug!(depth = causes.len(), "cause chain too deep, truncating");
                break;
            }
            if !seen.insert(std::ptr::from_ref(err)) {
                tracing::debug!(depth = causes.len(), "cause chain loops, truncating");
                break;
            }
            causes.push(err);
            current = err.source();
        }

        ExceptionChain { causes }
    }
}
