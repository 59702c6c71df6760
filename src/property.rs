//! Property matcher: project a value, then match the projection.
//!
//! `Property` turns "the code of this status" or "the reason of this
//! `ErrorInfo`" into something a generic leaf matcher can judge. Evaluation is
//! fully transparent:
//!
//! ```text
//! property.matches(subject)         == matcher.matches(&project(subject))
//! property.failure_message(subject) == matcher.failure_message(&project(subject))
//! ```
//!
//! so failure output always describes the projected value, never the
//! container it came from.

use crate::{MatchResult, Matcher};
use std::fmt;
use std::marker::PhantomData;

/// Matches a property of `S`, extracted by a projection function.
///
/// The projection is owned for the matcher's whole lifetime and invoked on
/// every call; it must be pure.
pub struct Property<S: ?Sized, V, M, F = fn(&S) -> V> {
    project: F,
    matcher: M,
    _subject: PhantomData<fn(&S) -> V>,
}

impl<S: ?Sized, V, M, F> Property<S, V, M, F>
where
    F: Fn(&S) -> V,
{
    /// Create a property matcher from any projection closure.
    #[inline]
    pub fn new(project: F, matcher: M) -> Self {
        Self {
            project,
            matcher,
            _subject: PhantomData,
        }
    }

    /// Get the nested matcher.
    #[inline]
    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Apply the projection.
    #[inline]
    pub fn project(&self, subject: &S) -> V {
        (self.project)(subject)
    }
}

impl<S: ?Sized, V, M> Property<S, V, M> {
    /// Create a property matcher from a plain function.
    ///
    /// The resulting type is nameable, which is what the crate's public
    /// constructors return.
    #[inline]
    pub fn from_fn(project: fn(&S) -> V, matcher: M) -> Self {
        Self {
            project,
            matcher,
            _subject: PhantomData,
        }
    }
}

impl<S: ?Sized, V, M, F> Matcher<S> for Property<S, V, M, F>
where
    F: Fn(&S) -> V,
    M: Matcher<V>,
{
    #[inline]
    fn matches(&self, actual: &S) -> MatchResult {
        self.matcher.matches(&self.project(actual))
    }

    #[inline]
    fn failure_message(&self, actual: &S) -> String {
        self.matcher.failure_message(&self.project(actual))
    }

    #[inline]
    fn negated_failure_message(&self, actual: &S) -> String {
        self.matcher.negated_failure_message(&self.project(actual))
    }
}

impl<S: ?Sized, V, M: fmt::Debug, F> fmt::Debug for Property<S, V, M, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("project", &std::any::type_name::<F>())
            .field("matcher", &self.matcher)
            .finish()
    }
}
