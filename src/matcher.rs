//! The matcher protocol every type in this crate implements and consumes.
//!
//! A matcher is evaluated against an actual value of type `A` and answers
//! three independent questions:
//!
//! - `matches`: does the value satisfy the expectation?
//! - `failure_message`: what to report when a positive assertion fails.
//! - `negated_failure_message`: what to report when a negated assertion fails.
//!
//! The three methods must each be correct on their own. Assertion frameworks
//! may ask for a message without having called `matches` first, so a message
//! method re-derives whatever diagnosis it needs.
//!
//! Because matchers consume the same protocol they implement, they nest: a
//! status matcher wraps a detail matcher, which wraps a property matcher,
//! which wraps a leaf such as [`equal`](crate::equal).

use crate::MatchError;

/// Result of evaluating a matcher.
pub type MatchResult = Result<bool, MatchError>;

/// A predicate over `A` with human-readable failure reporting.
///
/// Implementations must be side-effect-free: the same matcher may be
/// evaluated many times, from several tests at once.
pub trait Matcher<A: ?Sized> {
    /// Evaluate the matcher.
    fn matches(&self, actual: &A) -> MatchResult;

    /// Describe why `actual` did not match.
    fn failure_message(&self, actual: &A) -> String;

    /// Describe why `actual` matched when it was expected not to.
    fn negated_failure_message(&self, actual: &A) -> String;
}

impl<A: ?Sized, M: Matcher<A> + ?Sized> Matcher<A> for &M {
    #[inline]
    fn matches(&self, actual: &A) -> MatchResult {
        (**self).matches(actual)
    }

    #[inline]
    fn failure_message(&self, actual: &A) -> String {
        (**self).failure_message(actual)
    }

    #[inline]
    fn negated_failure_message(&self, actual: &A) -> String {
        (**self).negated_failure_message(actual)
    }
}

impl<A: ?Sized, M: Matcher<A> + ?Sized> Matcher<A> for Box<M> {
    #[inline]
    fn matches(&self, actual: &A) -> MatchResult {
        (**self).matches(actual)
    }

    #[inline]
    fn failure_message(&self, actual: &A) -> String {
        (**self).failure_message(actual)
    }

    #[inline]
    fn negated_failure_message(&self, actual: &A) -> String {
        (**self).negated_failure_message(actual)
    }
}
