//! Generic-value matchers.
//!
//! These are the leaves bound under property matchers: they judge the code,
//! message or record field a property projected out. Any other
//! [`Matcher`] implementation works in their place.

use crate::format;
use crate::{MatchResult, Matcher};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

// ============================================================================
// Equality
// ============================================================================

/// Matches values equal to `expected`.
///
/// The actual type may differ from the expected one as long as it can be
/// compared with it, so a `String` projection matches against a `&str`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equal<T> {
    expected: T,
}

impl<T> Equal<T> {
    /// Expect `expected`.
    #[inline]
    pub const fn new(expected: T) -> Self {
        Self { expected }
    }
}

impl<T, U> Matcher<U> for Equal<T>
where
    T: fmt::Debug,
    U: PartialEq<T> + fmt::Debug + ?Sized,
{
    #[inline]
    fn matches(&self, actual: &U) -> MatchResult {
        Ok(*actual == self.expected)
    }

    fn failure_message(&self, actual: &U) -> String {
        format::message_with(
            &format::raw_object(actual, 1),
            "to equal",
            &format::raw_object(&self.expected, 1),
        )
    }

    fn negated_failure_message(&self, actual: &U) -> String {
        format::message_with(
            &format::raw_object(actual, 1),
            "not to equal",
            &format::raw_object(&self.expected, 1),
        )
    }
}

// ============================================================================
// Map Keys
// ============================================================================

/// Matches maps that contain `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaveKey<T> {
    key: T,
}

impl<T> HaveKey<T> {
    /// Expect `key` to be present.
    #[inline]
    pub const fn new(key: T) -> Self {
        Self { key }
    }

    fn message<A: fmt::Debug + ?Sized>(&self, actual: &A, message: &str) -> String
    where
        T: fmt::Debug,
    {
        format::message_with(
            &format::raw_object(actual, 1),
            message,
            &format::raw_object(&self.key, 1),
        )
    }
}

impl<K, V, T> Matcher<BTreeMap<K, V>> for HaveKey<T>
where
    K: PartialEq<T> + fmt::Debug,
    V: fmt::Debug,
    T: fmt::Debug,
{
    fn matches(&self, actual: &BTreeMap<K, V>) -> MatchResult {
        Ok(actual.keys().any(|key| *key == self.key))
    }

    fn failure_message(&self, actual: &BTreeMap<K, V>) -> String {
        self.message(actual, "to have key")
    }

    fn negated_failure_message(&self, actual: &BTreeMap<K, V>) -> String {
        self.message(actual, "not to have key")
    }
}

impl<K, V, S, T> Matcher<HashMap<K, V, S>> for HaveKey<T>
where
    K: PartialEq<T> + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
    T: fmt::Debug,
{
    fn matches(&self, actual: &HashMap<K, V, S>) -> MatchResult {
        Ok(actual.keys().any(|key| *key == self.key))
    }

    fn failure_message(&self, actual: &HashMap<K, V, S>) -> String {
        self.message(actual, "to have key")
    }

    fn negated_failure_message(&self, actual: &HashMap<K, V, S>) -> String {
        self.message(actual, "not to have key")
    }
}

// ============================================================================
// Substrings
// ============================================================================

/// Matches strings containing `substring`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainSubstring {
    substring: Cow<'static, str>,
}

impl ContainSubstring {
    /// Expect `substring` somewhere in the actual text.
    #[inline]
    pub fn new(substring: impl Into<Cow<'static, str>>) -> Self {
        Self {
            substring: substring.into(),
        }
    }
}

impl<A: AsRef<str> + fmt::Debug + ?Sized> Matcher<A> for ContainSubstring {
    #[inline]
    fn matches(&self, actual: &A) -> MatchResult {
        Ok(actual.as_ref().contains(self.substring.as_ref()))
    }

    fn failure_message(&self, actual: &A) -> String {
        format::message_with(
            &format::raw_object(actual, 1),
            "to contain substring",
            &format::raw_object(self.substring.as_ref(), 1),
        )
    }

    fn negated_failure_message(&self, actual: &A) -> String {
        format::message_with(
            &format::raw_object(actual, 1),
            "not to contain substring",
            &format::raw_object(self.substring.as_ref(), 1),
        )
    }
}

// ============================================================================
// Negation
// ============================================================================

/// Inverts another matcher. Errors pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Not<M> {
    matcher: M,
}

impl<M> Not<M> {
    /// Invert `matcher`.
    #[inline]
    pub const fn new(matcher: M) -> Self {
        Self { matcher }
    }
}

impl<A: ?Sized, M: Matcher<A>> Matcher<A> for Not<M> {
    #[inline]
    fn matches(&self, actual: &A) -> MatchResult {
        self.matcher.matches(actual).map(|matched| !matched)
    }

    #[inline]
    fn failure_message(&self, actual: &A) -> String {
        self.matcher.negated_failure_message(actual)
    }

    #[inline]
    fn negated_failure_message(&self, actual: &A) -> String {
        self.matcher.failure_message(actual)
    }
}
