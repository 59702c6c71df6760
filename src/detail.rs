//! Typed detail matchers: find one record kind in a status, then delegate.
//!
//! [`DetailMatcher`] is one algorithm shared by every record kind:
//!
//! 1. locate the first record of type `D` in the status,
//! 2. if there is none, fail with [`MatchError::DetailNotFound`] and never
//!    call the inner matcher,
//! 3. otherwise hand the record to the inner `Matcher<D>` and return its
//!    answer untouched.
//!
//! The crate instantiates it for validation failures ([`BadRequestMatcher`])
//! and error metadata ([`ErrorInfoMatcher`]).

use crate::format;
use crate::locator;
use crate::{BadRequest, DetailRecord, ErrorInfo, MatchError, MatchResult, Matcher, Status};
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

/// Matches a status by the first detail record of type `D`.
pub struct DetailMatcher<D, M> {
    matcher: M,
    _record: PhantomData<fn(&D)>,
}

/// [`DetailMatcher`] over validation-failure records.
pub type BadRequestMatcher<M> = DetailMatcher<BadRequest, M>;

/// [`DetailMatcher`] over error-metadata records.
pub type ErrorInfoMatcher<M> = DetailMatcher<ErrorInfo, M>;

impl<D: DetailRecord, M: Matcher<D>> DetailMatcher<D, M> {
    /// Wrap a matcher scoped to `D`.
    #[inline]
    pub fn new(matcher: M) -> Self {
        Self {
            matcher,
            _record: PhantomData,
        }
    }

    /// Get the inner matcher.
    #[inline]
    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    fn not_found_message(status: &Status) -> String {
        format::message(
            &format::object(status, 1),
            &format!("does not have any {} record in its details", D::KIND),
        )
    }
}

impl<D: DetailRecord, M: Matcher<D>> Matcher<Status> for DetailMatcher<D, M> {
    fn matches(&self, status: &Status) -> MatchResult {
        match locator::find::<D>(status) {
            Some(record) => self.matcher.matches(record),
            None => Err(MatchError::DetailNotFound { kind: D::KIND }),
        }
    }

    fn failure_message(&self, status: &Status) -> String {
        match locator::find::<D>(status) {
            Some(record) => self.matcher.failure_message(record),
            None => Self::not_found_message(status),
        }
    }

    fn negated_failure_message(&self, status: &Status) -> String {
        match locator::find::<D>(status) {
            Some(record) => self.matcher.negated_failure_message(record),
            None => Self::not_found_message(status),
        }
    }
}

impl<D: DetailRecord, M: fmt::Debug> fmt::Debug for DetailMatcher<D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetailMatcher")
            .field("kind", &D::KIND)
            .field("matcher", &self.matcher)
            .finish()
    }
}

// ============================================================================
// Field Violation
// ============================================================================

/// Matches a [`BadRequest`] holding a violation for a given field.
///
/// If a non-empty description is set, the violation must carry that exact
/// description too. This is a membership test: other violations in the record
/// are irrelevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolationMatcher {
    field: Cow<'static, str>,
    description: Option<Cow<'static, str>>,
}

impl FieldViolationMatcher {
    /// Match on the field path alone.
    #[inline]
    pub fn new(field: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field: field.into(),
            description: None,
        }
    }

    /// Also require the violation's description. An empty description keeps
    /// matching on the field alone.
    #[inline]
    pub fn with_description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// Get the expected field path.
    #[inline]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the expected description, if any.
    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn expected(&self) -> String {
        format!("[{}: {}]", self.field, self.description().unwrap_or_default())
    }
}

impl Matcher<BadRequest> for FieldViolationMatcher {
    fn matches(&self, actual: &BadRequest) -> MatchResult {
        Ok(locator::find_field_violation(actual, &self.field, self.description()).is_some())
    }

    fn failure_message(&self, actual: &BadRequest) -> String {
        format::message_with(
            &format::object(actual, 1),
            "to have the field violation",
            &format::text(&self.expected(), 1),
        )
    }

    fn negated_failure_message(&self, actual: &BadRequest) -> String {
        format::message_with(
            &format::object(actual, 1),
            "not to have the field violation",
            &format::text(&self.expected(), 1),
        )
    }
}
