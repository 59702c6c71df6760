//! # RPC Status Matchers
//!
//! Composable matchers for asserting on the errors RPC clients return: the
//! status code, the status message, and the structured detail records
//! (validation failures, machine-readable error metadata) a status carries.
//!
//! ## Design Philosophy
//!
//! 1. **One entry point** - every public matcher is a [`StatusMatcher`]: it
//!    checks that the actual value is an error, that the error carries a
//!    [`Status`], and only then delegates
//! 2. **Narrow inner matchers** - the matchers it wraps see a `Status`, a
//!    single detail record, or a single projected value, never "anything"
//! 3. **Distinct failures** - "not an error", "not a status", "no such
//!    record" and "record present but different" are separate
//!    [`MatchError`] conditions, not one generic `false`
//! 4. **Uniform output** - every failure message has the same
//!    `Expected / <actual> / <verb> / <expected>` shape (see [`format`])
//!
//! ## Composition
//!
//! ```text
//! StatusMatcher            any value -> Status
//!   DetailMatcher<D, M>      Status -> first record of type D
//!     Property<S, V, M>        record -> projected value
//!       leaf matcher             value -> bool
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rpc_status_matchers::*;
//!
//! let err = Status::new(Code::InvalidArgument, "invalid request")
//!     .with_detail(BadRequest::with_violation("user.email", "must not be empty"))
//!     .with_detail(ErrorInfo::new("EMAIL_MISSING", "users.example.com", [("field", "email")]));
//! let result: Result<(), Status> = Err(err);
//!
//! assert_that!(result, have_status_code(equal(Code::InvalidArgument)));
//! assert_that!(result, have_status_message(contain_substring("invalid")));
//! assert_that!(result, have_field_violation("user.email"));
//! assert_that!(result, have_error_info_reason(equal("EMAIL_MISSING")));
//! assert_that!(result, have_error_info_metadata(have_key("field")));
//! assert_not_that!(result, have_field_violation_with_description("user.email", "too long"));
//! ```
//!
//! ## Failure Diagnosis
//!
//! ```rust
//! use rpc_status_matchers::*;
//!
//! let matcher = have_error_info_reason(equal("EMAIL_MISSING"));
//!
//! // Not an error at all
//! assert_eq!(matcher.matches(&Ok::<u8, Status>(1)), Err(MatchError::ExpectedError));
//!
//! // An error, but not an RPC status
//! let io = std::io::Error::other("disk full");
//! assert_eq!(matcher.matches(&io), Err(MatchError::ExpectedStatusError));
//!
//! // A status without any ErrorInfo record
//! let st = Status::new(Code::Internal, "boom");
//! assert_eq!(
//!     matcher.matches(&st),
//!     Err(MatchError::DetailNotFound { kind: DetailKind::ErrorInfo })
//! );
//! ```
//!
//! ## Status Rendering
//!
//! Call [`formatter::register_status_formatter`] once while the suite boots
//! to render statuses as `{status: NotFound, status_code: 5, ...}` in
//! failure output.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::borrow::Cow;
use std::collections::BTreeMap;

pub mod codes;
pub mod convenience;
pub mod detail;
pub mod equality;
pub mod error;
pub mod format;
pub mod formatter;
pub mod leaf;
pub mod locator;
pub mod matcher;
pub mod models;
pub mod property;
pub mod status_matcher;

pub use codes::*;
pub use detail::*;
pub use equality::*;
pub use error::*;
pub use leaf::*;
pub use matcher::*;
pub use models::*;
pub use property::*;
pub use status_matcher::*;

// ============================================================================
// Projections
// ============================================================================

fn status_message(status: &Status) -> String {
    status.message().to_owned()
}

fn error_info_reason(info: &ErrorInfo) -> String {
    info.reason.clone()
}

fn error_info_domain(info: &ErrorInfo) -> String {
    info.domain.clone()
}

fn error_info_metadata(info: &ErrorInfo) -> BTreeMap<String, String> {
    info.metadata.clone()
}

// ============================================================================
// Status Constructors
// ============================================================================

/// Match the status code of an error with `matcher`.
///
/// ```rust
/// use rpc_status_matchers::{equal, have_status_code, Code, Matcher, Status};
///
/// let st = Status::new(Code::NotFound, "random error");
/// assert_eq!(have_status_code(equal(Code::NotFound)).matches(&st), Ok(true));
/// assert_eq!(have_status_code(equal(Code::Internal)).matches(&st), Ok(false));
/// ```
#[inline]
pub fn have_status_code<M: Matcher<Code>>(matcher: M) -> StatusMatcher<Property<Status, Code, M>> {
    StatusMatcher::new(Property::from_fn(Status::code, matcher))
}

/// Match the status message of an error with `matcher`.
#[inline]
pub fn have_status_message<M: Matcher<String>>(
    matcher: M,
) -> StatusMatcher<Property<Status, String, M>> {
    StatusMatcher::new(Property::from_fn(status_message, matcher))
}

/// Compare the status code of an error with `code` directly.
///
/// Equivalent to `have_status_code(equal(code))`, with messages phrased as
/// "to match".
#[inline]
pub const fn match_status_code(code: Code) -> StatusCodeMatcher {
    StatusCodeMatcher::new(code)
}

// ============================================================================
// Detail Constructors
// ============================================================================

/// Match the first [`BadRequest`] record of an error with `matcher`.
#[inline]
pub fn have_bad_request<M: Matcher<BadRequest>>(matcher: M) -> StatusMatcher<BadRequestMatcher<M>> {
    StatusMatcher::new(DetailMatcher::new(matcher))
}

/// Match an error whose first [`BadRequest`] record has a violation for
/// `field`.
#[inline]
pub fn have_field_violation(
    field: impl Into<Cow<'static, str>>,
) -> StatusMatcher<BadRequestMatcher<FieldViolationMatcher>> {
    have_bad_request(FieldViolationMatcher::new(field))
}

/// Like [`have_field_violation`], also requiring `description`.
///
/// An empty description matches on the field alone.
#[inline]
pub fn have_field_violation_with_description(
    field: impl Into<Cow<'static, str>>,
    description: impl Into<Cow<'static, str>>,
) -> StatusMatcher<BadRequestMatcher<FieldViolationMatcher>> {
    have_bad_request(FieldViolationMatcher::new(field).with_description(description))
}

/// Match the first [`ErrorInfo`] record of an error with `matcher`.
#[inline]
pub fn have_error_info<M: Matcher<ErrorInfo>>(matcher: M) -> StatusMatcher<ErrorInfoMatcher<M>> {
    StatusMatcher::new(DetailMatcher::new(matcher))
}

/// Match the reason of the first [`ErrorInfo`] record of an error.
#[inline]
pub fn have_error_info_reason<M: Matcher<String>>(
    matcher: M,
) -> StatusMatcher<ErrorInfoMatcher<Property<ErrorInfo, String, M>>> {
    have_error_info(Property::from_fn(error_info_reason, matcher))
}

/// Match the domain of the first [`ErrorInfo`] record of an error.
#[inline]
pub fn have_error_info_domain<M: Matcher<String>>(
    matcher: M,
) -> StatusMatcher<ErrorInfoMatcher<Property<ErrorInfo, String, M>>> {
    have_error_info(Property::from_fn(error_info_domain, matcher))
}

/// Match the metadata map of the first [`ErrorInfo`] record of an error.
///
/// ```rust
/// use rpc_status_matchers::{have_error_info_metadata, have_key, Code, ErrorInfo, Matcher, Status};
///
/// let st = Status::new(Code::Internal, "random error")
///     .with_detail(ErrorInfo::new("reason", "domain", [("key", "value")]));
/// assert_eq!(have_error_info_metadata(have_key("key")).matches(&st), Ok(true));
/// ```
#[inline]
pub fn have_error_info_metadata<M: Matcher<BTreeMap<String, String>>>(
    matcher: M,
) -> StatusMatcher<ErrorInfoMatcher<Property<ErrorInfo, BTreeMap<String, String>, M>>> {
    have_error_info(Property::from_fn(error_info_metadata, matcher))
}

/// Compare a detail record structurally with `expected`.
///
/// ```rust
/// use rpc_status_matchers::{equal_record, BadRequest, Matcher};
///
/// let record = BadRequest::with_violation("field", "description");
/// assert_eq!(equal_record(record.clone()).matches(&record), Ok(true));
/// ```
#[inline]
pub fn equal_record<D: DetailRecord>(expected: impl Into<Option<D>>) -> RecordEqual<D> {
    RecordEqual::new(expected)
}

// ============================================================================
// Leaf Constructors
// ============================================================================

/// Match values equal to `expected`.
#[inline]
pub const fn equal<T>(expected: T) -> Equal<T> {
    Equal::new(expected)
}

/// Match maps containing `key`.
#[inline]
pub const fn have_key<T>(key: T) -> HaveKey<T> {
    HaveKey::new(key)
}

/// Match strings containing `substring`.
#[inline]
pub fn contain_substring(substring: impl Into<Cow<'static, str>>) -> ContainSubstring {
    ContainSubstring::new(substring)
}

/// Invert `matcher`.
#[inline]
pub const fn not<M>(matcher: M) -> Not<M> {
    Not::new(matcher)
}

// ============================================================================
// Test Doubles
// ============================================================================


#[cfg(test)]
mod unit_tests {
    use super::*;

    fn not_found() -> Result<(), Status> {
        Err(Status::new(Code::NotFound, "random error")
            .with_detail(BadRequest::with_violation("field1", "description1"))
            .with_detail(ErrorInfo::new("reason", "domain", [("key", "value")])))
    }

    #[test]
    fn status_constructors() {
        let actual = not_found();
        assert_eq!(have_status_code(equal(Code::NotFound)).matches(&actual), Ok(true));
        assert_eq!(have_status_message(equal("random error")).matches(&actual), Ok(true));
        assert_eq!(have_status_message(contain_substring("nope")).matches(&actual), Ok(false));
        assert_eq!(match_status_code(Code::NotFound).matches(&actual), Ok(true));
    }

    #[test]
    fn detail_constructors() {
        let actual = not_found();
        assert_eq!(have_field_violation("field1").matches(&actual), Ok(true));
        assert_eq!(
            have_field_violation_with_description("field1", "description2").matches(&actual),
            Ok(false)
        );
        assert_eq!(have_error_info_reason(equal("reason")).matches(&actual), Ok(true));
        assert_eq!(have_error_info_domain(not(equal("domain"))).matches(&actual), Ok(false));
        assert_eq!(have_error_info_metadata(have_key("key")).matches(&actual), Ok(true));
    }

    #[test]
    fn records_compose_with_equality() {
        let actual = not_found();
        let expected = BadRequest::with_violation("field1", "description1");
        assert_eq!(have_bad_request(equal_record(expected)).matches(&actual), Ok(true));
    }

    #[test]
    fn property_failure_messages_describe_the_projection() {
        let actual = not_found();
        let msg = have_error_info_reason(equal("other")).failure_message(&actual);
        assert_eq!(
            msg,
            "Expected\n    <String>: \"reason\"\nto equal\n    <&str>: \"other\""
        );
    }

    #[test]
    fn matchers_are_shareable() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        assert_send_sync(&have_status_code(equal(Code::NotFound)));
        assert_send_sync(&have_field_violation("field"));
        assert_send_sync(&have_error_info_metadata(have_key("key")));
    }
}
