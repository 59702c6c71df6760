//! Entry point: adapt an arbitrary actual value to a status-scoped matcher.
//!
//! [`StatusMatcher`] is the only composition point exposed to assertions.
//! Every specialised matcher in the crate is an inner `Matcher<Status>`
//! wrapped in it. Evaluation runs in three steps, each of which must pass
//! before the next runs:
//!
//! 1. **capability** - the actual value must be an error
//!    ([`MatchError::ExpectedError`], "is not an error");
//! 2. **extraction** - the error, or something in its source chain, must be
//!    a [`Status`] ([`MatchError::ExpectedStatusError`],
//!    "is not an RPC-status error");
//! 3. **delegation** - the status goes to the inner matcher, whose result,
//!    error and messages are returned unchanged.
//!
//! The message methods repeat steps 1 and 2 themselves rather than relying on
//! a previous `matches` call.
//!
//! # Actual Values
//!
//! "Any value" is modelled by [`ErrorSubject`]. It is implemented for the
//! shapes RPC client code produces (`Status`, `io::Error`, boxed and bare
//! `dyn Error`, and any `Result` or `Box` around those) and for common plain
//! values, which are never errors. Client-defined error types opt in with
//! [`error_subject!`](crate::error_subject).
//!
//! Evaluation never renders anything: the failure text for a broken
//! precondition is built only when a message is asked for.

use crate::format;
use crate::{Code, MatchError, MatchResult, Matcher, Status};
use std::error::Error;
use std::fmt;
use tracing::debug;

// ============================================================================
// Error Subject
// ============================================================================

/// A value handed to a status matcher at assertion time.
pub trait ErrorSubject: fmt::Debug {
    /// Get the error this value carries, if it is one.
    fn as_error(&self) -> Option<&(dyn Error + 'static)>;
}

impl<T: ErrorSubject + ?Sized> ErrorSubject for &T {
    #[inline]
    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        (**self).as_error()
    }
}

/// `Ok` is never an error; `Err` is judged by the error type itself.
impl<T: fmt::Debug, E: ErrorSubject> ErrorSubject for Result<T, E> {
    #[inline]
    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Ok(_) => None,
            Err(err) => err.as_error(),
        }
    }
}

impl<T: ErrorSubject + ?Sized> ErrorSubject for Box<T> {
    #[inline]
    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        (**self).as_error()
    }
}

impl ErrorSubject for Status {
    #[inline]
    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        Some(self)
    }
}

impl ErrorSubject for std::io::Error {
    #[inline]
    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        Some(self)
    }
}

impl ErrorSubject for dyn Error + 'static {
    #[inline]
    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        Some(self)
    }
}

impl ErrorSubject for dyn Error + Send + Sync + 'static {
    #[inline]
    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        Some(self)
    }
}

/// Implement [`ErrorSubject`] for error types defined outside this crate.
///
/// ```
/// use rpc_status_matchers::*;
/// use std::fmt;
///
/// #[derive(Debug)]
/// struct CallFailed(Status);
///
/// impl fmt::Display for CallFailed {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str("call failed")
///     }
/// }
///
/// impl std::error::Error for CallFailed {
///     fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
///         Some(&self.0)
///     }
/// }
///
/// rpc_status_matchers::error_subject!(CallFailed);
///
/// let result: Result<(), CallFailed> = Err(CallFailed(Status::new(Code::Aborted, "retry")));
/// assert_that!(result, match_status_code(Code::Aborted));
/// ```
#[macro_export]
macro_rules! error_subject {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::ErrorSubject for $ty {
                #[inline]
                fn as_error(&self) -> ::core::option::Option<&(dyn ::std::error::Error + 'static)> {
                    ::core::option::Option::Some(self)
                }
            }
        )+
    };
}

macro_rules! non_error_subjects {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ErrorSubject for $ty {
                #[inline]
                fn as_error(&self) -> Option<&(dyn Error + 'static)> {
                    None
                }
            }
        )+
    };
}

non_error_subjects!(
    (), bool, char, str, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
    f32, f64,
);

/// Run the capability and extraction steps.
fn validate_actual<A: ErrorSubject + ?Sized>(actual: &A) -> Result<&Status, MatchError> {
    let err = actual.as_error().ok_or(MatchError::ExpectedError)?;
    Status::from_error(err).ok_or(MatchError::ExpectedStatusError)
}

/// Failure text for a value that did not pass [`validate_actual`].
fn precondition_message<A: ErrorSubject + ?Sized>(actual: &A, err: &MatchError) -> String {
    let condition = match err {
        MatchError::ExpectedError => "is not an error",
        _ => "is not an RPC-status error",
    };
    format::message(&format::raw_object(actual, 1), condition)
}

// ============================================================================
// Status Matcher
// ============================================================================

/// Adapts a `Matcher<Status>` to any [`ErrorSubject`].
#[derive(Debug, Clone)]
pub struct StatusMatcher<M> {
    status_matcher: M,
}

impl<M: Matcher<Status>> StatusMatcher<M> {
    /// Wrap a status-scoped matcher.
    #[inline]
    pub fn new(status_matcher: M) -> Self {
        Self { status_matcher }
    }

    /// Get the wrapped matcher.
    #[inline]
    pub fn inner(&self) -> &M {
        &self.status_matcher
    }
}

impl<A, M> Matcher<A> for StatusMatcher<M>
where
    A: ErrorSubject + ?Sized,
    M: Matcher<Status>,
{
    fn matches(&self, actual: &A) -> MatchResult {
        match validate_actual(actual) {
            Ok(status) => self.status_matcher.matches(status),
            Err(err) => {
                debug!(condition = %err, "status matcher precondition failed");
                Err(err)
            }
        }
    }

    fn failure_message(&self, actual: &A) -> String {
        match validate_actual(actual) {
            Ok(status) => self.status_matcher.failure_message(status),
            Err(err) => precondition_message(actual, &err),
        }
    }

    fn negated_failure_message(&self, actual: &A) -> String {
        match validate_actual(actual) {
            Ok(status) => self.status_matcher.negated_failure_message(status),
            Err(err) => precondition_message(actual, &err),
        }
    }
}

// ============================================================================
// Direct Status Code Matcher
// ============================================================================

/// Compares the status code of an error with an expected code.
///
/// Shares the capability and extraction steps of [`StatusMatcher`] but needs
/// no nested matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCodeMatcher {
    expected: Code,
}

impl StatusCodeMatcher {
    /// Expect `expected`.
    #[inline]
    pub const fn new(expected: Code) -> Self {
        Self { expected }
    }

    /// Get the expected code.
    #[inline]
    pub const fn expected(&self) -> Code {
        self.expected
    }
}

impl<A: ErrorSubject + ?Sized> Matcher<A> for StatusCodeMatcher {
    fn matches(&self, actual: &A) -> MatchResult {
        match validate_actual(actual) {
            Ok(status) => Ok(status.code() == self.expected),
            Err(err) => {
                debug!(condition = %err, "status code matcher precondition failed");
                Err(err)
            }
        }
    }

    fn failure_message(&self, actual: &A) -> String {
        match validate_actual(actual) {
            Ok(status) => format::message_with(
                &format::object(&status.code(), 1),
                "to match",
                &format::object(&self.expected, 1),
            ),
            Err(err) => precondition_message(actual, &err),
        }
    }

    fn negated_failure_message(&self, actual: &A) -> String {
        match validate_actual(actual) {
            Ok(status) => format::message_with(
                &format::object(status, 1),
                "not to match",
                &format::object(&self.expected, 1),
            ),
            Err(err) => precondition_message(actual, &err),
        }
    }
}
