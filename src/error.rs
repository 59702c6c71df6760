//! Error taxonomy for matcher evaluation.
//!
//! A matcher answers `Ok(true)` / `Ok(false)` when it could evaluate the
//! actual value, and `Err(MatchError)` when it could not: the actual value
//! had the wrong shape, a required detail record was absent, or the
//! comparison itself was refused. Conditions are returned, never panicked,
//! and they are distinguishable so that callers can tell "absent" from
//! "present but mismatched".

use crate::DetailKind;
use std::borrow::Cow;
use thiserror::Error;

/// Why a matcher could not evaluate its actual value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The actual value is not an error at all.
    #[error("the given value is not an error")]
    ExpectedError,

    /// The actual value is an error, but no RPC status is attached to it.
    #[error("the given error does not carry an RPC status")]
    ExpectedStatusError,

    /// The status carries no detail record of the requested kind.
    #[error("no {kind} record found in the status details")]
    DetailNotFound {
        /// Kind that was searched for.
        kind: DetailKind,
    },

    /// Structural equality was asked to compare two absent values.
    #[error("refusing to compare <None> to <None>; assert absence explicitly instead")]
    RefusingNilComparison,

    /// Structural equality was given an actual value of another type.
    #[error("the given actual value is not a comparable {expected} record")]
    ActualNotComparable {
        /// Kind the matcher compares.
        expected: DetailKind,
    },

    /// Any other condition raised by a leaf matcher.
    #[error("{0}")]
    Other(Cow<'static, str>),
}

impl MatchError {
    /// Create an [`MatchError::Other`] condition.
    #[inline]
    pub fn other(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Other(message.into())
    }

    /// Check if this condition was raised before any inner matcher ran
    /// because the actual value had the wrong shape.
    #[inline]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::ExpectedError | Self::ExpectedStatusError | Self::DetailNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_not_found_names_kind() {
        let err = MatchError::DetailNotFound {
            kind: DetailKind::ErrorInfo,
        };
        assert_eq!(err.to_string(), "no ErrorInfo record found in the status details");
    }

    #[test]
    fn other_keeps_message_verbatim() {
        assert_eq!(MatchError::other("want error").to_string(), "want error");
    }

    #[test]
    fn precondition_classification() {
        assert!(MatchError::ExpectedError.is_precondition());
        assert!(MatchError::ExpectedStatusError.is_precondition());
        assert!(!MatchError::RefusingNilComparison.is_precondition());
        assert!(!MatchError::other("x").is_precondition());
    }
}
