//! Assertion macros for using matchers directly in `#[test]` functions.
//!
//! # Usage
//!
//! ```rust
//! use rpc_status_matchers::{assert_not_that, assert_that, equal, have_status_code};
//! use rpc_status_matchers::{Code, Status};
//!
//! let result: Result<(), Status> = Err(Status::new(Code::NotFound, "random error"));
//!
//! assert_that!(result, have_status_code(equal(Code::NotFound)));
//! assert_not_that!(result, have_status_code(equal(Code::Internal)));
//! ```
//!
//! A matcher error (for example asserting on a value that is not an error)
//! always fails the assertion, in both polarities:
//!
//! ```rust,should_panic
//! use rpc_status_matchers::{assert_not_that, equal, have_status_code, Code};
//!
//! // panics: `false` is not an error
//! assert_not_that!(false, have_status_code(equal(Code::NotFound)));
//! ```

use crate::Matcher;

/// Evaluate `matcher` against `actual` in the given polarity.
///
/// Returns the text to report if the assertion fails. Backs
/// [`assert_that!`](crate::assert_that) and
/// [`assert_not_that!`](crate::assert_not_that).
pub fn evaluate<A, M>(actual: &A, matcher: &M, negated: bool) -> Result<(), String>
where
    A: ?Sized,
    M: Matcher<A> + ?Sized,
{
    let report = |message: String| {
        if negated {
            format!("negated assertion failed: {message}")
        } else {
            format!("assertion failed: {message}")
        }
    };
    let explain = || {
        if negated {
            matcher.negated_failure_message(actual)
        } else {
            matcher.failure_message(actual)
        }
    };

    match matcher.matches(actual) {
        Ok(matched) if matched != negated => Ok(()),
        Ok(_) => Err(report(explain())),
        Err(err) => Err(report(format!("{err}\n{}", explain()))),
    }
}

// ============================================================================
// Assertion Macros
// ============================================================================

/// Assert that a value satisfies a matcher.
///
/// Panics with the matcher's failure message otherwise. Extra arguments are
/// formatted and prepended to the message.
#[macro_export]
macro_rules! assert_that {
    ($actual:expr, $matcher:expr $(,)?) => {
        if let ::core::result::Result::Err(message) =
            $crate::convenience::evaluate(&$actual, &$matcher, false)
        {
            panic!("{}", message);
        }
    };
    ($actual:expr, $matcher:expr, $($arg:tt)+) => {
        if let ::core::result::Result::Err(message) =
            $crate::convenience::evaluate(&$actual, &$matcher, false)
        {
            panic!("{}\n{}", format_args!($($arg)+), message);
        }
    };
}

/// Assert that a value does not satisfy a matcher.
///
/// Panics with the matcher's negated failure message otherwise.
#[macro_export]
macro_rules! assert_not_that {
    ($actual:expr, $matcher:expr $(,)?) => {
        if let ::core::result::Result::Err(message) =
            $crate::convenience::evaluate(&$actual, &$matcher, true)
        {
            panic!("{}", message);
        }
    };
    ($actual:expr, $matcher:expr, $($arg:tt)+) => {
        if let ::core::result::Result::Err(message) =
            $crate::convenience::evaluate(&$actual, &$matcher, true)
        {
            panic!("{}\n{}", format_args!($($arg)+), message);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Recorder;
    use crate::MatchError;

    #[test]
    fn passing_assertions() {
        let yes = Recorder::<u8>::returning(Ok(true));
        let no = Recorder::<u8>::returning(Ok(false));

        assert_eq!(evaluate(&1u8, &yes, false), Ok(()));
        assert_eq!(evaluate(&1u8, &no, true), Ok(()));
    }

    #[test]
    fn failing_assertions_use_the_right_message() {
        let yes = Recorder::<u8>::returning(Ok(true));
        let no = Recorder::<u8>::returning(Ok(false));

        assert_eq!(
            evaluate(&1u8, &no, false),
            Err("assertion failed: failure: 1".to_owned())
        );
        assert_eq!(
            evaluate(&1u8, &yes, true),
            Err("negated assertion failed: negated: 1".to_owned())
        );
    }

    #[test]
    fn errors_fail_both_polarities() {
        let broken = Recorder::<u8>::returning(Err(MatchError::ExpectedError));

        let positive = evaluate(&1u8, &broken, false).unwrap_err();
        assert!(positive.contains("is not an error"), "{positive}");
        assert!(evaluate(&1u8, &broken, true).is_err());
    }

    #[test]
    fn macros_pass_and_fail() {
        let yes = Recorder::<u8>::returning(Ok(true));
        assert_that!(1u8, yes);
        assert_not_that!(1u8, Recorder::<u8>::returning(Ok(false)), "context {}", 1);

        let failed = std::panic::catch_unwind(|| {
            assert_that!(1u8, Recorder::<u8>::returning(Ok(false)), "while checking {}", "x");
        });
        assert!(failed.is_err());
    }
}
