//! Structural equality between detail records.
//!
//! Records compare with their own `PartialEq`. Failure output renders both
//! sides as canonical, field-ordered pretty JSON so two records can be diffed
//! by eye.
//!
//! Comparing two absent records is refused with
//! [`MatchError::RefusingNilComparison`] rather than answered `true`: a test
//! whose expected and actual values were both left unset is almost always a
//! broken test. Assert absence explicitly instead.

use crate::format;
use crate::{DetailRecord, MatchError, MatchResult, Matcher};
use std::any::Any;
use tracing::trace;

const ABSENT: &str = "<None>";

/// Compares a record with an expected record of the same type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEqual<D> {
    expected: Option<D>,
}

impl<D: DetailRecord> RecordEqual<D> {
    /// Expect `expected`. `None` expects an absent record.
    #[inline]
    pub fn new(expected: impl Into<Option<D>>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    /// Get the expected record.
    #[inline]
    pub fn expected(&self) -> Option<&D> {
        self.expected.as_ref()
    }

    fn compare(&self, actual: Option<&D>) -> MatchResult {
        match (actual, self.expected.as_ref()) {
            (None, None) => Err(MatchError::RefusingNilComparison),
            (actual, expected) => Ok(actual == expected),
        }
    }

    fn message(&self, actual: Option<&D>, message: &str) -> String {
        if actual.is_none() && self.expected.is_none() {
            return refusal_message();
        }
        format::message_with(
            &format::text(&canonical(actual), 1),
            message,
            &format::text(&canonical(self.expected.as_ref()), 1),
        )
    }

    fn not_comparable_message(&self) -> String {
        format::message_with(
            &format::text(&format!("<value that is not a {} record>", D::KIND), 1),
            "to equal",
            &format::text(&canonical(self.expected.as_ref()), 1),
        )
    }
}

/// Render a record as pretty JSON, or `<None>` when absent.
///
/// Falls back to the debug rendering if serialisation fails.
pub fn canonical<D: DetailRecord>(record: Option<&D>) -> String {
    let Some(record) = record else {
        return ABSENT.to_owned();
    };
    match serde_json::to_string_pretty(record) {
        Ok(json) => json,
        Err(err) => {
            trace!(kind = %D::KIND, error = %err, "canonical rendering fell back to debug");
            format::raw_object(record, 0)
        }
    }
}

fn refusal_message() -> String {
    format!(
        "Refusing to compare {ABSENT} to {ABSENT}.\nAssert absence explicitly instead."
    )
}

impl<D: DetailRecord> Matcher<D> for RecordEqual<D> {
    fn matches(&self, actual: &D) -> MatchResult {
        self.compare(Some(actual))
    }

    fn failure_message(&self, actual: &D) -> String {
        self.message(Some(actual), "to equal")
    }

    fn negated_failure_message(&self, actual: &D) -> String {
        self.message(Some(actual), "not to equal")
    }
}

impl<D: DetailRecord> Matcher<Option<D>> for RecordEqual<D> {
    fn matches(&self, actual: &Option<D>) -> MatchResult {
        self.compare(actual.as_ref())
    }

    fn failure_message(&self, actual: &Option<D>) -> String {
        self.message(actual.as_ref(), "to equal")
    }

    fn negated_failure_message(&self, actual: &Option<D>) -> String {
        self.message(actual.as_ref(), "not to equal")
    }
}

impl<D: DetailRecord> Matcher<dyn Any> for RecordEqual<D> {
    fn matches(&self, actual: &dyn Any) -> MatchResult {
        if let Some(record) = actual.downcast_ref::<D>() {
            return self.compare(Some(record));
        }
        if let Some(record) = actual.downcast_ref::<Option<D>>() {
            return self.compare(record.as_ref());
        }
        Err(MatchError::ActualNotComparable { expected: D::KIND })
    }

    fn failure_message(&self, actual: &dyn Any) -> String {
        if let Some(record) = actual.downcast_ref::<D>() {
            return self.message(Some(record), "to equal");
        }
        match actual.downcast_ref::<Option<D>>() {
            Some(record) => self.message(record.as_ref(), "to equal"),
            None => self.not_comparable_message(),
        }
    }

    fn negated_failure_message(&self, actual: &dyn Any) -> String {
        if let Some(record) = actual.downcast_ref::<D>() {
            return self.message(Some(record), "not to equal");
        }
        match actual.downcast_ref::<Option<D>>() {
            Some(record) => self.message(record.as_ref(), "not to equal"),
            None => self.not_comparable_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BadRequest, DetailKind, ErrorInfo};

    fn info() -> ErrorInfo {
        ErrorInfo::new("reason", "domain", [("key", "value")])
    }

    #[test]
    fn equal_records_match() {
        let matcher = RecordEqual::new(info());
        assert_eq!(matcher.matches(&info()), Ok(true));
    }

    #[test]
    fn different_records_do_not_match() {
        let matcher = RecordEqual::new(info());
        let other = ErrorInfo::new("other", "domain", [("key", "value")]);
        assert_eq!(matcher.matches(&other), Ok(false));
    }

    #[test]
    fn refuses_absent_against_absent() {
        let matcher = RecordEqual::<BadRequest>::new(None);
        assert_eq!(matcher.matches(&None), Err(MatchError::RefusingNilComparison));

        let msg = matcher.failure_message(&None);
        assert!(msg.starts_with("Refusing to compare <None> to <None>"), "{msg}");
    }

    #[test]
    fn one_absent_side_is_a_mismatch() {
        let matcher = RecordEqual::<ErrorInfo>::new(None);
        assert_eq!(matcher.matches(&info()), Ok(false));

        let matcher = RecordEqual::new(info());
        assert_eq!(matcher.matches(&None), Ok(false));
        assert_eq!(matcher.matches(&Some(info())), Ok(true));
    }

    #[test]
    fn any_actual_is_downcast() {
        let matcher = RecordEqual::new(info());

        let record: &dyn Any = &info();
        assert_eq!(matcher.matches(record), Ok(true));

        let optional: &dyn Any = &Some(info());
        assert_eq!(matcher.matches(optional), Ok(true));

        let absent: &dyn Any = &None::<ErrorInfo>;
        assert_eq!(matcher.matches(absent), Ok(false));
    }

    #[test]
    fn other_types_are_not_comparable() {
        let matcher = RecordEqual::new(info());

        let text: &dyn Any = &"reason";
        assert_eq!(
            matcher.matches(text),
            Err(MatchError::ActualNotComparable {
                expected: DetailKind::ErrorInfo
            })
        );

        let other_record: &dyn Any = &BadRequest::with_violation("f", "d");
        assert!(matcher.matches(other_record).is_err());
        assert!(matcher.failure_message(text).contains("not a ErrorInfo record"));
    }

    #[test]
    fn messages_render_canonical_json() {
        let matcher = RecordEqual::new(info());
        let other = ErrorInfo::new("other", "domain", [("key", "value")]);

        let msg = matcher.failure_message(&other);
        assert!(msg.starts_with("Expected\n"), "{msg}");
        assert!(msg.contains("\"reason\": \"other\""), "{msg}");
        assert!(msg.contains("\nto equal\n"), "{msg}");
        assert!(msg.contains("\"reason\": \"reason\""), "{msg}");

        let msg = matcher.negated_failure_message(&info());
        assert!(msg.contains("\nnot to equal\n"), "{msg}");
    }

    #[test]
    fn canonical_rendering_is_stable() {
        let a = ErrorInfo::new("r", "d", [("b", "2"), ("a", "1")]);
        let b = ErrorInfo::new("r", "d", [("a", "1"), ("b", "2")]);
        assert_eq!(canonical(Some(&a)), canonical(Some(&b)));
        assert_eq!(canonical::<ErrorInfo>(None), "<None>");
    }
}
