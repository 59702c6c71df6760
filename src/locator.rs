//! Detail lookup inside a status.
//!
//! Every lookup is a forward scan over the status's details with a
//! per-element variant check, and every lookup resolves to the FIRST match.
//! A status that carries two `ErrorInfo` records is always judged by the one
//! that was attached first; the others are ignored.

use crate::{BadRequest, Detail, DetailKind, DetailRecord, FieldViolation, Status};
use tracing::trace;

/// Find the first detail of the given kind.
///
/// Returns `None` if no detail matches or the status has no details.
pub fn locate(status: &Status, kind: DetailKind) -> Option<&Detail> {
    let found = status.details().iter().find(|detail| detail.is(kind));
    trace!(%kind, found = found.is_some(), "detail lookup");
    found
}

/// Find the first record of type `D`.
///
/// ```rust
/// use rpc_status_matchers::{locator, Code, ErrorInfo, RequestInfo, Status};
///
/// let st = Status::new(Code::Internal, "message")
///     .with_detail(RequestInfo::new("rid", ""))
///     .with_detail(ErrorInfo::new("FIRST", "example.com", [("k", "v")]));
///
/// let info = locator::find::<ErrorInfo>(&st).unwrap();
/// assert_eq!(info.reason, "FIRST");
/// ```
pub fn find<D: DetailRecord>(status: &Status) -> Option<&D> {
    let found = status.details().iter().find_map(D::from_detail);
    trace!(kind = %D::KIND, found = found.is_some(), "typed detail lookup");
    found
}

/// Find the first violation in `record` for `field`.
///
/// When `description` is `Some` and non-empty, the violation's description
/// must match as well; otherwise the field alone decides.
pub fn find_field_violation<'a>(
    record: &'a BadRequest,
    field: &str,
    description: Option<&str>,
) -> Option<&'a FieldViolation> {
    let description = description.filter(|d| !d.is_empty());
    record.field_violations.iter().find(|violation| {
        violation.field == field && description.is_none_or(|d| violation.description == d)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Code, ErrorInfo, RequestInfo};

    fn bad_request() -> BadRequest {
        BadRequest::with_violation("field1", "description1")
            .add_violation("field2", "description2")
            .add_violation("field2", "description3")
    }

    #[test]
    fn finds_bad_request() {
        let want = BadRequest::with_violation("field1", "description1");
        let st = Status::new(Code::Internal, "message").with_detail(want.clone());
        assert_eq!(find::<BadRequest>(&st), Some(&want));
    }

    #[test]
    fn does_not_find_other_kinds() {
        let st = Status::new(Code::Internal, "message").with_detail(RequestInfo::new("rid", ""));
        assert!(find::<BadRequest>(&st).is_none());
        assert!(find::<ErrorInfo>(&st).is_none());
        assert!(locate(&st, DetailKind::BadRequest).is_none());
    }

    #[test]
    fn empty_details_are_not_found() {
        let st = Status::new(Code::Internal, "message");
        assert!(find::<ErrorInfo>(&st).is_none());
        assert!(locate(&st, DetailKind::ErrorInfo).is_none());
    }

    #[test]
    fn resolves_first_of_many() {
        let st = Status::new(Code::Internal, "message")
            .with_detail(RequestInfo::new("rid", ""))
            .with_detail(ErrorInfo::new("first", "domain", [("k", "v")]))
            .with_detail(ErrorInfo::new("second", "domain", [("k", "v")]));

        for _ in 0..3 {
            assert_eq!(find::<ErrorInfo>(&st).map(|e| e.reason.as_str()), Some("first"));
        }
        assert!(std::ptr::eq(
            locate(&st, DetailKind::ErrorInfo).unwrap(),
            &st.details()[1]
        ));
    }

    #[test]
    fn field_violation_by_field_only() {
        let record = bad_request();
        let found = find_field_violation(&record, "field2", None).unwrap();
        assert_eq!(found.description, "description2");
    }

    #[test]
    fn field_violation_empty_description_means_field_only() {
        let record = bad_request();
        assert!(find_field_violation(&record, "field1", Some("")).is_some());
    }

    #[test]
    fn field_violation_with_description_skips_earlier_entries() {
        let record = bad_request();
        let found = find_field_violation(&record, "field2", Some("description3")).unwrap();
        assert!(std::ptr::eq(found, &record.field_violations[2]));
    }

    #[test]
    fn field_violation_selective() {
        let record = bad_request();
        assert!(find_field_violation(&record, "field1", Some("description2")).is_none());
        assert!(find_field_violation(&record, "field_non_existing", None).is_none());
    }
}
