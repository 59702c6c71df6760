//! End-to-end scenarios through the public API.
//!
//! Each scenario builds the error an RPC client would get back and asserts on
//! it with the crate-root constructors, exactly as a service's test suite
//! would.

use rpc_status_matchers::*;
use std::error::Error;
use std::fmt;

/// Client-side wrapper that keeps the status as its source.
#[derive(Debug)]
struct CallFailed {
    method: &'static str,
    status: Status,
}

impl fmt::Display for CallFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call to {} failed", self.method)
    }
}

impl Error for CallFailed {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.status)
    }
}

error_subject!(CallFailed);

fn validation_failure() -> Status {
    Status::new(Code::NotFound, "random error").with_detail(
        BadRequest::with_violation("field1", "description1")
            .add_violation("field2", "description2")
            .add_violation("field3", "description3"),
    )
}

fn error_metadata() -> Status {
    Status::new(Code::Internal, "random error")
        .with_detail(ErrorInfo::new("reason", "domain", [("key", "value")]))
}

// ============================================================================
// SCENARIO A: FIELD VIOLATIONS
// ============================================================================

#[test]
fn scenario_a_field_violations() {
    let st = validation_failure();

    assert_eq!(have_field_violation("field1").matches(&st), Ok(true));
    assert_eq!(
        have_field_violation_with_description("field2", "description2").matches(&st),
        Ok(true)
    );
    assert_eq!(have_field_violation("field_non_existing").matches(&st), Ok(false));
    assert_eq!(
        have_field_violation_with_description("field2", "description3").matches(&st),
        Ok(false)
    );
}

#[test]
fn scenario_a_through_a_wrapped_error() {
    let err: Box<dyn Error + Send + Sync> = Box::new(CallFailed {
        method: "/users.Users/Create",
        status: validation_failure(),
    });

    assert_that!(err, have_field_violation("field3"));
    assert_not_that!(err, have_field_violation("field_non_existing"));
}

#[test]
fn scenario_a_through_a_boxed_result() {
    let result: Result<(), Box<dyn Error + Send + Sync>> = Err(Box::new(CallFailed {
        method: "/users.Users/Create",
        status: validation_failure(),
    }));

    assert_that!(result, have_status_code(equal(Code::NotFound)));
    assert_that!(result, have_field_violation_with_description("field1", "description1"));
    assert_eq!(match_status_code(Code::NotFound).matches(&result), Ok(true));

    let ok: Result<u32, Box<dyn Error + Send + Sync>> = Ok(1);
    assert_eq!(
        have_field_violation("field1").matches(&ok),
        Err(MatchError::ExpectedError)
    );
}

#[test]
fn scenario_a_through_a_client_error_type() {
    let result: Result<(), CallFailed> = Err(CallFailed {
        method: "/users.Users/Create",
        status: validation_failure(),
    });

    assert_that!(result, have_field_violation("field2"));
    assert_not_that!(result, match_status_code(Code::Internal));
}

#[test]
fn scenario_a_failure_message() {
    let st = validation_failure();
    let msg = have_field_violation_with_description("field2", "description3").failure_message(&st);

    assert!(msg.starts_with("Expected\n"), "{msg}");
    assert!(msg.contains("description2"), "{msg}");
    assert!(msg.contains("\nto have the field violation\n"), "{msg}");
    assert!(msg.ends_with("[field2: description3]"), "{msg}");
}

// ============================================================================
// SCENARIO B: ERROR METADATA
// ============================================================================

#[test]
fn scenario_b_error_metadata() {
    let result: Result<(), Status> = Err(error_metadata());

    assert_eq!(have_error_info_reason(equal("reason")).matches(&result), Ok(true));
    assert_eq!(
        have_error_info_domain(equal("domain_nonexisting")).matches(&result),
        Ok(false)
    );
    assert_eq!(have_error_info_metadata(have_key("key")).matches(&result), Ok(true));
    assert_eq!(
        have_error_info_metadata(have_key("key_nonexisting")).matches(&result),
        Ok(false)
    );
}

#[test]
fn scenario_b_whole_record() {
    let result: Result<(), Status> = Err(error_metadata());

    assert_that!(
        result,
        have_error_info(equal_record(ErrorInfo::new("reason", "domain", [("key", "value")])))
    );
    assert_not_that!(
        result,
        have_error_info(equal_record(ErrorInfo::new("reason", "domain", [("key", "other")])))
    );
}

#[test]
fn scenario_b_missing_record() {
    let st = validation_failure();
    let matcher = have_error_info_reason(equal("reason"));

    assert_eq!(
        matcher.matches(&st),
        Err(MatchError::DetailNotFound {
            kind: DetailKind::ErrorInfo
        })
    );
    assert!(
        matcher
            .failure_message(&st)
            .ends_with("does not have any ErrorInfo record in its details")
    );
}

// ============================================================================
// SCENARIO C: STATUS CODE
// ============================================================================

#[test]
fn scenario_c_status_code() {
    let not_found = Status::new(Code::NotFound, "random error");
    let internal = Status::new(Code::Internal, "random error");
    let matcher = have_status_code(equal(Code::NotFound));

    assert_eq!(matcher.matches(&not_found), Ok(true));
    assert_eq!(matcher.matches(&internal), Ok(false));

    assert_eq!(match_status_code(Code::NotFound).matches(&not_found), Ok(true));
    assert_eq!(match_status_code(Code::NotFound).matches(&internal), Ok(false));
}

#[test]
fn scenario_c_status_message() {
    let result: Result<u32, Status> = Err(Status::new(Code::NotFound, "random error"));

    assert_that!(result, have_status_message(equal("random error")));
    assert_that!(result, have_status_message(contain_substring("random")));
    assert_not_that!(result, have_status_message(contain_substring("timeout")));
}

// ============================================================================
// PRECONDITIONS
// ============================================================================

#[test]
fn non_errors_and_foreign_errors() {
    let matcher = have_status_code(equal(Code::NotFound));

    assert_eq!(matcher.matches(&Ok::<u32, Status>(7)), Err(MatchError::ExpectedError));
    assert!(matcher.failure_message(&Ok::<u32, Status>(7)).ends_with("is not an error"));

    let io: Box<dyn Error> = Box::new(std::io::Error::other("connection reset"));
    assert_eq!(matcher.matches(&io), Err(MatchError::ExpectedStatusError));
    assert!(matcher.failure_message(&io).ends_with("is not an RPC-status error"));
}

#[test]
#[should_panic(expected = "is not an error")]
fn assertions_fail_loudly_on_non_errors() {
    assert_that!("not an error", have_status_code(equal(Code::NotFound)));
}

// ============================================================================
// STATUS RENDERING
// ============================================================================

#[test]
fn registered_formatter_renders_statuses() {
    formatter::register_status_formatter();

    let st = Status::new(Code::NotFound, "random error");
    let msg = match_status_code(Code::NotFound).negated_failure_message(&st);

    assert!(
        msg.contains("{status: NotFound, status_code: 5, message: \"random error\", details: []}"),
        "{msg}"
    );
}
