use rpc_status_matchers::format::{self, FormatOptions};
use rpc_status_matchers::{
    BadRequest, Code, ErrorInfo, Matcher, Status, assert_not_that, assert_that, convenience,
    equal, formatter, have_error_info_reason, have_field_violation,
    have_field_violation_with_description, have_status_code, match_status_code,
};
use std::error::Error;

fn create_user(email: &str) -> Result<u64, Status> {
    // Simulate a server rejecting a malformed request
    if !email.contains('@') {
        return Err(Status::new(Code::InvalidArgument, "invalid user")
            .with_detail(BadRequest::with_violation("user.email", "must contain '@'"))
            .with_detail(ErrorInfo::new("EMAIL_INVALID", "users.example.com", [("email", email)])));
    }
    Ok(7)
}

fn delete_user(id: u64) -> Result<(), Box<dyn Error + Send + Sync>> {
    // Client plumbing usually erases the status behind a boxed error
    Err(Box::new(Status::new(Code::NotFound, format!("user {id} not found"))))
}

fn main() {
    // 1. Configure output once, before anything is rendered
    if let Err(err) = format::init(FormatOptions {
        max_length: 400,
        ..FormatOptions::default()
    }) {
        eprintln!("format options not applied: {err}");
    }
    formatter::register_status_formatter();

    println!("--- Basic Usage Example ---\n");

    // 2. Assert on a client result
    let created = create_user("not-an-email");
    assert_that!(created, have_status_code(equal(Code::InvalidArgument)));
    assert_that!(created, have_field_violation("user.email"));
    assert_that!(created, have_error_info_reason(equal("EMAIL_INVALID")));
    assert_not_that!(created, have_field_violation("user.name"));
    println!("1. create_user: InvalidArgument with a user.email violation");

    // 3. Boxed errors work the same way
    let deleted = delete_user(42);
    assert_that!(deleted, match_status_code(Code::NotFound));
    println!("2. delete_user: NotFound through a boxed error");

    // 4. What a failing assertion reports
    let matcher = have_field_violation_with_description("user.email", "must not be empty");
    println!("\n3. Failure message:");
    println!("{}", matcher.failure_message(&created));

    if let Err(report) = convenience::evaluate(&Ok::<u64, Status>(7), &match_status_code(Code::NotFound), false) {
        println!("\n4. Asserting on a success:");
        println!("{report}");
    }
}
