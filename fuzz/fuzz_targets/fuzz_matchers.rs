#![no_main]
//! Drives every matcher with statuses built from arbitrary bytes.
//!
//! Evaluation must never panic, and failure messages must stay bounded
//! whatever the status contains.

use libfuzzer_sys::fuzz_target;
use rpc_status_matchers::*;

/// Split input into printable-ish strings on NUL bytes.
fn fields(data: &[u8]) -> Vec<String> {
    data.split(|b| *b == 0)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let code = Code::ALL[usize::from(selector) % Code::ALL.len()];
    let parts = fields(rest);
    let get = |i: usize| parts.get(i).cloned().unwrap_or_default();

    let mut st = Status::new(code, get(0));
    if selector & 0x20 != 0 {
        st = st.with_detail(BadRequest::new(
            parts.chunks(2).map(|pair| {
                FieldViolation::new(pair[0].clone(), pair.get(1).cloned().unwrap_or_default())
            }),
        ));
    }
    if selector & 0x40 != 0 {
        st = st.with_detail(ErrorInfo::new(get(1), get(2), [(get(3), get(4))]));
    }
    if selector & 0x80 != 0 {
        st = st.with_detail(RequestInfo::new(get(5), get(6)));
    }

    let result: Result<(), Status> = Err(st.clone());
    let limit = format::options().max_length * 8 + 256;

    let field = have_field_violation_with_description(get(1), get(2));
    let _ = field.matches(&result);
    assert!(field.failure_message(&result).len() <= limit);
    assert!(field.negated_failure_message(&result).len() <= limit);

    let reason = have_error_info_reason(equal(get(1)));
    let _ = reason.matches(&st);
    assert!(reason.failure_message(&st).len() <= limit);

    let metadata = have_error_info_metadata(have_key(get(3)));
    let _ = metadata.matches(&st);

    let message = have_status_message(contain_substring(get(0)));
    assert_eq!(message.matches(&st), Ok(true));

    let _ = match_status_code(code).negated_failure_message(&result);
    let _ = have_bad_request(equal_record(BadRequest::default())).failure_message(&st);
});
