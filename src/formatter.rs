//! Status rendering hook for failure output.
//!
//! Without the hook a status prints through its `Debug` derive. Once
//! [`register_status_formatter`] has run, every status rendered by
//! [`format::object`](crate::format::object) reads as:
//!
//! ```text
//! {status: NotFound, status_code: 5, message: "random error", details: [...]}
//! ```
//!
//! Call it once while the test suite boots. Matchers never call it. Removing
//! the hook with [`unregister_status_formatter`] (or through
//! [`format::unregister_custom_formatter`]) is not permanent: the next
//! registration installs it again.

use crate::Status;
use crate::format::{self, FormatterKey};
use std::any::Any;
use std::error::Error;
use std::sync::Mutex;
use tracing::debug;

static STATUS_FORMATTER: Mutex<Option<FormatterKey>> = Mutex::new(None);

/// Install the status formatter into the custom-formatter registry.
///
/// Idempotent while installed: later calls return the key of the live
/// registration. Once that key has been unregistered, the next call registers
/// the formatter again under a new key.
pub fn register_status_formatter() -> FormatterKey {
    let mut current = match STATUS_FORMATTER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(key) = *current {
        if format::is_registered(key) {
            return key;
        }
    }
    let key = format::register_custom_formatter(status_formatter);
    debug!(?key, "status formatter registered");
    *current = Some(key);
    key
}

/// Remove the status formatter if it is installed.
///
/// Returns `false` if it was not.
pub fn unregister_status_formatter() -> bool {
    let mut current = match STATUS_FORMATTER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    match current.take() {
        Some(key) => format::unregister_custom_formatter(key),
        None => false,
    }
}

/// Render `value` if it is, or wraps, a [`Status`].
///
/// Recognises a bare `Status` and boxed errors whose source chain holds one.
pub fn status_formatter(value: &dyn Any) -> Option<String> {
    let status = if let Some(status) = value.downcast_ref::<Status>() {
        status
    } else if let Some(err) = value.downcast_ref::<Box<dyn Error + Send + Sync>>() {
        Status::from_error(err.as_ref())?
    } else if let Some(err) = value.downcast_ref::<Box<dyn Error>>() {
        Status::from_error(err.as_ref())?
    } else {
        return None;
    };
    Some(render(status))
}

fn render(status: &Status) -> String {
    format!(
        "{{status: {}, status_code: {}, message: {:?}, details: {:?}}}",
        status.code(),
        status.code().value(),
        status.message(),
        status.details(),
    )
}
