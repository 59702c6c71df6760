//! Status code namespace - the canonical RPC status codes.
//!
//! Every [`Status`](crate::Status) carries exactly one [`Code`]. Codes are a
//! closed, frozen taxonomy: the seventeen canonical values shared by every
//! RPC runtime that speaks the rich-error model, numbered `0..=16`.
//!
//! # Representation
//!
//! - **Name**: `Code::as_str()` returns the canonical name (`"NotFound"`),
//!   which is also what `Display` writes. Failure output relies on this being
//!   stable.
//! - **Number**: `Code::value()` returns the wire number (`5` for
//!   `NotFound`). Numbers coming from outside the crate are validated through
//!   `Code::try_from(i32)`.
//!
//! # Example
//!
//! ```rust
//! use rpc_status_matchers::Code;
//!
//! assert_eq!(Code::NotFound.value(), 5);
//! assert_eq!(Code::NotFound.to_string(), "NotFound");
//! assert_eq!(Code::try_from(13), Ok(Code::Internal));
//! assert!(Code::try_from(42).is_err());
//! ```

use serde::Serialize;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Status Code
// ============================================================================

/// Canonical RPC status code.
///
/// # Copy Semantics
///
/// This type is Copy because it is a small enum representing classification
/// data, compared by value in every matcher that touches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(i32)]
pub enum Code {
    /// Not an error; returned on success.
    Ok = 0,
    /// The operation was cancelled, typically by the caller.
    Cancelled = 1,
    /// Unknown error.
    Unknown = 2,
    /// The client specified an invalid argument.
    InvalidArgument = 3,
    /// The deadline expired before the operation could complete.
    DeadlineExceeded = 4,
    /// Some requested entity was not found.
    NotFound = 5,
    /// The entity that a client attempted to create already exists.
    AlreadyExists = 6,
    /// The caller does not have permission to execute the operation.
    PermissionDenied = 7,
    /// Some resource has been exhausted.
    ResourceExhausted = 8,
    /// The system is not in a state required for the operation's execution.
    FailedPrecondition = 9,
    /// The operation was aborted, typically due to a concurrency issue.
    Aborted = 10,
    /// The operation was attempted past the valid range.
    OutOfRange = 11,
    /// The operation is not implemented or supported.
    Unimplemented = 12,
    /// Internal invariants expected by the underlying system were broken.
    Internal = 13,
    /// The service is currently unavailable.
    Unavailable = 14,
    /// Unrecoverable data loss or corruption.
    DataLoss = 15,
    /// The request does not have valid authentication credentials.
    Unauthenticated = 16,
}

impl Code {
    /// Every code, ordered by numeric value.
    pub const ALL: [Code; 17] = [
        Code::Ok,
        Code::Cancelled,
        Code::Unknown,
        Code::InvalidArgument,
        Code::DeadlineExceeded,
        Code::NotFound,
        Code::AlreadyExists,
        Code::PermissionDenied,
        Code::ResourceExhausted,
        Code::FailedPrecondition,
        Code::Aborted,
        Code::OutOfRange,
        Code::Unimplemented,
        Code::Internal,
        Code::Unavailable,
        Code::DataLoss,
        Code::Unauthenticated,
    ];

    /// Get the numeric wire value.
    #[inline]
    pub const fn value(self) -> i32 {
        self as i32
    }

    /// Get the canonical name.
    /// Zero-allocation - returns static string.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Code::Ok => "OK",
            Code::Cancelled => "Cancelled",
            Code::Unknown => "Unknown",
            Code::InvalidArgument => "InvalidArgument",
            Code::DeadlineExceeded => "DeadlineExceeded",
            Code::NotFound => "NotFound",
            Code::AlreadyExists => "AlreadyExists",
            Code::PermissionDenied => "PermissionDenied",
            Code::ResourceExhausted => "ResourceExhausted",
            Code::FailedPrecondition => "FailedPrecondition",
            Code::Aborted => "Aborted",
            Code::OutOfRange => "OutOfRange",
            Code::Unimplemented => "Unimplemented",
            Code::Internal => "Internal",
            Code::Unavailable => "Unavailable",
            Code::DataLoss => "DataLoss",
            Code::Unauthenticated => "Unauthenticated",
        }
    }

    /// Check if this code reports success.
    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, Code::Ok)
    }
}

impl fmt::Display for Code {
    /// Zero-allocation formatting - writes the canonical name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for Code {
    type Error = CodeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|index| Code::ALL.get(index).copied())
            .ok_or(CodeError::OutOfRange { value })
    }
}

impl From<Code> for i32 {
    #[inline]
    fn from(code: Code) -> Self {
        code.value()
    }
}

/// Error type for numeric code validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// Value is not one of the canonical codes (0-16).
    #[error("status code {value} is out of range (must be 0-16)")]
    OutOfRange {
        /// The rejected numeric value.
        value: i32,
    },
}

// ============================================================================
// Tests
// ============================================================================
