//! RPC status data model: the values every matcher in this crate reads.
//!
//! # Architecture
//!
//! - [`Status`]: code, human-readable message and an ordered sequence of
//!   detail records. Built once by the producer of the error, never mutated.
//! - [`Detail`]: tagged union over the standard rich-error records. Matchers
//!   locate records by tag ([`DetailKind`]) instead of casting.
//! - [`DetailRecord`]: implemented by every record type. It carries the
//!   record's tag and the variant predicate shared by all locators.
//!
//! # Immutability
//!
//! Fields are private and every builder method consumes `self`, so once a
//! status is handed to a matcher nothing can change it. All matchers operate
//! on shared references.
//!
//! # Example
//!
//! ```rust
//! use rpc_status_matchers::{BadRequest, Code, ErrorInfo, Status};
//!
//! let st = Status::new(Code::InvalidArgument, "bad payload")
//!     .with_detail(BadRequest::with_violation("name", "must not be empty"))
//!     .with_detail(ErrorInfo::new("EMPTY_NAME", "example.com", [("field", "name")]));
//!
//! assert_eq!(st.code(), Code::InvalidArgument);
//! assert_eq!(st.details().len(), 2);
//! ```

use crate::Code;
use serde::Serialize;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::time::Duration;

// ============================================================================
// Detail Records
// ============================================================================

/// A single input violation: which field was wrong and why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FieldViolation {
    /// Path to the offending field (e.g. `user.address.zip`).
    pub field: String,
    /// Human-readable explanation of the violation.
    pub description: String,
}

impl FieldViolation {
    /// Create a field violation.
    #[inline]
    pub fn new(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            description: description.into(),
        }
    }
}

/// Validation-failure record listing field-level input violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BadRequest {
    /// Violations, in the order the producer reported them.
    pub field_violations: Vec<FieldViolation>,
}

impl BadRequest {
    /// Create a record from a list of violations.
    #[inline]
    pub fn new(field_violations: impl IntoIterator<Item = FieldViolation>) -> Self {
        Self {
            field_violations: field_violations.into_iter().collect(),
        }
    }

    /// Create a record holding exactly one violation.
    #[inline]
    pub fn with_violation(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new([FieldViolation::new(field, description)])
    }

    /// Append a violation.
    #[inline]
    pub fn add_violation(mut self, field: impl Into<String>, description: impl Into<String>) -> Self {
        self.field_violations.push(FieldViolation::new(field, description));
        self
    }

    /// Check if the record carries no violations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.field_violations.is_empty()
    }
}

/// Error-metadata record: machine-readable reason, its domain, and
/// free-form key/value metadata.
///
/// Metadata is an ordered map so that failure output is stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorInfo {
    /// UPPER_SNAKE_CASE reason identifier.
    pub reason: String,
    /// Logical grouping the reason belongs to, usually a service name.
    pub domain: String,
    /// Additional structured context.
    pub metadata: BTreeMap<String, String>,
}

impl ErrorInfo {
    /// Create an error-metadata record.
    pub fn new<K, V>(
        reason: impl Into<String>,
        domain: impl Into<String>,
        metadata: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            reason: reason.into(),
            domain: domain.into(),
            metadata: metadata
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Identifies the request that produced the error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RequestInfo {
    /// Opaque request identifier.
    pub request_id: String,
    /// Data used to serve the request, e.g. an encrypted stack trace.
    pub serving_data: String,
}

impl RequestInfo {
    /// Create a request-info record.
    #[inline]
    pub fn new(request_id: impl Into<String>, serving_data: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            serving_data: serving_data.into(),
        }
    }
}

/// Tells the client when it may retry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RetryInfo {
    /// Minimum delay before retrying, if the server specified one.
    pub retry_delay: Option<Duration>,
}

impl RetryInfo {
    /// Create a retry-info record.
    #[inline]
    pub fn new(retry_delay: Option<Duration>) -> Self {
        Self { retry_delay }
    }
}

/// Debugging information attached by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DebugInfo {
    /// Stack trace entries.
    pub stack_entries: Vec<String>,
    /// Additional debugging detail.
    pub detail: String,
}

impl DebugInfo {
    /// Create a debug-info record.
    pub fn new<S: Into<String>>(stack_entries: impl IntoIterator<Item = S>, detail: impl Into<String>) -> Self {
        Self {
            stack_entries: stack_entries.into_iter().map(Into::into).collect(),
            detail: detail.into(),
        }
    }
}

// ============================================================================
// Tagged Detail Union
// ============================================================================

/// Tag naming a detail record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailKind {
    /// [`BadRequest`]
    BadRequest,
    /// [`ErrorInfo`]
    ErrorInfo,
    /// [`RequestInfo`]
    RequestInfo,
    /// [`RetryInfo`]
    RetryInfo,
    /// [`DebugInfo`]
    DebugInfo,
}

impl DetailKind {
    /// Get the record type name used in diagnostics.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            DetailKind::BadRequest => "BadRequest",
            DetailKind::ErrorInfo => "ErrorInfo",
            DetailKind::RequestInfo => "RequestInfo",
            DetailKind::RetryInfo => "RetryInfo",
            DetailKind::DebugInfo => "DebugInfo",
        }
    }
}

impl fmt::Display for DetailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detail record attached to a [`Status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@type")]
pub enum Detail {
    /// Validation failure.
    BadRequest(BadRequest),
    /// Machine-readable error metadata.
    ErrorInfo(ErrorInfo),
    /// Request identification.
    RequestInfo(RequestInfo),
    /// Retry advice.
    RetryInfo(RetryInfo),
    /// Server debugging information.
    DebugInfo(DebugInfo),
}

impl Detail {
    /// Get the tag of this record.
    #[inline]
    pub const fn kind(&self) -> DetailKind {
        match self {
            Detail::BadRequest(_) => DetailKind::BadRequest,
            Detail::ErrorInfo(_) => DetailKind::ErrorInfo,
            Detail::RequestInfo(_) => DetailKind::RequestInfo,
            Detail::RetryInfo(_) => DetailKind::RetryInfo,
            Detail::DebugInfo(_) => DetailKind::DebugInfo,
        }
    }

    /// Check if this record has the given tag.
    #[inline]
    pub fn is(&self, kind: DetailKind) -> bool {
        self.kind() == kind
    }
}

/// A concrete detail record type that can be located inside a [`Detail`].
///
/// The bounds make every record comparable (`PartialEq`), printable in
/// failure output (`Debug`), and renderable as canonical field-ordered text
/// (`Serialize`).
pub trait DetailRecord: fmt::Debug + PartialEq + Serialize + 'static {
    /// Tag of the variant holding this record.
    const KIND: DetailKind;

    /// Return the record if `detail` is this kind.
    fn from_detail(detail: &Detail) -> Option<&Self>;
}

macro_rules! detail_records {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl DetailRecord for $ty {
                const KIND: DetailKind = DetailKind::$ty;

                #[inline]
                fn from_detail(detail: &Detail) -> Option<&Self> {
                    match detail {
                        Detail::$ty(record) => Some(record),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Detail {
                #[inline]
                fn from(record: $ty) -> Self {
                    Detail::$ty(record)
                }
            }
        )+
    };
}

detail_records!(BadRequest, ErrorInfo, RequestInfo, RetryInfo, DebugInfo);

// ============================================================================
// Status
// ============================================================================

/// Structured outcome of a failed RPC call.
///
/// A `Status` is itself an error, so it can be returned directly from RPC
/// client code or wrapped as the `source()` of another error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: Code,
    message: Cow<'static, str>,
    details: SmallVec<[Detail; 2]>,
}

impl Status {
    /// Create a status without details.
    #[inline]
    pub fn new(code: Code, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
            details: SmallVec::new(),
        }
    }

    /// Attach one detail record, keeping insertion order.
    #[inline]
    pub fn with_detail(mut self, detail: impl Into<Detail>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Attach several detail records, keeping insertion order.
    #[inline]
    pub fn with_details<D: Into<Detail>>(mut self, details: impl IntoIterator<Item = D>) -> Self {
        self.details.extend(details.into_iter().map(Into::into));
        self
    }

    /// Get the status code.
    #[inline]
    pub const fn code(&self) -> Code {
        self.code
    }

    /// Get the human-readable message.
    #[inline]
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Get the detail records in insertion order.
    #[inline]
    pub fn details(&self) -> &[Detail] {
        &self.details
    }

    /// Extract the status carried by an error.
    ///
    /// Checks the error itself and then walks its `source()` chain, returning
    /// the first [`Status`] found. Returns `None` if no link in the chain is a
    /// status.
    pub fn from_error<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a Status> {
        let mut current = Some(err);
        while let Some(err) = current {
            if let Some(status) = err.downcast_ref::<Status>() {
                return Some(status);
            }
            current = err.source();
        }
        None
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rpc error: code = {} desc = {}", self.code, self.message)
    }
}

impl Error for Status {}

// ============================================================================
// Tests
// ============================================================================
