//! Failure-message formatting shared by every matcher.
//!
//! All failure output has the same shape:
//!
//! ```text
//! Expected
//!     <Code>: Internal
//! to equal
//!     <Code>: NotFound
//! ```
//!
//! Matchers render the actual (and optionally the expected) value with
//! [`object`], [`raw_object`] or [`text`], then assemble the message with
//! [`message`] / [`message_with`]. Keeping this in one place means every
//! failure path reads the same, whatever matcher produced it.
//!
//! # Bounded Output
//!
//! Rendered values, indentation included, are truncated to
//! [`FormatOptions::max_length`] bytes with a visible `...[TRUNCATED]`
//! indicator, always at a UTF-8 boundary. A status with thousands of field
//! violations still produces readable output. A limit too small to hold the
//! indicator is rejected by [`init`].
//!
//! # Process-Wide State
//!
//! Two pieces of global state live here, both meant to be written once while
//! the test suite boots and only read afterwards:
//!
//! - [`FormatOptions`], set through [`init`].
//! - The custom-formatter registry ([`register_custom_formatter`]), which lets
//!   the host render selected types specially. [`object`] consults it before
//!   falling back to `Debug`. Matchers never register formatters themselves.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{OnceLock, RwLock};
use thiserror::Error;
use tracing::debug;

/// Truncation indicator appended to truncated renderings
pub const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Default maximum length of one rendered value, in bytes
pub const DEFAULT_MAX_LENGTH: usize = 4000;

/// Default indentation unit
pub const DEFAULT_INDENT: &str = "    ";

// ============================================================================
// Options
// ============================================================================

/// Formatting options applied to every rendered value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Maximum length of one rendered value in bytes. `0` disables truncation,
    /// otherwise it must be at least [`TRUNCATION_INDICATOR`]`.len()`.
    pub max_length: usize,
    /// Indentation unit placed before rendered values.
    pub indent: Cow<'static, str>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            indent: Cow::Borrowed(DEFAULT_INDENT),
        }
    }
}

/// Error type for formatting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Options were already set, or already read with their defaults.
    #[error("format options are already initialized")]
    AlreadyInitialized,

    /// The limit cannot hold the truncation indicator.
    #[error("max_length {max_length} is below the minimum of {minimum} bytes")]
    MaxLengthTooSmall {
        /// Requested limit
        max_length: usize,
        /// Smallest accepted non-zero limit
        minimum: usize,
    },
}

impl FormatOptions {
    /// Check that these options can be installed.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::MaxLengthTooSmall`] for a non-zero limit
    /// shorter than [`TRUNCATION_INDICATOR`].
    pub fn validate(&self) -> Result<(), FormatError> {
        let minimum = TRUNCATION_INDICATOR.len();
        if self.max_length != 0 && self.max_length < minimum {
            return Err(FormatError::MaxLengthTooSmall {
                max_length: self.max_length,
                minimum,
            });
        }
        Ok(())
    }
}

static OPTIONS: OnceLock<FormatOptions> = OnceLock::new();

/// Set the process-wide formatting options.
///
/// Call this once during test-suite bootstrap, before any failure message is
/// rendered. The first rendering freezes the defaults.
///
/// # Errors
///
/// Returns [`FormatError::MaxLengthTooSmall`] if the options fail
/// [`FormatOptions::validate`], and [`FormatError::AlreadyInitialized`] if
/// options were already set or already read. A rejected call leaves the
/// options unset.
pub fn init(options: FormatOptions) -> Result<(), FormatError> {
    options.validate()?;
    let max_length = options.max_length;
    OPTIONS
        .set(options)
        .map_err(|_| FormatError::AlreadyInitialized)?;
    debug!(max_length, "format options initialized");
    Ok(())
}

/// Get the active formatting options.
#[inline]
pub fn options() -> &'static FormatOptions {
    OPTIONS.get_or_init(FormatOptions::default)
}

// ============================================================================
// Custom Formatter Registry
// ============================================================================

/// A hook that renders selected values specially.
///
/// Returns `None` for values it does not handle.
pub type CustomFormatter = fn(&dyn Any) -> Option<String>;

/// Handle returned by [`register_custom_formatter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatterKey(u64);

static CUSTOM_FORMATTERS: RwLock<Vec<(FormatterKey, CustomFormatter)>> = RwLock::new(Vec::new());

static NEXT_FORMATTER_KEY: AtomicU64 = AtomicU64::new(1);

/// Register a custom formatter consulted by [`object`].
///
/// Formatters are consulted in registration order; the first one returning
/// `Some` wins.
pub fn register_custom_formatter(formatter: CustomFormatter) -> FormatterKey {
    let key = FormatterKey(NEXT_FORMATTER_KEY.fetch_add(1, Ordering::Relaxed));
    let mut formatters = match CUSTOM_FORMATTERS.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    formatters.push((key, formatter));
    debug!(key = key.0, registered = formatters.len(), "custom formatter registered");
    key
}

/// Remove a previously registered formatter.
///
/// Returns `false` if the key was not registered.
pub fn unregister_custom_formatter(key: FormatterKey) -> bool {
    let mut formatters = match CUSTOM_FORMATTERS.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let before = formatters.len();
    formatters.retain(|(registered, _)| *registered != key);
    before != formatters.len()
}

/// Check whether `key` is still registered.
pub fn is_registered(key: FormatterKey) -> bool {
    let formatters = match CUSTOM_FORMATTERS.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    formatters.iter().any(|(registered, _)| *registered == key)
}

fn apply_custom_formatters(value: &dyn Any) -> Option<String> {
    let formatters = match CUSTOM_FORMATTERS.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    formatters.iter().find_map(|(_, formatter)| formatter(value))
}

// ============================================================================
// Rendering
// ============================================================================

/// Render a value as `<Type>: value` at the given indentation depth.
///
/// Registered custom formatters are consulted first.
pub fn object<T: Any + fmt::Debug>(value: &T, indentation: usize) -> String {
    match apply_custom_formatters(value) {
        Some(custom) => bounded(&custom, indentation, options()),
        None => raw_object(value, indentation),
    }
}

/// Render a value as `<Type>: value` without consulting custom formatters.
///
/// Used for values that are not `'static` or not sized.
pub fn raw_object<T: fmt::Debug + ?Sized>(value: &T, indentation: usize) -> String {
    let rendered = format!("<{}>: {:?}", short_type_name(std::any::type_name::<T>()), value);
    bounded(&rendered, indentation, options())
}

/// Render pre-formatted text (e.g. canonical JSON) at the given depth.
pub fn text(value: &str, indentation: usize) -> String {
    bounded(value, indentation, options())
}

/// Assemble `Expected\n<actual>\n<message>`.
///
/// `actual` must already be rendered.
pub fn message(actual: &str, message: &str) -> String {
    format!("Expected\n{actual}\n{message}")
}

/// Assemble `Expected\n<actual>\n<message>\n<expected>`.
///
/// Both sides must already be rendered.
pub fn message_with(actual: &str, message: &str, expected: &str) -> String {
    format!("Expected\n{actual}\n{message}\n{expected}")
}

/// Strip module paths from a type name.
///
/// `alloc::collections::btree::map::BTreeMap<alloc::string::String, u8>`
/// becomes `BTreeMap<String, u8>`.
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
            continue;
        }
        out.push(c);
        if !(c.is_alphanumeric() || c == '_') {
            segment_start = out.len();
        }
    }
    out
}

/// Indent, then truncate, so the limit covers the indentation too.
fn bounded(rendered: &str, indentation: usize, options: &FormatOptions) -> String {
    let indented = indent(rendered, &options.indent, indentation);
    truncate_to(&indented, options.max_length).into_owned()
}

fn indent<'a>(rendered: &'a str, unit: &str, indentation: usize) -> Cow<'a, str> {
    if indentation == 0 || unit.is_empty() {
        return Cow::Borrowed(rendered);
    }
    let prefix = unit.repeat(indentation);
    let lines = rendered.split('\n').count();
    let mut out = String::with_capacity(rendered.len() + lines * prefix.len());
    for (i, line) in rendered.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&prefix);
        out.push_str(line);
    }
    Cow::Owned(out)
}

/// Truncate a rendering to `max_length` bytes.
///
/// If the string exceeds the limit, it's truncated with an indicator to
/// make the truncation visible. A limit shorter than the indicator keeps
/// only as much of the indicator as fits.
///
/// Returns a Cow<str> to avoid allocation when no truncation is needed.
fn truncate_to(s: &str, max_length: usize) -> Cow<'_, str> {
    if max_length == 0 || s.len() <= max_length {
        return Cow::Borrowed(s);
    }

    if max_length <= TRUNCATION_INDICATOR.len() {
        return Cow::Borrowed(&TRUNCATION_INDICATOR[..max_length]);
    }

    let mut idx = max_length - TRUNCATION_INDICATOR.len();
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 64;

    #[test]
    fn short_type_names_drop_paths() {
        assert_eq!(short_type_name("alloc::string::String"), "String");
        assert_eq!(
            short_type_name("alloc::collections::btree::map::BTreeMap<alloc::string::String, u8>"),
            "BTreeMap<String, u8>"
        );
        assert_eq!(short_type_name("&str"), "&str");
        assert_eq!(
            short_type_name("core::option::Option<rpc_status_matchers::models::BadRequest>"),
            "Option<BadRequest>"
        );
    }

    #[test]
    fn raw_object_prefixes_type() {
        assert_eq!(raw_object(&42u8, 0), "<u8>: 42");
        assert_eq!(raw_object("text", 0), "<str>: \"text\"");
    }

    #[test]
    fn indentation_applies_to_every_line() {
        let indented = text("a\nb", 1);
        assert_eq!(indented, format!("{0}a\n{0}b", options().indent));
    }

    #[test]
    fn message_layout() {
        assert_eq!(message("    x", "is not an error"), "Expected\n    x\nis not an error");
        assert_eq!(
            message_with("    x", "to equal", "    y"),
            "Expected\n    x\nto equal\n    y"
        );
    }

    #[test]
    fn no_truncate_when_under_limit() {
        let truncated = truncate_to("short string", LIMIT);
        assert!(matches!(truncated, Cow::Borrowed(_)));
        assert_eq!(truncated, "short string");
    }

    #[test]
    fn exactly_at_limit() {
        let s = "a".repeat(LIMIT);
        let truncated = truncate_to(&s, LIMIT);
        assert!(matches!(truncated, Cow::Borrowed(_)));
        assert!(!truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn one_over_limit() {
        let s = "a".repeat(LIMIT + 1);
        let truncated = truncate_to(&s, LIMIT);
        assert!(matches!(truncated, Cow::Owned(_)));
        assert!(truncated.len() <= LIMIT);
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn truncate_utf8_boundary() {
        let s = "й".repeat(LIMIT);
        let truncated = truncate_to(&s, LIMIT);
        assert!(std::str::from_utf8(truncated.as_bytes()).is_ok());
        assert!(truncated.len() <= LIMIT);
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn limit_below_indicator_is_respected() {
        let s = "x".repeat(100);
        for limit in 1..=TRUNCATION_INDICATOR.len() {
            let truncated = truncate_to(&s, limit);
            assert_eq!(truncated.len(), limit);
            assert!(TRUNCATION_INDICATOR.starts_with(truncated.as_ref()));
        }
    }

    #[test]
    fn indentation_counts_toward_limit() {
        let options = FormatOptions {
            max_length: LIMIT,
            ..FormatOptions::default()
        };
        let json = (0..20).map(|i| format!("\"key{i}\": {i},")).collect::<Vec<_>>().join("\n");

        let rendered = bounded(&json, 2, &options);
        assert!(rendered.len() <= LIMIT, "{rendered}");
        assert!(rendered.starts_with("        \"key0\""), "{rendered}");
        assert!(rendered.ends_with(TRUNCATION_INDICATOR));

        assert_eq!(bounded("a\nb", 1, &options), "    a\n    b");
    }

    #[test]
    fn validation_rejects_tiny_limits() {
        let tiny = FormatOptions {
            max_length: 8,
            ..FormatOptions::default()
        };
        assert_eq!(
            tiny.validate(),
            Err(FormatError::MaxLengthTooSmall {
                max_length: 8,
                minimum: TRUNCATION_INDICATOR.len(),
            })
        );

        for max_length in [0, TRUNCATION_INDICATOR.len(), DEFAULT_MAX_LENGTH] {
            let options = FormatOptions {
                max_length,
                ..FormatOptions::default()
            };
            assert_eq!(options.validate(), Ok(()));
        }
    }

    #[test]
    fn zero_disables_truncation() {
        let s = "a".repeat(10 * LIMIT);
        assert_eq!(truncate_to(&s, 0).len(), s.len());
    }

    #[derive(Debug)]
    struct OnlyForRegistryTest(u8);

    fn registry_test_formatter(value: &dyn Any) -> Option<String> {
        value
            .downcast_ref::<OnlyForRegistryTest>()
            .map(|v| format!("custom #{}", v.0))
    }

    #[test]
    fn custom_formatter_round_trip() {
        let value = OnlyForRegistryTest(7);
        assert_eq!(object(&value, 0), "<OnlyForRegistryTest>: OnlyForRegistryTest(7)");

        let key = register_custom_formatter(registry_test_formatter);
        assert_eq!(object(&value, 0), "custom #7");
        assert_eq!(object(&3u8, 0), "<u8>: 3");

        assert!(is_registered(key));
        assert!(unregister_custom_formatter(key));
        assert!(!unregister_custom_formatter(key));
        assert!(!is_registered(key));
        assert_eq!(object(&value, 0), "<OnlyForRegistryTest>: OnlyForRegistryTest(7)");
    }
}
