//! Path Validation Module
//!
//! Rejects directory traversal in caller-supplied paths before they are
//! handed to the engine binary.
//!
//! Validation inspects the raw string exactly as received. Nothing is
//! percent-decoded or canonicalized first; every encoded traversal form the
//! gateway must refuse is matched literally instead, so single and double
//! encoding cannot smuggle a `..` past the check.

use super::error::GatewayError;
use std::fmt;
use std::path::MAIN_SEPARATOR;

/// Literal traversal markers, matched case-sensitively
///
/// `..\` is already covered by `..`; it is listed so the backslash form
/// stays visible next to the encoded forms below.
const TRAVERSAL_MARKERS: [&str; 2] = ["..", "..\\"];

/// Percent-encoded traversal forms, matched case-insensitively
///
/// - `%2e%2e`: single encoding of `..`
/// - `%252e%252e`: double encoding of `..`
/// - `%2e.` / `.%2e`: mixed encoding
/// - `%5c%2e%2e%5c`: encoded backslash around encoded dots
const ENCODED_TRAVERSAL_MARKERS: [&str; 5] =
    ["%2e%2e", "%252e%252e", "%2e.", ".%2e", "%5c%2e%2e%5c"];

/// Check whether a raw path string is safe to forward
///
/// Rejects the empty string, any occurrence of `..` (segment-aligned or
/// not, so `a...b` is rejected too), a raw NUL byte, and the encoded
/// traversal forms above. Absolute paths, a leading `./` and dotted file
/// names are accepted.
///
/// # Example
///
/// ```
/// use godot_gateway::gateway::path::validate;
///
/// assert!(validate("/home/user/projects/game"));
/// assert!(!validate("/home/user/../etc/passwd"));
/// assert!(!validate("%2E%2E/etc/passwd"));
/// ```
pub fn validate(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }

    if path.contains('\0') {
        return false;
    }

    if TRAVERSAL_MARKERS.iter().any(|marker| path.contains(marker)) {
        return false;
    }

    let lowered = path.to_ascii_lowercase();
    !ENCODED_TRAVERSAL_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// A path that passed [`validate`]
///
/// Separator normalization is only reachable through this type, so it can
/// never run on a path that was not validated first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath(String);

impl ValidatedPath {
    /// Validate a raw path, failing with [`GatewayError::InvalidPath`]
    pub fn new(raw: &str) -> Result<Self, GatewayError> {
        if validate(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(GatewayError::InvalidPath(raw.to_string()))
        }
    }

    /// The path exactly as received
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalize separators for the engine binary
    ///
    /// Not a security boundary: acceptance has already been decided.
    pub fn normalize(&self) -> String {
        normalize_separators(&self.0, MAIN_SEPARATOR)
    }
}

impl fmt::Display for ValidatedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rewrite separators to `sep` and collapse repeated separators
///
/// With `\` as separator a leading pair (`\\server` or `//server`) is a
/// UNC prefix and is kept as `\\`; collapsing it would point at the root
/// of the current drive instead.
fn normalize_separators(path: &str, sep: char) -> String {
    let is_sep = |c: char| c == sep || (sep == '\\' && c == '/');
    let mut out = String::with_capacity(path.len());
    let mut last_was_sep = false;
    let mut rest = path;

    let mut leading = path.chars();
    if sep == '\\' && leading.next().is_some_and(is_sep) && leading.next().is_some_and(is_sep) {
        out.push_str("\\\\");
        rest = &path[2..];
        last_was_sep = true;
    }
    let unc_prefix_len = out.len();

    for c in rest.chars() {
        if is_sep(c) {
            if !last_was_sep {
                out.push(sep);
            }
            last_was_sep = true;
        } else {
            out.push(c);
            last_was_sep = false;
        }
    }

    // Drop a trailing separator unless the whole path is the root
    if out.len() > 1.max(unc_prefix_len) && out.ends_with(sep) {
        out.pop();
    }

    out
}
