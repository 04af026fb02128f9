//! Stop identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix shared by every canonical stop id in the feed.
pub const CANONICAL_PREFIX: &str = "8220DB00";

/// Minimum number of digits after the prefix.
const POLE_CODE_WIDTH: usize = 4;

/// A stop identifier in the feed's canonical scheme.
///
/// Callers usually know a stop by the short "pole code" printed on the
/// stop itself (e.g. `1348`). The feed identifies the same stop as
/// [`CANONICAL_PREFIX`] followed by the zero-padded pole code
/// (e.g. `8220DB001348`). [`StopId::normalize`] maps the former onto the
/// latter and passes anything else through, so a `StopId` is not
/// guaranteed to name a stop that exists.
///
/// # Examples
///
/// ```
/// use arrivals_server::domain::StopId;
///
/// assert_eq!(StopId::normalize("1348").as_str(), "8220DB001348");
/// assert_eq!(StopId::normalize(" 8220DB009999 ").as_str(), "8220DB009999");
///
/// // Unrecognised tokens are kept as-is
/// assert_eq!(StopId::normalize("kiosk-7").as_str(), "kiosk-7");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(String);

impl StopId {
    /// Canonicalize a caller-supplied stop identifier.
    ///
    /// Never fails: empty input gives an empty id, and tokens that are
    /// neither canonical nor all-digit come back trimmed but otherwise
    /// unchanged.
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with(CANONICAL_PREFIX) {
            return StopId(trimmed.to_string());
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            // Pad the significant digits rather than parsing, so long
            // pole codes can't overflow.
            let significant = trimmed.trim_start_matches('0');
            return StopId(format!(
                "{CANONICAL_PREFIX}{significant:0>width$}",
                width = POLE_CODE_WIDTH
            ));
        }

        StopId(trimmed.to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty id.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The digits after the canonical prefix, if this id is a canonical
    /// prefix followed only by digits.
    pub fn pole_code(&self) -> Option<&str> {
        let suffix = self.0.strip_prefix(CANONICAL_PREFIX)?;
        if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
            Some(suffix)
        } else {
            None
        }
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
