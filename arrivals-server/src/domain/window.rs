//! Arrival query window.

use std::fmt;

use chrono::TimeDelta;

/// Window used when neither the request nor the configuration gives one.
pub const DEFAULT_WINDOW_MINS: u32 = 30;

/// How far ahead, in minutes, to look for arrivals.
///
/// Parsing never fails: anything that isn't a non-negative integer falls
/// back to the supplied default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrivalWindow(u32);

impl ArrivalWindow {
    /// Create a window of the given number of minutes.
    pub const fn minutes(mins: u32) -> Self {
        ArrivalWindow(mins)
    }

    /// Parse a caller-supplied minutes value, substituting `default` when
    /// it is absent or not a non-negative integer.
    pub fn parse_or(raw: Option<&str>, default: ArrivalWindow) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => match s.parse::<u32>() {
                Ok(mins) => ArrivalWindow(mins),
                Err(e) => {
                    tracing::debug!(value = s, error = %e, "invalid minutes, using default");
                    default
                }
            },
            None => default,
        }
    }

    /// Number of minutes in the window.
    pub fn as_mins(&self) -> u32 {
        self.0
    }

    /// The window as a duration.
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.0))
    }
}

impl Default for ArrivalWindow {
    fn default() -> Self {
        ArrivalWindow(DEFAULT_WINDOW_MINS)
    }
}

impl fmt::Display for ArrivalWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.0)
    }
}
