//! Request parsing and small response bodies.

use qstring::QString;
use serde::{Deserialize, Serialize};

use crate::domain::StopId;

/// Query parameters of the arrivals routes.
///
/// `stop` may repeat, which rules out a derived `Query` extractor, so the
/// raw query string is parsed by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrivalsQuery {
    /// Every non-blank `stop` value, in request order
    pub stops: Vec<String>,

    /// The `stopId` value, if present and non-blank
    pub stop_id: Option<String>,

    /// The first `minutes` value, unparsed
    pub minutes: Option<String>,
}

impl ArrivalsQuery {
    /// Parse a raw query string (without the leading `?`).
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        let mut query = Self::default();
        for (name, value) in QString::from(raw).into_pairs() {
            match name.as_str() {
                "stop" if !value.trim().is_empty() => query.stops.push(value),
                "stopId" if query.stop_id.is_none() && !value.trim().is_empty() => {
                    query.stop_id = Some(value)
                }
                "minutes" if query.minutes.is_none() => query.minutes = Some(value),
                _ => {}
            }
        }
        query
    }

    /// Normalized ids of the repeated `stop` parameter.
    pub fn stop_ids(&self) -> Vec<StopId> {
        self.stops.iter().map(|s| StopId::normalize(s)).collect()
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check body for JSON clients.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
