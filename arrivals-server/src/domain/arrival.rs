//! Arrival predictions and per-stop results.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::StopId;

/// One predicted vehicle visit at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrival {
    /// Route label shown on the vehicle (e.g. "46A")
    pub route: String,

    /// Destination / headsign
    pub headsign: String,

    /// Operating agency, if known
    #[serde(default)]
    pub agency: Option<String>,

    /// Timetabled arrival time
    pub scheduled_arrival: DateTime<FixedOffset>,

    /// Real-time corrected arrival time, if the feed has one
    #[serde(default)]
    pub real_time_arrival: Option<DateTime<FixedOffset>>,

    /// Stop this prediction is for
    pub stop_id: StopId,
}

impl Arrival {
    /// Best estimate of when the vehicle arrives.
    pub fn expected(&self) -> DateTime<FixedOffset> {
        self.real_time_arrival.unwrap_or(self.scheduled_arrival)
    }

    /// Ordering used for arrival lists: expected time, then route label.
    pub fn display_order(a: &Arrival, b: &Arrival) -> Ordering {
        a.expected()
            .cmp(&b.expected())
            .then_with(|| a.route.cmp(&b.route))
    }
}

/// Arrivals at a single stop.
///
/// An empty name with no arrivals is what a stop looks like when it could
/// not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StopResult {
    /// Display name of the stop (may be empty)
    #[serde(default)]
    pub stop_name: String,

    /// Arrivals ordered by expected time, ties broken by route
    #[serde(default)]
    pub arrivals: Vec<Arrival>,
}

impl StopResult {
    /// Create a result, sorting the arrivals into display order.
    pub fn new(stop_name: impl Into<String>, mut arrivals: Vec<Arrival>) -> Self {
        arrivals.sort_by(Arrival::display_order);
        Self {
            stop_name: stop_name.into(),
            arrivals,
        }
    }

    /// The result for a stop that could not be resolved.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this carries neither a name nor arrivals.
    pub fn is_empty(&self) -> bool {
        self.stop_name.is_empty() && self.arrivals.is_empty()
    }
}

/// Results for several stops, keyed by stop id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopResults(pub BTreeMap<StopId, StopResult>);

impl StopResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stop: StopId, result: StopResult) {
        self.0.insert(stop, result);
    }

    pub fn get(&self, stop: &StopId) -> Option<&StopResult> {
        self.0.get(stop)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StopId, &StopResult)> {
        self.0.iter()
    }
}

impl FromIterator<(StopId, StopResult)> for StopResults {
    fn from_iter<I: IntoIterator<Item = (StopId, StopResult)>>(iter: I) -> Self {
        StopResults(iter.into_iter().collect())
    }
}

/// Single-stop response body.
///
/// This is also the body a core node returns to a public node, so both
/// `stop_name` and `arrivals` tolerate being absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StopEnvelope {
    #[serde(default)]
    pub stop_id: StopId,

    #[serde(default)]
    pub stop_name: String,

    #[serde(default)]
    pub arrivals: Vec<Arrival>,
}

impl StopEnvelope {
    pub fn new(stop_id: StopId, result: StopResult) -> Self {
        Self {
            stop_id,
            stop_name: result.stop_name,
            arrivals: result.arrivals,
        }
    }

    /// Convert back into a [`StopResult`], restoring display order.
    pub fn into_result(self) -> StopResult {
        StopResult::new(self.stop_name, self.arrivals)
    }
}
