//! Domain types for the arrivals gateway.
//!
//! Values here are built fresh for each request and never mutated after
//! construction. Stop ids are normalized on the way in; arrival lists are
//! sorted into display order on construction.

mod arrival;
mod stop_id;
mod window;

pub use arrival::{Arrival, StopEnvelope, StopResult, StopResults};
pub use stop_id::{CANONICAL_PREFIX, StopId};
pub use window::{ArrivalWindow, DEFAULT_WINDOW_MINS};
