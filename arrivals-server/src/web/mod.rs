//! Web layer for the arrivals gateway.
//!
//! Routes requests to the resolution pipeline and renders its results.

mod dto;
mod routes;
mod state;

pub use dto::{ArrivalsQuery, ErrorResponse, HealthResponse};
pub use routes::{AppError, create_router};
pub use state::AppState;
