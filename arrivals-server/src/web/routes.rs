//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domain::{ArrivalWindow, StopEnvelope, StopId, StopResults};
use crate::format::{FormatError, Rendered, render};
use crate::gate::SECRET_HEADER;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(health))
        .route("/health", get(health))
        .route("/api/v1/arrivals", get(api_arrivals))
        .route("/public/arrivals", get(public_arrivals))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness probe.
async fn index() -> &'static str {
    "app is running"
}

/// Check if request accepts JSON.
fn accepts_json(headers: &HeaderMap) -> bool {
    accept_header(headers).is_some_and(|accept| accept.to_ascii_lowercase().contains("json"))
}

fn accept_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::ACCEPT).and_then(|v| v.to_str().ok())
}

/// Health check endpoint. Always 200.
async fn health(headers: HeaderMap) -> Response {
    if accepts_json(&headers) {
        Json(HealthResponse { status: "ok" }).into_response()
    } else {
        "ok".into_response()
    }
}

/// Arrivals behind the shared secret. See [`arrivals`] for the query shape.
async fn api_arrivals(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let presented = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
    if !state.gate.check(presented) {
        return Err(AppError::Unauthorized);
    }

    arrivals(&state, &headers, query.as_deref()).await
}

/// Arrivals without the shared secret. See [`arrivals`] for the query shape.
async fn public_arrivals(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    arrivals(&state, &headers, query.as_deref()).await
}

/// Resolve the stops named in the query and render the result.
///
/// Repeated `stop` parameters give a mapping keyed by normalized stop id;
/// otherwise a `stopId` gives the single-stop body. With neither, the
/// mapping is empty. Blank `stop` values are skipped and get no entry, so
/// `?stop=&stop=%20` answers `{}`.
async fn arrivals(
    state: &AppState,
    headers: &HeaderMap,
    query: Option<&str>,
) -> Result<Response, AppError> {
    let query = ArrivalsQuery::parse(query);
    let window = ArrivalWindow::parse_or(query.minutes.as_deref(), state.default_window);
    let accept = accept_header(headers);

    let rendered = match (query.stops.is_empty(), query.stop_id.as_deref()) {
        (true, Some(raw)) => {
            let stop = StopId::normalize(raw);
            let result = state.resolver.resolve_stop(&stop, window).await;
            render(&StopEnvelope::new(stop, result), accept)?
        }
        (true, None) => render(&StopResults::new(), accept)?,
        (false, _) => {
            let results = state.resolver.resolve_many(query.stop_ids(), window).await;
            render(&results, accept)?
        }
    };

    Ok(rendered.into_response())
}

impl IntoResponse for Rendered {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Missing or wrong shared secret
    Unauthorized,
    /// The body could not be encoded
    Render(FormatError),
}

impl From<FormatError> for AppError {
    fn from(e: FormatError) -> Self {
        AppError::Render(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            AppError::Render(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        match &self {
            AppError::Unauthorized => tracing::info!("rejected request without valid secret"),
            AppError::Render(_) => tracing::error!(%status, %message, "failed to render response"),
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
