//! Application state for the web layer.

use std::sync::Arc;

use crate::config::ResolutionContext;
use crate::domain::ArrivalWindow;
use crate::gate::AccessGate;
use crate::resolver::ArrivalResolver;

/// Shared application state.
///
/// Built once at startup; handlers only read it.
#[derive(Clone)]
pub struct AppState {
    /// Resolver over this node's arrival source
    pub resolver: Arc<ArrivalResolver>,

    /// Gate for the privileged arrivals route
    pub gate: Arc<AccessGate>,

    /// Window used when a request has no valid `minutes`
    pub default_window: ArrivalWindow,
}

impl AppState {
    /// Create a new app state.
    pub fn new(resolver: ArrivalResolver, gate: AccessGate, default_window: ArrivalWindow) -> Self {
        Self {
            resolver: Arc::new(resolver),
            gate: Arc::new(gate),
            default_window,
        }
    }

    /// Build the state a node runs with from its configuration.
    pub fn from_context(context: &ResolutionContext) -> Self {
        Self::new(
            ArrivalResolver::from_context(context),
            AccessGate::new(context.secret.clone()),
            context.default_window,
        )
    }
}
