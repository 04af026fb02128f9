//! Shared-secret access gate for privileged routes.

/// Header carrying the shared secret, on inbound requests and on requests
/// a public node makes to its core.
pub const SECRET_HEADER: &str = "x-api-key";

/// Whether a request presenting `header_value` may proceed.
///
/// With no configured secret every request is allowed: deployments opt out
/// of the gate by leaving `API_KEY` unset or empty. Otherwise the header
/// must match the secret exactly.
pub fn check(header_value: Option<&str>, configured_secret: Option<&str>) -> bool {
    match configured_secret {
        None => true,
        Some(secret) => header_value == Some(secret),
    }
}

/// Access gate holding the configured secret.
#[derive(Clone, Default)]
pub struct AccessGate {
    secret: Option<String>,
}

impl AccessGate {
    /// Create a gate; an empty secret disables it.
    pub fn new(secret: Option<String>) -> Self {
        let secret = secret.filter(|s| !s.is_empty());
        if secret.is_none() {
            tracing::warn!("no shared secret configured; privileged routes are open");
        }
        Self { secret }
    }

    /// Whether the gate lets everything through.
    pub fn is_disabled(&self) -> bool {
        self.secret.is_none()
    }

    /// Check a request's header value against the configured secret.
    pub fn check(&self, header_value: Option<&str>) -> bool {
        check(header_value, self.secret.as_deref())
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("enabled", &!self.is_disabled())
            .finish()
    }
}
