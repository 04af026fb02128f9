//! Process configuration.
//!
//! Read once at startup from the environment and immutable afterwards.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::ArrivalWindow;

/// Default listening port.
const DEFAULT_PORT: u16 = 8080;

/// Default upstream request timeout.
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Default TTL for cached upstream responses. Zero leaves the cache off.
const DEFAULT_CACHE_TTL_SECS: u64 = 0;

/// Errors that prevent the process from starting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// ROLE is neither `core` nor `public`
    #[error("invalid ROLE {0:?}: expected \"core\" or \"public\"")]
    InvalidRole(String),

    /// A numeric variable could not be parsed
    #[error("invalid {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Deployment role of this node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// Computes arrivals itself.
    #[default]
    Core,
    /// Forwards lookups to a core node.
    Public,
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "core" => Ok(Role::Core),
            "public" => Ok(Role::Public),
            _ => Err(ConfigError::InvalidRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Core => f.write_str("core"),
            Role::Public => f.write_str("public"),
        }
    }
}

/// Everything the resolution pipeline needs to know about its deployment.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolutionContext {
    /// Operating role
    pub role: Role,

    /// Base URL of the core node (used in the public role)
    pub upstream_url: Option<String>,

    /// Shared secret; `None` disables the access gate
    pub secret: Option<String>,

    /// Window used when a request doesn't give a valid one
    pub default_window: ArrivalWindow,

    /// Upper bound on a single upstream request
    pub upstream_timeout: Duration,

    /// How long successful upstream lookups are reused; zero disables
    pub cache_ttl: Duration,
}

impl ResolutionContext {
    /// A core-role context with defaults and no secret.
    pub fn core() -> Self {
        Self {
            role: Role::Core,
            upstream_url: None,
            secret: None,
            default_window: ArrivalWindow::default(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }

    /// A public-role context that forwards to `upstream_url`.
    pub fn public(upstream_url: impl Into<String>) -> Self {
        Self {
            role: Role::Public,
            upstream_url: Some(upstream_url.into()),
            ..Self::core()
        }
    }

    /// Set the shared secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.secret = (!secret.is_empty()).then_some(secret);
        self
    }

    /// Set the upstream timeout.
    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// Set the upstream cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// The upstream URL, if lookups should be delegated.
    ///
    /// `None` in the core role, and in a public role that was started
    /// without an upstream URL.
    pub fn delegate_to(&self) -> Option<&str> {
        match self.role {
            Role::Public => self.upstream_url.as_deref(),
            Role::Core => None,
        }
    }
}

impl fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("role", &self.role)
            .field("upstream_url", &self.upstream_url)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("default_window", &self.default_window)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self::core()
    }
}

/// Full server configuration: the resolution context plus the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub context: ResolutionContext,
    pub port: u16,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Recognised variables: `ROLE`, `CORE_URL`, `API_KEY`, `MINUTES`,
    /// `PORT`, `UPSTREAM_TIMEOUT_SECS`, `CACHE_TTL_SECS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let role = get("ROLE")
            .map(|v| v.parse::<Role>())
            .transpose()?
            .unwrap_or_default();

        let upstream_url = get("CORE_URL").map(|url| url.trim().trim_end_matches('/').to_string());
        if role == Role::Public && upstream_url.is_none() {
            tracing::warn!("ROLE=public but CORE_URL is not set; computing arrivals locally");
        }

        let minutes = get("MINUTES");
        let default_window = ArrivalWindow::parse_or(minutes.as_deref(), ArrivalWindow::default());
        if let Some(raw) = minutes.as_deref() {
            if raw.trim().parse::<u32>().is_err() {
                tracing::warn!(value = raw, "invalid MINUTES, using {default_window}");
            }
        }

        let port = parse_number("PORT", get("PORT"), DEFAULT_PORT)?;

        let timeout_secs = parse_number(
            "UPSTREAM_TIMEOUT_SECS",
            get("UPSTREAM_TIMEOUT_SECS"),
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "UPSTREAM_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }

        let cache_ttl_secs =
            parse_number("CACHE_TTL_SECS", get("CACHE_TTL_SECS"), DEFAULT_CACHE_TTL_SECS)?;

        let context = ResolutionContext {
            role,
            upstream_url,
            secret: get("API_KEY"),
            default_window,
            upstream_timeout: Duration::from_secs(timeout_secs),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        };

        Ok(Self { context, port })
    }
}

fn parse_number<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name,
            value: v,
            reason: "not a non-negative integer",
        }),
        None => Ok(default),
    }
}
