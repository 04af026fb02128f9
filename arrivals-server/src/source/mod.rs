//! Where arrivals come from.
//!
//! A node picks one [`ArrivalSource`] at startup: [`LocalSource`] on a
//! core node, [`ProxySource`] on a public node that knows its core. The
//! resolver only ever talks to the trait, so role checks stay here.

mod local;
mod proxy;

use async_trait::async_trait;

use crate::domain::{ArrivalWindow, StopId, StopResult};
use crate::upstream::UpstreamError;

pub use local::{Clock, LocalSource};
pub use proxy::ProxySource;

/// Errors from looking up a single stop.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The id doesn't name a stop this source knows about
    #[error("unknown stop {0}")]
    UnknownStop(StopId),

    /// The core node could not be asked, or answered badly
    #[error("upstream lookup failed: {0}")]
    Upstream(#[from] UpstreamError),

    /// The upstream client could not be constructed
    #[error("upstream client unavailable: {0}")]
    Client(#[source] UpstreamError),
}

/// A capability to look up arrivals for one stop.
#[async_trait]
pub trait ArrivalSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Look up the arrivals at `stop` within `window`.
    async fn arrivals(
        &self,
        stop: &StopId,
        window: ArrivalWindow,
    ) -> Result<StopResult, SourceError>;
}
