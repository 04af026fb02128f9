//! Arrivals delegated to a core node.

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::domain::{ArrivalWindow, StopId, StopResult};
use crate::upstream::{UpstreamClient, UpstreamConfig};

use super::{ArrivalSource, SourceError};

/// Forwards each lookup to a core node.
///
/// The HTTP client is built on first use and then shared by every request;
/// concurrent first lookups race on a [`OnceCell`], so exactly one
/// construction wins.
pub struct ProxySource {
    config: UpstreamConfig,
    client: OnceCell<UpstreamClient>,
}

impl ProxySource {
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    /// The shared upstream client, constructing it if needed.
    pub async fn client(&self) -> Result<&UpstreamClient, SourceError> {
        self.client
            .get_or_try_init(|| async {
                tracing::debug!(base_url = %self.config.base_url, "building upstream client");
                UpstreamClient::new(self.config.clone())
            })
            .await
            .map_err(SourceError::Client)
    }
}

#[async_trait]
impl ArrivalSource for ProxySource {
    fn name(&self) -> &'static str {
        "proxy"
    }

    async fn arrivals(
        &self,
        stop: &StopId,
        window: ArrivalWindow,
    ) -> Result<StopResult, SourceError> {
        let client = self.client().await?;
        Ok(client.fetch_arrivals(stop, window).await?)
    }
}
