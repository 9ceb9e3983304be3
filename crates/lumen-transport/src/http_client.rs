//! reqwest-backed delivery client.

use std::time::Duration;

use lumen_core::errors::TransportError;
use lumen_core::traits::{DeliveryRequest, IDeliveryClient};

use crate::protocol::CONTENT_TYPE;

/// Timeouts for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpDeliveryClientConfig {
    /// Per-request timeout for normal flushes.
    pub timeout: Duration,
    /// Timeout for keep-alive (unload) requests.
    pub keepalive_timeout: Duration,
}

impl Default for HttpDeliveryClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            keepalive_timeout: Duration::from_secs(30),
        }
    }
}

fn net_err(e: reqwest::Error) -> TransportError {
    TransportError::Network {
        reason: e.to_string(),
    }
}

/// POSTs batches with reqwest. One attempt per call; retry lives in
/// [`crate::retry`].
#[derive(Debug, Clone)]
pub struct HttpDeliveryClient {
    client: reqwest::Client,
    config: HttpDeliveryClientConfig,
}

impl HttpDeliveryClient {
    pub fn new(config: HttpDeliveryClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .build()
            .map_err(net_err)?;
        Ok(Self { client, config })
    }
}

impl IDeliveryClient for HttpDeliveryClient {
    fn send(
        &self,
        request: DeliveryRequest,
    ) -> impl std::future::Future<Output = Result<u16, TransportError>> + Send {
        let timeout = if request.keepalive {
            self.config.keepalive_timeout
        } else {
            self.config.timeout
        };
        let pending = self
            .client
            .post(&request.endpoint)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .timeout(timeout)
            .body(request.body)
            .send();
        async move {
            let resp = pending.await.map_err(net_err)?;
            Ok(resp.status().as_u16())
        }
    }
}
