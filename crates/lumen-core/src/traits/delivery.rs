use std::future::Future;

use crate::errors::TransportError;

/// A single POST of an encoded batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    pub endpoint: String,
    /// JSON body, `{"events":[...]}`.
    pub body: Vec<u8>,
    /// Ask the client to let the request outlive the page (unload path).
    pub keepalive: bool,
}

/// Network boundary to the collector.
///
/// Returns the HTTP status for any response that arrived, `Err` only when no
/// response did (connection refused, timeout, DNS).
pub trait IDeliveryClient: Send + Sync + 'static {
    fn send(
        &self,
        request: DeliveryRequest,
    ) -> impl Future<Output = Result<u16, TransportError>> + Send;
}
