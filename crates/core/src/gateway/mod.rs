//! Payment gateway API access.
//!
//! This module provides an `OrderGateway` trait covering the four endpoints
//! the checkout flow needs (token exchange, public key, 3DS viability, order
//! creation) and an HTTP implementation backed by `reqwest`.

mod http;
mod types;

pub use http::HttpOrderGateway;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status.
    #[error("Gateway returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Failed to parse a 2xx response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A protected endpoint was called before `authenticate` succeeded.
    #[error("Gateway call requires prior authentication")]
    NotAuthenticated,
}

impl GatewayError {
    /// Human-readable diagnostic for the timeline. For API errors this is
    /// the server's error payload verbatim.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Api { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Authenticated access to the gateway's order and 3DS endpoints.
///
/// `request_three_ds` and `request_order` require a prior successful
/// `authenticate` call on the same instance and fail fast with
/// [`GatewayError::NotAuthenticated`] otherwise, before issuing any request.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Exchange client credentials for a bearer token. On success all
    /// subsequent calls on this instance carry the token.
    async fn authenticate(&self, client_id: &str, client_secret: &str)
        -> Result<(), GatewayError>;

    /// Fetch the per-merchant public key used to initialize the 3DS
    /// execution library.
    async fn get_public_key(&self) -> Result<PublicKey, GatewayError>;

    /// Submit the transaction descriptor and learn whether a validation
    /// method step is required.
    async fn request_three_ds(
        &self,
        request: &ThreeDsRequest,
    ) -> Result<ThreeDsResponse, GatewayError>;

    /// Submit the order. The response is either a terminal success record
    /// or a challenge descriptor requiring a second round trip.
    async fn request_order(&self, request: &OrderRequest) -> Result<OrderResponse, GatewayError>;
}
