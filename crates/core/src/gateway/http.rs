//! HTTP implementation of the gateway client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::GatewayConfig;

use super::{
    GatewayError, OrderGateway, OrderRequest, OrderResponse, PublicKey, ThreeDsRequest,
    ThreeDsResponse,
};

/// Fixed API version header sent on every request.
const API_VERSION: &str = "1";

/// Scopes requested by the client-credentials grant.
const TOKEN_SCOPES: &str = "order.create order.3ds";

/// Bearer token obtained from `/auth/token`.
#[derive(Debug, Clone)]
struct BearerToken {
    token_type: String,
    access_token: String,
}

impl BearerToken {
    fn header_value(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// HTTP gateway client.
///
/// One instance corresponds to one authentication target; construct a new
/// instance per credential pair rather than re-authenticating an existing
/// one, which also scopes the bearer token's lifetime.
pub struct HttpOrderGateway {
    client: Client,
    base_url: String,
    /// Token slot, empty until `authenticate` succeeds.
    session: RwLock<Option<BearerToken>>,
}

impl HttpOrderGateway {
    /// Create a new client for the configured environment.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert("Api-Version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            session: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Current bearer header, failing fast when unauthenticated.
    async fn auth_header(&self) -> Result<String, GatewayError> {
        self.session
            .read()
            .await
            .as_ref()
            .map(BearerToken::header_value)
            .ok_or(GatewayError::NotAuthenticated)
    }

    /// Fold non-2xx responses into the error branch, carrying the server's
    /// payload as the diagnostic.
    async fn check_status(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "Gateway request failed");
        Err(GatewayError::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: Response,
        what: &str,
    ) -> Result<T, GatewayError> {
        response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(format!("Failed to parse {} response: {}", what, e)))
    }
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    scopes: &'static str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
    token_type: String,
}

#[async_trait]
impl OrderGateway for HttpOrderGateway {
    async fn authenticate(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<(), GatewayError> {
        let body = TokenRequest {
            grant_type: "client_credentials",
            client_id,
            client_secret,
            scopes: TOKEN_SCOPES,
        };

        debug!(client_id, "Requesting gateway token");

        let result = async {
            let response = self
                .client
                .post(self.url("/auth/token"))
                .json(&body)
                .send()
                .await?;
            let response = Self::check_status(response).await?;
            Self::parse::<TokenResponse>(response, "token").await
        }
        .await;

        let mut session = self.session.write().await;
        match result {
            Ok(token) => {
                debug!(expires_in = token.expires_in, "Gateway authenticated");
                *session = Some(BearerToken {
                    token_type: token.token_type,
                    access_token: token.access_token,
                });
                Ok(())
            }
            Err(e) => {
                // A failed exchange must leave the client unauthenticated.
                *session = None;
                Err(e)
            }
        }
    }

    async fn get_public_key(&self) -> Result<PublicKey, GatewayError> {
        debug!("Fetching merchant public key");

        // Callable before authentication, but once a token is held every
        // request carries it.
        let mut request = self.client.post(self.url("/api/order/3ds/public-key"));
        if let Some(token) = self.session.read().await.as_ref() {
            request = request.header(AUTHORIZATION, token.header_value());
        }

        let response = request.send().await?;
        let response = Self::check_status(response).await?;
        Self::parse(response, "public key").await
    }

    async fn request_three_ds(
        &self,
        request: &ThreeDsRequest,
    ) -> Result<ThreeDsResponse, GatewayError> {
        let auth = self.auth_header().await?;

        debug!(amount = request.amount, currency = %request.currency, "Requesting 3DS viability");

        let response = self
            .client
            .post(self.url("/api/order/3ds"))
            .header(AUTHORIZATION, auth)
            .json(request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Self::parse(response, "3DS").await
    }

    async fn request_order(&self, request: &OrderRequest) -> Result<OrderResponse, GatewayError> {
        let auth = self.auth_header().await?;

        debug!(
            amount = request.amount,
            id_three_ds = %request.card.three_ds.id_three_ds,
            "Submitting order"
        );

        let response = self
            .client
            .post(self.url("/api/order"))
            .header(AUTHORIZATION, auth)
            .json(request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Self::parse(response, "order").await
    }
}
