//! Mock gateway for testing.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::gateway::{
    GatewayError, OrderGateway, OrderRequest, OrderResponse, PublicKey, ThreeDsRequest,
    ThreeDsResponse,
};

/// A scripted HTTP failure: status code plus the server's error payload.
#[derive(Debug, Clone)]
pub struct ScriptedFailure {
    pub status: u16,
    pub body: String,
}

impl ScriptedFailure {
    fn into_error(self) -> GatewayError {
        GatewayError::Api {
            status: self.status,
            body: self.body,
        }
    }
}

/// Mock implementation of the `OrderGateway` trait.
///
/// Enforces the authentication precondition exactly like the HTTP client:
/// protected calls fail fast until a scripted `authenticate` succeeds.
/// Order responses are a FIFO queue so a challenge-then-success round trip
/// can be scripted.
pub struct MockOrderGateway {
    authenticated: RwLock<bool>,
    auth_failure: RwLock<Option<ScriptedFailure>>,
    public_key: RwLock<PublicKey>,
    three_ds_response: RwLock<Option<Result<ThreeDsResponse, ScriptedFailure>>>,
    order_responses: RwLock<VecDeque<Result<OrderResponse, ScriptedFailure>>>,

    auth_calls: RwLock<Vec<(String, String)>>,
    public_key_calls: RwLock<usize>,
    three_ds_calls: RwLock<Vec<ThreeDsRequest>>,
    order_calls: RwLock<Vec<OrderRequest>>,
}

impl Default for MockOrderGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOrderGateway {
    pub fn new() -> Self {
        Self {
            authenticated: RwLock::new(false),
            auth_failure: RwLock::new(None),
            public_key: RwLock::new(PublicKey {
                public_key: "-----BEGIN PUBLIC KEY-----\nmock\n-----END PUBLIC KEY-----"
                    .to_string(),
            }),
            three_ds_response: RwLock::new(None),
            order_responses: RwLock::new(VecDeque::new()),
            auth_calls: RwLock::new(Vec::new()),
            public_key_calls: RwLock::new(0),
            three_ds_calls: RwLock::new(Vec::new()),
            order_calls: RwLock::new(Vec::new()),
        }
    }

    /// Make the next `authenticate` call fail with the given response.
    pub async fn set_auth_failure(&self, status: u16, body: &str) {
        *self.auth_failure.write().await = Some(ScriptedFailure {
            status,
            body: body.to_string(),
        });
    }

    pub async fn set_public_key(&self, public_key: &str) {
        *self.public_key.write().await = PublicKey {
            public_key: public_key.to_string(),
        };
    }

    pub async fn set_three_ds_response(&self, response: ThreeDsResponse) {
        *self.three_ds_response.write().await = Some(Ok(response));
    }

    pub async fn set_three_ds_failure(&self, status: u16, body: &str) {
        *self.three_ds_response.write().await = Some(Err(ScriptedFailure {
            status,
            body: body.to_string(),
        }));
    }

    /// Queue an order response; responses are consumed in FIFO order.
    pub async fn push_order_response(&self, response: OrderResponse) {
        self.order_responses.write().await.push_back(Ok(response));
    }

    pub async fn push_order_failure(&self, status: u16, body: &str) {
        self.order_responses
            .write()
            .await
            .push_back(Err(ScriptedFailure {
                status,
                body: body.to_string(),
            }));
    }

    pub async fn is_authenticated(&self) -> bool {
        *self.authenticated.read().await
    }

    pub async fn auth_calls(&self) -> Vec<(String, String)> {
        self.auth_calls.read().await.clone()
    }

    pub async fn public_key_call_count(&self) -> usize {
        *self.public_key_calls.read().await
    }

    pub async fn three_ds_calls(&self) -> Vec<ThreeDsRequest> {
        self.three_ds_calls.read().await.clone()
    }

    /// Recorded order request bodies, in call order.
    pub async fn order_calls(&self) -> Vec<OrderRequest> {
        self.order_calls.read().await.clone()
    }

    pub async fn order_call_count(&self) -> usize {
        self.order_calls.read().await.len()
    }
}

#[async_trait]
impl OrderGateway for MockOrderGateway {
    async fn authenticate(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<(), GatewayError> {
        self.auth_calls
            .write()
            .await
            .push((client_id.to_string(), client_secret.to_string()));

        if let Some(failure) = self.auth_failure.write().await.take() {
            *self.authenticated.write().await = false;
            return Err(failure.into_error());
        }

        *self.authenticated.write().await = true;
        Ok(())
    }

    async fn get_public_key(&self) -> Result<PublicKey, GatewayError> {
        *self.public_key_calls.write().await += 1;
        Ok(self.public_key.read().await.clone())
    }

    async fn request_three_ds(
        &self,
        request: &ThreeDsRequest,
    ) -> Result<ThreeDsResponse, GatewayError> {
        if !*self.authenticated.read().await {
            return Err(GatewayError::NotAuthenticated);
        }

        self.three_ds_calls.write().await.push(request.clone());

        match self.three_ds_response.read().await.clone() {
            Some(Ok(response)) => Ok(response),
            Some(Err(failure)) => Err(failure.into_error()),
            None => Err(GatewayError::Api {
                status: 500,
                body: "mock: no scripted 3DS response".to_string(),
            }),
        }
    }

    async fn request_order(&self, request: &OrderRequest) -> Result<OrderResponse, GatewayError> {
        if !*self.authenticated.read().await {
            return Err(GatewayError::NotAuthenticated);
        }

        self.order_calls.write().await.push(request.clone());

        match self.order_responses.write().await.pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(failure)) => Err(failure.into_error()),
            None => Err(GatewayError::Api {
                status: 500,
                body: "mock: no scripted order response".to_string(),
            }),
        }
    }
}
