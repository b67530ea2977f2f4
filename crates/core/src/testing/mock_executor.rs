//! Mock 3DS executor for testing.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::gateway::{OrderChallenge, ValidationMethod};
use crate::three_ds::{
    BrowserFingerprint, DeviceDataRequest, DeviceDataResult, ThreeDsError, ThreeDsExecutor,
};

/// Mock implementation of the `ThreeDsExecutor` trait.
///
/// Records every invocation and returns configurable results, standing in
/// for the browser-side 3DS client library.
pub struct MockThreeDsExecutor {
    fingerprint: std::sync::RwLock<BrowserFingerprint>,
    validation_elapsed: RwLock<Duration>,
    validation_error: RwLock<Option<String>>,
    challenge_error: RwLock<Option<String>>,
    challenge_delay: RwLock<Option<Duration>>,
    device_data_result: RwLock<Option<DeviceDataResult>>,

    validation_calls: RwLock<Vec<(String, ValidationMethod)>>,
    challenge_calls: RwLock<Vec<OrderChallenge>>,
    device_data_calls: RwLock<Vec<DeviceDataRequest>>,
}

impl Default for MockThreeDsExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockThreeDsExecutor {
    pub fn new() -> Self {
        Self {
            fingerprint: std::sync::RwLock::new(BrowserFingerprint::default()),
            validation_elapsed: RwLock::new(Duration::from_millis(250)),
            validation_error: RwLock::new(None),
            challenge_error: RwLock::new(None),
            challenge_delay: RwLock::new(None),
            device_data_result: RwLock::new(None),
            validation_calls: RwLock::new(Vec::new()),
            challenge_calls: RwLock::new(Vec::new()),
            device_data_calls: RwLock::new(Vec::new()),
        }
    }

    pub fn set_fingerprint(&self, fingerprint: BrowserFingerprint) {
        *self.fingerprint.write().expect("fingerprint lock poisoned") = fingerprint;
    }

    pub async fn set_validation_elapsed(&self, elapsed: Duration) {
        *self.validation_elapsed.write().await = elapsed;
    }

    /// Make the next validation-method execution fail.
    pub async fn set_validation_error(&self, message: &str) {
        *self.validation_error.write().await = Some(message.to_string());
    }

    /// Make the next challenge execution fail.
    pub async fn set_challenge_error(&self, message: &str) {
        *self.challenge_error.write().await = Some(message.to_string());
    }

    /// Park every challenge execution for the given duration, simulating a
    /// cardholder who has not completed the challenge yet.
    pub async fn set_challenge_delay(&self, delay: Duration) {
        *self.challenge_delay.write().await = Some(delay);
    }

    pub async fn set_device_data_result(&self, id_three_ds: &str) {
        *self.device_data_result.write().await = Some(DeviceDataResult {
            id_three_ds: id_three_ds.to_string(),
        });
    }

    pub async fn validation_calls(&self) -> Vec<(String, ValidationMethod)> {
        self.validation_calls.read().await.clone()
    }

    pub async fn validation_call_count(&self) -> usize {
        self.validation_calls.read().await.len()
    }

    pub async fn challenge_calls(&self) -> Vec<OrderChallenge> {
        self.challenge_calls.read().await.clone()
    }

    pub async fn challenge_call_count(&self) -> usize {
        self.challenge_calls.read().await.len()
    }

    pub async fn device_data_call_count(&self) -> usize {
        self.device_data_calls.read().await.len()
    }
}

#[async_trait]
impl ThreeDsExecutor for MockThreeDsExecutor {
    async fn execute_device_data(
        &self,
        _public_key: &str,
        request: &DeviceDataRequest,
    ) -> Result<DeviceDataResult, ThreeDsError> {
        self.device_data_calls.write().await.push(request.clone());

        match self.device_data_result.read().await.clone() {
            Some(result) => Ok(result),
            None => Err(ThreeDsError::Execution(
                "mock: no scripted device data result".to_string(),
            )),
        }
    }

    async fn execute_validation_method(
        &self,
        id_three_ds: &str,
        method: &ValidationMethod,
    ) -> Result<Duration, ThreeDsError> {
        self.validation_calls
            .write()
            .await
            .push((id_three_ds.to_string(), method.clone()));

        if let Some(message) = self.validation_error.write().await.take() {
            return Err(ThreeDsError::Execution(message));
        }

        Ok(*self.validation_elapsed.read().await)
    }

    fn browser_fingerprint(&self) -> BrowserFingerprint {
        self.fingerprint
            .read()
            .expect("fingerprint lock poisoned")
            .clone()
    }

    async fn execute_challenge(&self, challenge: &OrderChallenge) -> Result<(), ThreeDsError> {
        self.challenge_calls.write().await.push(challenge.clone());

        let delay = *self.challenge_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.challenge_error.write().await.take() {
            return Err(ThreeDsError::ChallengeAborted(message));
        }

        Ok(())
    }
}
