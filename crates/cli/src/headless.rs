//! Headless 3DS executor.
//!
//! Stands in for the browser-side 3DS client library: the validation method
//! is satisfied by posting the method token directly, the challenge is
//! handed off to the operator's browser, and the fingerprint comes from
//! configuration. Device-data encoding needs the real library and is
//! rejected.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use checkout_core::config::BrowserConfig;
use checkout_core::gateway::{OrderChallenge, ValidationMethod};
use checkout_core::three_ds::{
    BrowserFingerprint, DeviceDataRequest, DeviceDataResult, ThreeDsError, ThreeDsExecutor,
};

/// Form field carrying the method token, per the 3DS browser flow.
const METHOD_DATA_FIELD: &str = "threeDSMethodData";

pub struct HeadlessExecutor {
    client: reqwest::Client,
    fingerprint: BrowserFingerprint,
}

impl HeadlessExecutor {
    pub fn new(browser: &BrowserConfig) -> Result<Self, ThreeDsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(browser.user_agent.clone())
            .build()
            .map_err(|e| ThreeDsError::Execution(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            fingerprint: browser.fingerprint(),
        })
    }
}

#[async_trait]
impl ThreeDsExecutor for HeadlessExecutor {
    async fn execute_device_data(
        &self,
        _public_key: &str,
        _request: &DeviceDataRequest,
    ) -> Result<DeviceDataResult, ThreeDsError> {
        // Device-data encryption lives in the browser library.
        Err(ThreeDsError::Unsupported(
            "device-data execution requires the browser 3DS library; use the full flow".to_string(),
        ))
    }

    async fn execute_validation_method(
        &self,
        id_three_ds: &str,
        method: &ValidationMethod,
    ) -> Result<Duration, ThreeDsError> {
        debug!(id_three_ds, url = %method.url, "Posting validation method token");

        let started = Instant::now();
        let response = self
            .client
            .post(&method.url)
            .form(&[(METHOD_DATA_FIELD, method.token.as_str())])
            .send()
            .await
            .map_err(|e| ThreeDsError::Execution(format!("Validation method failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ThreeDsError::Execution(format!(
                "Validation method returned HTTP {}",
                response.status()
            )));
        }

        Ok(started.elapsed())
    }

    fn browser_fingerprint(&self) -> BrowserFingerprint {
        self.fingerprint.clone()
    }

    async fn execute_challenge(&self, challenge: &OrderChallenge) -> Result<(), ThreeDsError> {
        info!(id_three_ds = %challenge.id_three_ds, "Challenge handed off to the operator");

        println!();
        println!("A cardholder challenge is required. Open this URL in a browser:");
        println!("  {}", challenge.challenge_url);
        println!("  credential request: {}", challenge.credential_request);
        println!("Press Enter once the challenge is completed...");

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| ThreeDsError::ChallengeAborted(e.to_string()))?;

        if read == 0 {
            return Err(ThreeDsError::ChallengeAborted(
                "stdin closed before the challenge was confirmed".to_string(),
            ));
        }

        Ok(())
    }
}
