//! Seam to the external 3DS execution library.
//!
//! The cryptographic device fingerprinting, 3DS message formats, and
//! challenge rendering all live in an external client library; this module
//! only defines the surface the checkout runner calls. Implementations are
//! the headless executor in the CLI crate and the mock in
//! [`crate::testing`].

mod types;

pub use types::*;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::gateway::{OrderChallenge, ValidationMethod};

/// Errors reported by a 3DS executor.
#[derive(Debug, Error)]
pub enum ThreeDsError {
    /// The library reported a failure while running a step.
    #[error("3DS execution failed: {0}")]
    Execution(String),

    /// The cardholder did not complete the challenge.
    #[error("Challenge was not completed: {0}")]
    ChallengeAborted(String),

    /// This executor does not support the requested entry point.
    #[error("Unsupported 3DS operation: {0}")]
    Unsupported(String),
}

/// Interface of the external 3DS execution library.
#[async_trait]
pub trait ThreeDsExecutor: Send + Sync {
    /// Device-data encode/execute entry point of the simple integration
    /// variant. Returns the 3DS identifier to attach to the order.
    async fn execute_device_data(
        &self,
        public_key: &str,
        request: &DeviceDataRequest,
    ) -> Result<DeviceDataResult, ThreeDsError>;

    /// Run the issuer's device-validation method and return the elapsed
    /// validation time.
    async fn execute_validation_method(
        &self,
        id_three_ds: &str,
        method: &ValidationMethod,
    ) -> Result<Duration, ThreeDsError>;

    /// Browser/device attributes for the order's risk assessment.
    fn browser_fingerprint(&self) -> BrowserFingerprint;

    /// Perform the interactive challenge; resolves once the cardholder has
    /// completed (or abandoned) it.
    async fn execute_challenge(&self, challenge: &OrderChallenge) -> Result<(), ThreeDsError>;
}
