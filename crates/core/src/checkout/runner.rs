//! Checkout runner implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::gateway::{OrderGateway, OrderResponse, ThreeDsData};
use crate::three_ds::ThreeDsExecutor;

use super::types::{
    CheckoutFlow, CheckoutOutcome, CheckoutReport, CheckoutRequest, CheckoutStage, Credentials,
    RunnerError, Timeline,
};

/// A failed step: where it failed and the diagnostic to report.
type StepFailure = (CheckoutStage, String);

/// Drives one checkout attempt at a time through the gateway and the 3DS
/// execution library.
pub struct CheckoutRunner {
    gateway: Arc<dyn OrderGateway>,
    executor: Arc<dyn ThreeDsExecutor>,
    /// Gates re-submission while a run is underway. Not a lock; the design
    /// assumes one checkout session per client instance.
    in_progress: AtomicBool,
}

impl CheckoutRunner {
    pub fn new(gateway: Arc<dyn OrderGateway>, executor: Arc<dyn ThreeDsExecutor>) -> Self {
        Self {
            gateway,
            executor,
            in_progress: AtomicBool::new(false),
        }
    }

    /// Whether a checkout is currently underway.
    pub fn in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Run one checkout to a terminal outcome.
    ///
    /// Any HTTP or library failure aborts the remaining sequence; the only
    /// repeated call is the single order re-submission after a challenge.
    pub async fn run(
        &self,
        credentials: &Credentials,
        request: &CheckoutRequest,
        flow: CheckoutFlow,
    ) -> Result<CheckoutReport, RunnerError> {
        if self.in_progress.swap(true, Ordering::SeqCst) {
            return Err(RunnerError::InProgress);
        }

        let report = self.run_to_completion(credentials, request, flow).await;
        self.in_progress.store(false, Ordering::SeqCst);
        Ok(report)
    }

    async fn run_to_completion(
        &self,
        credentials: &Credentials,
        request: &CheckoutRequest,
        flow: CheckoutFlow,
    ) -> CheckoutReport {
        let mut timeline = Timeline::new();

        let mut request = request.clone();
        request
            .external_reference_id
            .get_or_insert_with(|| Uuid::new_v4().to_string());

        // Step 1: authenticate.
        if let Err(e) = self
            .gateway
            .authenticate(&credentials.client_id, &credentials.client_secret)
            .await
        {
            timeline.record("Authentication failed", Some(e.diagnostic()));
            return failed(timeline, CheckoutStage::Authentication, e.diagnostic());
        }
        timeline.record("Authenticated with gateway", None);
        info!("Gateway authenticated");

        // Steps 2-3: obtain the 3DS identifier and elapsed validation time.
        let step = match flow {
            CheckoutFlow::Full => self.full_viability(&request, &mut timeline).await,
            CheckoutFlow::DeviceData => self.device_data(&request, &mut timeline).await,
        };
        let (id_three_ds, elapsed) = match step {
            Ok(v) => v,
            Err((stage, diagnostic)) => return failed(timeline, stage, diagnostic),
        };

        // Step 4: assemble and submit the order.
        let order_request = request.order_request(ThreeDsData {
            id_three_ds,
            validation_time_ms: elapsed.as_millis() as u64,
            browser: self.executor.browser_fingerprint(),
        });

        let response = match self.gateway.request_order(&order_request).await {
            Ok(response) => response,
            Err(e) => {
                timeline.record("Order submission failed", Some(e.diagnostic()));
                return failed(timeline, CheckoutStage::OrderSubmission, e.diagnostic());
            }
        };

        let challenge = match response {
            OrderResponse::Completed(order) => {
                timeline.record("Order completed", Some(order.id_order.clone()));
                info!(id_order = %order.id_order, "Order completed without challenge");
                return CheckoutReport {
                    outcome: CheckoutOutcome::Completed(order),
                    timeline,
                };
            }
            OrderResponse::Challenge(challenge) => challenge,
        };

        // Step 5: challenge round trip, at most once.
        timeline.record("Challenge required", Some(challenge.id_three_ds.clone()));
        info!(id_three_ds = %challenge.id_three_ds, "Order requires a challenge");

        if let Err(e) = self.executor.execute_challenge(&challenge).await {
            timeline.record("Challenge failed", Some(e.to_string()));
            return failed(timeline, CheckoutStage::Challenge, e.to_string());
        }
        timeline.record("Challenge completed", None);

        // Re-issue the order with the identical body, exactly once. The
        // result is terminal regardless of shape.
        match self.gateway.request_order(&order_request).await {
            Ok(OrderResponse::Completed(order)) => {
                timeline.record("Order completed", Some(order.id_order.clone()));
                info!(id_order = %order.id_order, "Order completed after challenge");
                CheckoutReport {
                    outcome: CheckoutOutcome::Completed(order),
                    timeline,
                }
            }
            Ok(OrderResponse::Challenge(_)) => {
                timeline.record("Order still requires a challenge", None);
                warn!("Second order submission answered with another challenge");
                failed(
                    timeline,
                    CheckoutStage::Challenge,
                    "Gateway returned a second challenge".to_string(),
                )
            }
            Err(e) => {
                timeline.record("Order submission failed", Some(e.diagnostic()));
                failed(timeline, CheckoutStage::OrderSubmission, e.diagnostic())
            }
        }
    }

    /// Full variant: 3DS viability request plus the optional validation
    /// method step.
    async fn full_viability(
        &self,
        request: &CheckoutRequest,
        timeline: &mut Timeline,
    ) -> Result<(String, Duration), StepFailure> {
        let viability = self
            .gateway
            .request_three_ds(&request.three_ds_request())
            .await
            .map_err(|e| {
                timeline.record("3DS request failed", Some(e.diagnostic()));
                (CheckoutStage::ThreeDsViability, e.diagnostic())
            })?;
        timeline.record("3DS viability obtained", Some(viability.id_three_ds.clone()));
        info!(id_three_ds = %viability.id_three_ds, "3DS viability obtained");

        let elapsed = match &viability.validation_method {
            Some(method) => {
                let elapsed = self
                    .executor
                    .execute_validation_method(&viability.id_three_ds, method)
                    .await
                    .map_err(|e| {
                        timeline.record("Validation method failed", Some(e.to_string()));
                        (CheckoutStage::ValidationMethod, e.to_string())
                    })?;
                timeline.record(
                    "Validation method executed",
                    Some(format!("{} ms", elapsed.as_millis())),
                );
                elapsed
            }
            None => {
                timeline.record("Validation method not required", None);
                Duration::ZERO
            }
        };

        Ok((viability.id_three_ds, elapsed))
    }

    /// Simple variant: public key fetch plus device-data execute, no
    /// viability or method steps.
    async fn device_data(
        &self,
        request: &CheckoutRequest,
        timeline: &mut Timeline,
    ) -> Result<(String, Duration), StepFailure> {
        let public_key = self.gateway.get_public_key().await.map_err(|e| {
            timeline.record("Public key fetch failed", Some(e.diagnostic()));
            (CheckoutStage::PublicKey, e.diagnostic())
        })?;
        timeline.record("Public key fetched", None);

        let result = self
            .executor
            .execute_device_data(&public_key.public_key, &request.device_data_request())
            .await
            .map_err(|e| {
                timeline.record("Device data execution failed", Some(e.to_string()));
                (CheckoutStage::DeviceData, e.to_string())
            })?;
        timeline.record("Device data executed", Some(result.id_three_ds.clone()));
        info!(id_three_ds = %result.id_three_ds, "Device data executed");

        Ok((result.id_three_ds, Duration::ZERO))
    }
}

fn failed(timeline: Timeline, stage: CheckoutStage, diagnostic: String) -> CheckoutReport {
    warn!(%stage, %diagnostic, "Checkout failed");
    CheckoutReport {
        outcome: CheckoutOutcome::Failed { stage, diagnostic },
        timeline,
    }
}
