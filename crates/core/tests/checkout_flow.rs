//! Checkout orchestration integration tests.
//!
//! These drive the runner against mock collaborators through every branch
//! of the sequence: frictionless, validation method, challenge, the
//! device-data variant, and each failure stage.

use std::sync::Arc;
use std::time::Duration;

use checkout_core::testing::{fixtures, MockOrderGateway, MockThreeDsExecutor};
use checkout_core::{
    CheckoutFlow, CheckoutOutcome, CheckoutReport, CheckoutRunner, CheckoutStage, Credentials,
    OrderGateway, OrderResponse, RunnerError, ThreeDsExecutor,
};

struct TestHarness {
    gateway: Arc<MockOrderGateway>,
    executor: Arc<MockThreeDsExecutor>,
    runner: CheckoutRunner,
}

impl TestHarness {
    fn new() -> Self {
        let gateway = Arc::new(MockOrderGateway::new());
        let executor = Arc::new(MockThreeDsExecutor::new());
        let runner = CheckoutRunner::new(
            Arc::clone(&gateway) as Arc<dyn OrderGateway>,
            Arc::clone(&executor) as Arc<dyn ThreeDsExecutor>,
        );

        Self {
            gateway,
            executor,
            runner,
        }
    }

    async fn run(&self, flow: CheckoutFlow) -> CheckoutReport {
        self.runner
            .run(&credentials(), &fixtures::checkout_request(), flow)
            .await
            .expect("runner should not be in progress")
    }
}

fn credentials() -> Credentials {
    Credentials {
        client_id: "client-1".to_string(),
        client_secret: "secret-1".to_string(),
    }
}

fn assert_failed_at(report: &CheckoutReport, expected: CheckoutStage) {
    match &report.outcome {
        CheckoutOutcome::Failed { stage, .. } => assert_eq!(*stage, expected),
        CheckoutOutcome::Completed(order) => {
            panic!("expected failure at {expected:?}, got completed order {}", order.id_order)
        }
    }
}

#[tokio::test]
async fn frictionless_order_completes_with_four_timeline_entries() {
    let harness = TestHarness::new();
    harness
        .gateway
        .set_three_ds_response(fixtures::three_ds_response("3ds-1"))
        .await;
    harness
        .gateway
        .push_order_response(OrderResponse::Completed(fixtures::order_success("ord-1")))
        .await;

    let report = harness.run(CheckoutFlow::Full).await;

    assert!(report.outcome.is_completed());
    assert_eq!(harness.gateway.order_call_count().await, 1);
    assert_eq!(harness.executor.validation_call_count().await, 0);
    assert_eq!(harness.executor.challenge_call_count().await, 0);

    // No validation method ran, so the order carries elapsed time 0.
    let orders = harness.gateway.order_calls().await;
    assert_eq!(orders[0].card.three_ds.validation_time_ms, 0);
    assert_eq!(orders[0].card.three_ds.id_three_ds, "3ds-1");

    let titles: Vec<&str> = report
        .timeline
        .entries()
        .iter()
        .map(|e| e.title.as_str())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Order completed",
            "Validation method not required",
            "3DS viability obtained",
            "Authenticated with gateway",
        ]
    );
}

#[tokio::test]
async fn challenge_flow_runs_method_challenge_and_two_order_calls() {
    let harness = TestHarness::new();
    harness
        .gateway
        .set_three_ds_response(fixtures::three_ds_response_with_method("3ds-2"))
        .await;
    harness
        .executor
        .set_validation_elapsed(Duration::from_millis(250))
        .await;
    harness
        .gateway
        .push_order_response(OrderResponse::Challenge(fixtures::order_challenge("3ds-2")))
        .await;
    harness
        .gateway
        .push_order_response(OrderResponse::Completed(fixtures::order_success("ord-2")))
        .await;

    let report = harness.run(CheckoutFlow::Full).await;

    assert!(report.outcome.is_completed());
    assert_eq!(harness.executor.validation_call_count().await, 1);
    assert_eq!(harness.executor.challenge_call_count().await, 1);
    assert_eq!(harness.gateway.order_call_count().await, 2);

    // The re-submission after the challenge uses a byte-identical body.
    let orders = harness.gateway.order_calls().await;
    assert_eq!(orders[0], orders[1]);
    assert_eq!(orders[0].card.three_ds.validation_time_ms, 250);
}

#[tokio::test]
async fn authentication_failure_is_terminal() {
    let harness = TestHarness::new();
    harness
        .gateway
        .set_auth_failure(401, "{\"error\":\"invalid_client\"}")
        .await;

    let report = harness.run(CheckoutFlow::Full).await;

    assert_failed_at(&report, CheckoutStage::Authentication);
    match &report.outcome {
        CheckoutOutcome::Failed { diagnostic, .. } => {
            assert!(diagnostic.contains("invalid_client"));
        }
        _ => unreachable!(),
    }

    // Nothing beyond the token exchange was attempted, and the client is
    // still unauthenticated.
    assert!(!harness.gateway.is_authenticated().await);
    assert_eq!(harness.gateway.three_ds_calls().await.len(), 0);
    assert_eq!(harness.gateway.order_call_count().await, 0);
}

#[tokio::test]
async fn three_ds_failure_aborts_before_order() {
    let harness = TestHarness::new();
    harness
        .gateway
        .set_three_ds_failure(422, "{\"error\":\"card_not_enrolled\"}")
        .await;

    let report = harness.run(CheckoutFlow::Full).await;

    assert_failed_at(&report, CheckoutStage::ThreeDsViability);
    assert_eq!(harness.gateway.order_call_count().await, 0);
    assert_eq!(harness.executor.validation_call_count().await, 0);
}

#[tokio::test]
async fn validation_method_failure_aborts_before_order() {
    let harness = TestHarness::new();
    harness
        .gateway
        .set_three_ds_response(fixtures::three_ds_response_with_method("3ds-3"))
        .await;
    harness.executor.set_validation_error("method timed out").await;

    let report = harness.run(CheckoutFlow::Full).await;

    assert_failed_at(&report, CheckoutStage::ValidationMethod);
    assert_eq!(harness.gateway.order_call_count().await, 0);
}

#[tokio::test]
async fn order_failure_on_first_pass_is_terminal() {
    let harness = TestHarness::new();
    harness
        .gateway
        .set_three_ds_response(fixtures::three_ds_response("3ds-4"))
        .await;
    harness
        .gateway
        .push_order_failure(402, "{\"error\":\"insufficient_funds\"}")
        .await;

    let report = harness.run(CheckoutFlow::Full).await;

    assert_failed_at(&report, CheckoutStage::OrderSubmission);
    assert_eq!(harness.gateway.order_call_count().await, 1);
    assert_eq!(harness.executor.challenge_call_count().await, 0);
}

#[tokio::test]
async fn aborted_challenge_skips_resubmission() {
    let harness = TestHarness::new();
    harness
        .gateway
        .set_three_ds_response(fixtures::three_ds_response("3ds-5"))
        .await;
    harness
        .gateway
        .push_order_response(OrderResponse::Challenge(fixtures::order_challenge("3ds-5")))
        .await;
    harness.executor.set_challenge_error("cardholder closed the window").await;

    let report = harness.run(CheckoutFlow::Full).await;

    assert_failed_at(&report, CheckoutStage::Challenge);
    assert_eq!(harness.gateway.order_call_count().await, 1);
    assert_eq!(harness.executor.challenge_call_count().await, 1);
}

#[tokio::test]
async fn second_challenge_response_is_not_retried() {
    let harness = TestHarness::new();
    harness
        .gateway
        .set_three_ds_response(fixtures::three_ds_response("3ds-6"))
        .await;
    harness
        .gateway
        .push_order_response(OrderResponse::Challenge(fixtures::order_challenge("3ds-6")))
        .await;
    harness
        .gateway
        .push_order_response(OrderResponse::Challenge(fixtures::order_challenge("3ds-6")))
        .await;

    let report = harness.run(CheckoutFlow::Full).await;

    assert_failed_at(&report, CheckoutStage::Challenge);
    // Exactly two order calls and one challenge execution, never a third.
    assert_eq!(harness.gateway.order_call_count().await, 2);
    assert_eq!(harness.executor.challenge_call_count().await, 1);
}

#[tokio::test]
async fn order_failure_after_challenge_is_terminal() {
    let harness = TestHarness::new();
    harness
        .gateway
        .set_three_ds_response(fixtures::three_ds_response("3ds-7"))
        .await;
    harness
        .gateway
        .push_order_response(OrderResponse::Challenge(fixtures::order_challenge("3ds-7")))
        .await;
    harness
        .gateway
        .push_order_failure(402, "{\"error\":\"authentication_failed\"}")
        .await;

    let report = harness.run(CheckoutFlow::Full).await;

    assert_failed_at(&report, CheckoutStage::OrderSubmission);
    assert_eq!(harness.gateway.order_call_count().await, 2);
}

#[tokio::test]
async fn device_data_flow_skips_viability_and_method() {
    let harness = TestHarness::new();
    harness.executor.set_device_data_result("3ds-dd").await;
    harness
        .gateway
        .push_order_response(OrderResponse::Completed(fixtures::order_success("ord-3")))
        .await;

    let report = harness.run(CheckoutFlow::DeviceData).await;

    assert!(report.outcome.is_completed());
    assert_eq!(harness.gateway.public_key_call_count().await, 1);
    assert_eq!(harness.gateway.three_ds_calls().await.len(), 0);
    assert_eq!(harness.executor.device_data_call_count().await, 1);
    assert_eq!(harness.executor.validation_call_count().await, 0);

    let orders = harness.gateway.order_calls().await;
    assert_eq!(orders[0].card.three_ds.id_three_ds, "3ds-dd");
    assert_eq!(orders[0].card.three_ds.validation_time_ms, 0);
}

#[tokio::test]
async fn device_data_execution_failure_is_terminal() {
    let harness = TestHarness::new();
    // No scripted device-data result: the executor reports a failure.

    let report = harness.run(CheckoutFlow::DeviceData).await;

    assert_failed_at(&report, CheckoutStage::DeviceData);
    assert_eq!(harness.gateway.order_call_count().await, 0);
}

#[tokio::test]
async fn missing_reference_id_is_generated() {
    let harness = TestHarness::new();
    harness
        .gateway
        .set_three_ds_response(fixtures::three_ds_response("3ds-8"))
        .await;
    harness
        .gateway
        .push_order_response(OrderResponse::Completed(fixtures::order_success("ord-4")))
        .await;

    let mut request = fixtures::checkout_request();
    request.external_reference_id = None;

    harness
        .runner
        .run(&credentials(), &request, CheckoutFlow::Full)
        .await
        .unwrap();

    let orders = harness.gateway.order_calls().await;
    let reference = orders[0].external_reference_id.as_deref().unwrap();
    assert!(!reference.is_empty());
}

#[tokio::test]
async fn runner_is_reusable_after_a_terminal_outcome() {
    let harness = TestHarness::new();
    harness
        .gateway
        .set_auth_failure(401, "{\"error\":\"invalid_client\"}")
        .await;

    let report = harness.run(CheckoutFlow::Full).await;
    assert_failed_at(&report, CheckoutStage::Authentication);
    assert!(!harness.runner.in_progress());

    // The gate was released; a second attempt proceeds.
    harness
        .gateway
        .set_three_ds_response(fixtures::three_ds_response("3ds-9"))
        .await;
    harness
        .gateway
        .push_order_response(OrderResponse::Completed(fixtures::order_success("ord-5")))
        .await;

    let report = harness.run(CheckoutFlow::Full).await;
    assert!(report.outcome.is_completed());
}

#[tokio::test]
async fn in_progress_error_is_distinct_from_failed_outcomes() {
    // RunnerError only covers the re-submission gate; checkout failures are
    // reported through the outcome, never as a runner error.
    let err = RunnerError::InProgress;
    assert!(err.to_string().contains("in progress"));
}

#[tokio::test]
async fn concurrent_run_is_rejected_while_a_checkout_is_parked() {
    let gateway = Arc::new(MockOrderGateway::new());
    let executor = Arc::new(MockThreeDsExecutor::new());
    let runner = Arc::new(CheckoutRunner::new(
        Arc::clone(&gateway) as Arc<dyn OrderGateway>,
        Arc::clone(&executor) as Arc<dyn ThreeDsExecutor>,
    ));

    gateway
        .set_three_ds_response(fixtures::three_ds_response("3ds-gate"))
        .await;
    gateway
        .push_order_response(OrderResponse::Challenge(fixtures::order_challenge(
            "3ds-gate",
        )))
        .await;
    gateway
        .push_order_response(OrderResponse::Completed(fixtures::order_success("ord-6")))
        .await;
    // Park the first run inside the challenge, as a cardholder who has not
    // confirmed yet would.
    executor.set_challenge_delay(Duration::from_millis(500)).await;

    let first = tokio::spawn({
        let runner = Arc::clone(&runner);
        async move {
            runner
                .run(&credentials(), &fixtures::checkout_request(), CheckoutFlow::Full)
                .await
        }
    });

    // Wait until the first run is demonstrably inside the challenge.
    for _ in 0..100 {
        if executor.challenge_call_count().await == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(executor.challenge_call_count().await, 1);
    assert!(runner.in_progress());

    let second = runner
        .run(&credentials(), &fixtures::checkout_request(), CheckoutFlow::Full)
        .await;
    assert!(matches!(second, Err(RunnerError::InProgress)));

    // The rejected attempt touched nothing: still one of each call.
    assert_eq!(gateway.three_ds_calls().await.len(), 1);
    assert_eq!(gateway.order_call_count().await, 1);

    let report = first.await.expect("first run panicked").unwrap();
    assert!(report.outcome.is_completed());
    assert!(!runner.in_progress());
}
