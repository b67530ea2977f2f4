//! Testing utilities and mock implementations.
//!
//! Mocks for the two external collaborators (the gateway HTTP API and the
//! 3DS execution library), allowing the full orchestration to be exercised
//! without network access or a browser.

mod mock_executor;
mod mock_gateway;

pub use mock_executor::MockThreeDsExecutor;
pub use mock_gateway::MockOrderGateway;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::checkout::CheckoutRequest;
    use crate::gateway::{
        CardSummary, Customer, OrderChallenge, OrderRequest, OrderSuccess, PaymentType,
        ThreeDsData, ThreeDsRequest, ThreeDsResponse, ValidationMethod,
    };
    use crate::three_ds::BrowserFingerprint;

    /// Sandbox test card that triggers a successful challenge flow.
    pub const CHALLENGE_SUCCESS_CARD: &str = "4000000000002503";

    /// Sandbox test card that authenticates frictionless.
    pub const FRICTIONLESS_SUCCESS_CARD: &str = "4000000000002701";

    /// A checkout request with reasonable defaults: 100 cents, BRL, one
    /// installment, the frictionless sandbox card.
    pub fn checkout_request() -> CheckoutRequest {
        CheckoutRequest {
            amount: 100,
            currency: "BRL".to_string(),
            installments: 1,
            payment_type: PaymentType::CreditCard,
            customer: Customer {
                name: "Jane Doe".to_string(),
                document: "52998224725".to_string(),
                ip: "200.10.20.30".to_string(),
            },
            card_number: FRICTIONLESS_SUCCESS_CARD.to_string(),
            card_exp_month: "01".to_string(),
            card_exp_year: "2034".to_string(),
            card_security_code: "123".to_string(),
            card_holder_name: "JANE DOE".to_string(),
            card_holder_document: "52998224725".to_string(),
            soft_description: "CheckoutDemo".to_string(),
            product_description: "CheckoutDemo".to_string(),
            description: None,
            external_reference_id: Some("ref-test-1".to_string()),
            capture: true,
        }
    }

    pub fn three_ds_request() -> ThreeDsRequest {
        checkout_request().three_ds_request()
    }

    /// 3DS viability response without a validation method (frictionless).
    pub fn three_ds_response(id_three_ds: &str) -> ThreeDsResponse {
        ThreeDsResponse {
            id_three_ds: id_three_ds.to_string(),
            validation_method: None,
        }
    }

    /// 3DS viability response requiring a validation method step.
    pub fn three_ds_response_with_method(id_three_ds: &str) -> ThreeDsResponse {
        ThreeDsResponse {
            id_three_ds: id_three_ds.to_string(),
            validation_method: Some(ValidationMethod {
                url: "https://acs.example/method".to_string(),
                token: "method-token".to_string(),
            }),
        }
    }

    pub fn order_request(id_three_ds: &str) -> OrderRequest {
        checkout_request().order_request(ThreeDsData {
            id_three_ds: id_three_ds.to_string(),
            validation_time_ms: 0,
            browser: BrowserFingerprint::default(),
        })
    }

    pub fn order_challenge(id_three_ds: &str) -> OrderChallenge {
        OrderChallenge {
            challenge_url: "https://acs.example/challenge".to_string(),
            credential_request: "eyJjcmVx".to_string(),
            id_three_ds: id_three_ds.to_string(),
        }
    }

    pub fn order_success(id_order: &str) -> OrderSuccess {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        OrderSuccess {
            id_order: id_order.to_string(),
            id_merchant: "mer-1".to_string(),
            id_three_ds: Some("3ds-1".to_string()),
            status: "completed".to_string(),
            payment_type: PaymentType::CreditCard,
            external_reference_id: Some("ref-test-1".to_string()),
            description: None,
            customer: Customer {
                name: "Jane Doe".to_string(),
                document: "52998224725".to_string(),
                ip: "200.10.20.30".to_string(),
            },
            currency: "BRL".to_string(),
            amount: 100,
            amount_captured: 100,
            amount_refund: 0,
            amount_installment: 100,
            installment_number: 1,
            amount_interchange: 2,
            mcc_code: None,
            nsu_tef: "123456".to_string(),
            nsu_acquirer: "654321".to_string(),
            nsu_cancellation: None,
            card: Some(CardSummary {
                brand: "visa".to_string(),
                first_digits: "400000".to_string(),
                last_digits: "2701".to_string(),
                exp_month: "01".to_string(),
                exp_year: "2034".to_string(),
                holder_name: "JANE DOE".to_string(),
                holder_document: "52998224725".to_string(),
            }),
            soft_description: Some("CheckoutDemo".to_string()),
            authorization_code: Some("A12345".to_string()),
            created_at: created,
            updated_at: created,
            completed_at: Some(created),
            canceled_at: None,
        }
    }
}
