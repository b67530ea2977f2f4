//! Wire types for the gateway's order and 3DS endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::three_ds::BrowserFingerprint;

/// Payment instrument type.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    #[default]
    CreditCard,
    DebitCard,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
        }
    }
}

/// Customer identification, shared by the 3DS and order bodies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub document: String,
    pub ip: String,
}

/// `POST /api/order/3ds` request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreeDsRequest {
    pub currency: String,
    pub amount: u64,
    pub product_description: String,
    pub customer: Customer,
    pub card: ThreeDsCard,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreeDsCard {
    #[serde(rename = "type")]
    pub card_type: PaymentType,
    pub installments: u32,
    pub number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub security_code: String,
    pub name: String,
    pub document: String,
    pub soft_description: String,
}

/// `POST /api/order/3ds` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreeDsResponse {
    pub id_three_ds: String,
    /// Present when the issuer requires a device-validation step before the
    /// order can be submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_method: Option<ValidationMethod>,
}

/// Issuer device-validation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationMethod {
    pub url: String,
    pub token: String,
}

/// `POST /api/order/3ds/public-key` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicKey {
    pub public_key: String,
}

/// `POST /api/order` request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_reference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub currency: String,
    pub amount: u64,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub customer: Customer,
    pub card: OrderCard,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderCard {
    pub installments: u32,
    pub number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub security_code: String,
    pub name: String,
    pub document: String,
    pub soft_description: String,
    pub capture: bool,
    /// Literal `"3ds"` key on the wire.
    #[serde(rename = "3ds")]
    pub three_ds: ThreeDsData,
}

/// 3DS authentication data nested inside the order card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreeDsData {
    pub id_three_ds: String,
    /// Elapsed validation-method time in milliseconds; 0 when the issuer
    /// required no method step.
    pub validation_time_ms: u64,
    pub browser: BrowserFingerprint,
}

/// `POST /api/order` response.
///
/// The gateway discriminates by field presence (a challenge descriptor has
/// `challenge_url`, a success record has `id_order`); the enum tag is set
/// once at deserialization time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OrderResponse {
    Challenge(OrderChallenge),
    Completed(OrderSuccess),
}

impl OrderResponse {
    pub fn is_challenge(&self) -> bool {
        matches!(self, Self::Challenge(_))
    }
}

/// Challenge descriptor requiring an interactive second round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderChallenge {
    pub challenge_url: String,
    pub credential_request: String,
    pub id_three_ds: String,
}

/// Terminal order record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSuccess {
    pub id_order: String,
    pub id_merchant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_three_ds: Option<String>,
    pub status: String,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_reference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub customer: Customer,
    pub currency: String,
    pub amount: u64,
    pub amount_captured: u64,
    pub amount_refund: u64,
    pub amount_installment: u64,
    pub installment_number: u32,
    pub amount_interchange: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcc_code: Option<String>,
    pub nsu_tef: String,
    pub nsu_acquirer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsu_cancellation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<DateTime<Utc>>,
}

/// Masked card echo in the success record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardSummary {
    pub brand: String,
    pub first_digits: String,
    pub last_digits: String,
    pub exp_month: String,
    pub exp_year: String,
    pub holder_name: String,
    pub holder_document: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_response_challenge_shape() {
        let raw = json!({
            "challenge_url": "https://acs.example/challenge",
            "credential_request": "eyJjcmVx",
            "id_three_ds": "3ds-1"
        });

        let response: OrderResponse = serde_json::from_value(raw).unwrap();
        assert!(response.is_challenge());
        match response {
            OrderResponse::Challenge(ch) => {
                assert_eq!(ch.challenge_url, "https://acs.example/challenge");
                assert_eq!(ch.id_three_ds, "3ds-1");
            }
            OrderResponse::Completed(_) => panic!("expected challenge variant"),
        }
    }

    #[test]
    fn test_order_response_success_shape() {
        let raw = json!({
            "id_order": "ord-1",
            "id_merchant": "mer-1",
            "status": "completed",
            "type": "credit_card",
            "customer": {"name": "Jane Doe", "document": "52998224725", "ip": "200.10.20.30"},
            "currency": "BRL",
            "amount": 100,
            "amount_captured": 100,
            "amount_refund": 0,
            "amount_installment": 100,
            "installment_number": 1,
            "amount_interchange": 2,
            "nsu_tef": "123",
            "nsu_acquirer": "456",
            "card": {
                "brand": "visa",
                "first_digits": "400000",
                "last_digits": "2701",
                "exp_month": "01",
                "exp_year": "2034",
                "holder_name": "JANE DOE",
                "holder_document": "52998224725"
            },
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:01Z",
            "completed_at": "2024-05-01T12:00:01Z"
        });

        let response: OrderResponse = serde_json::from_value(raw).unwrap();
        match response {
            OrderResponse::Completed(order) => {
                assert_eq!(order.id_order, "ord-1");
                assert_eq!(order.payment_type, PaymentType::CreditCard);
                assert_eq!(order.card.unwrap().last_digits, "2701");
                assert!(order.canceled_at.is_none());
            }
            OrderResponse::Challenge(_) => panic!("expected success variant"),
        }
    }

    #[test]
    fn test_order_request_uses_literal_3ds_key() {
        let request = OrderRequest {
            external_reference_id: None,
            description: None,
            currency: "BRL".to_string(),
            amount: 100,
            payment_type: PaymentType::CreditCard,
            customer: Customer {
                name: "Jane Doe".to_string(),
                document: "52998224725".to_string(),
                ip: "200.10.20.30".to_string(),
            },
            card: OrderCard {
                installments: 1,
                number: "4000000000002701".to_string(),
                exp_month: "01".to_string(),
                exp_year: "2034".to_string(),
                security_code: "123".to_string(),
                name: "JANE DOE".to_string(),
                document: "52998224725".to_string(),
                soft_description: "CheckoutDemo".to_string(),
                capture: true,
                three_ds: ThreeDsData {
                    id_three_ds: "3ds-1".to_string(),
                    validation_time_ms: 0,
                    browser: BrowserFingerprint::default(),
                },
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "credit_card");
        assert_eq!(value["card"]["3ds"]["id_three_ds"], "3ds-1");
        assert_eq!(value["card"]["3ds"]["validation_time_ms"], 0);
        assert!(value["card"]["3ds"]["browser"]["user_agent"].is_string());
        assert!(value.get("external_reference_id").is_none());
    }

    #[test]
    fn test_three_ds_response_without_validation_method() {
        let response: ThreeDsResponse =
            serde_json::from_value(json!({"id_three_ds": "3ds-2"})).unwrap();
        assert!(response.validation_method.is_none());
    }
}
