use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CheckoutConfig;
use crate::gateway::{
    Customer, OrderCard, OrderRequest, OrderSuccess, PaymentType, ThreeDsCard, ThreeDsData,
    ThreeDsRequest,
};
use crate::three_ds::{DeviceDataCard, DeviceDataRequest};

/// Which orchestration variant to run.
///
/// `Full` is the canonical viability/method/challenge sequence;
/// `DeviceData` is the degenerate simple variant that only runs the
/// library's device-data encode/execute step before order creation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutFlow {
    #[default]
    Full,
    DeviceData,
}

/// Gateway credentials for one checkout session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// One entry in the orchestration trace.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimelineEntry {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub at: DateTime<Utc>,
}

/// Append-only, reverse-chronological trace of checkout steps.
///
/// Observability only; never consulted for control decisions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step. Newest entries come first.
    pub fn record(&mut self, title: impl Into<String>, detail: Option<String>) {
        self.entries.insert(
            0,
            TimelineEntry {
                title: title.into(),
                detail,
                at: Utc::now(),
            },
        );
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where in the sequence a checkout failed.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    Authentication,
    PublicKey,
    ThreeDsViability,
    ValidationMethod,
    DeviceData,
    OrderSubmission,
    Challenge,
}

impl std::fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Authentication => "authentication",
            Self::PublicKey => "public key",
            Self::ThreeDsViability => "3DS viability",
            Self::ValidationMethod => "validation method",
            Self::DeviceData => "device data",
            Self::OrderSubmission => "order submission",
            Self::Challenge => "challenge",
        };
        f.write_str(name)
    }
}

/// Terminal result of one checkout attempt.
#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    Completed(OrderSuccess),
    Failed {
        stage: CheckoutStage,
        diagnostic: String,
    },
}

impl CheckoutOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Outcome plus the recorded trace.
#[derive(Debug, Clone)]
pub struct CheckoutReport {
    pub outcome: CheckoutOutcome,
    pub timeline: Timeline,
}

/// Errors from the runner itself, as opposed to failed checkouts.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The in-progress gate rejected a re-submission. This is form-level
    /// protection, not mutual exclusion.
    #[error("A checkout is already in progress")]
    InProgress,
}

/// Transaction descriptor for one checkout attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub amount: u64,
    pub currency: String,
    pub installments: u32,
    pub payment_type: PaymentType,
    pub customer: Customer,
    pub card_number: String,
    pub card_exp_month: String,
    pub card_exp_year: String,
    pub card_security_code: String,
    pub card_holder_name: String,
    pub card_holder_document: String,
    pub soft_description: String,
    pub product_description: String,
    pub description: Option<String>,
    pub external_reference_id: Option<String>,
    pub capture: bool,
}

impl CheckoutRequest {
    pub fn from_config(config: &CheckoutConfig) -> Self {
        Self {
            amount: config.amount,
            currency: config.currency.clone(),
            installments: config.installments,
            payment_type: config.payment_type,
            customer: Customer {
                name: config.customer.name.clone(),
                document: config.customer.document.clone(),
                ip: config.customer.ip.clone(),
            },
            card_number: config.card.number.clone(),
            card_exp_month: config.card.exp_month.clone(),
            card_exp_year: config.card.exp_year.clone(),
            card_security_code: config.card.security_code.clone(),
            card_holder_name: config.card.holder_name.clone(),
            card_holder_document: config.card.holder_document.clone(),
            soft_description: config.soft_description.clone(),
            product_description: config.product_description.clone(),
            description: config.description.clone(),
            external_reference_id: config.external_reference_id.clone(),
            capture: config.capture,
        }
    }

    /// Body for `POST /api/order/3ds`.
    pub fn three_ds_request(&self) -> ThreeDsRequest {
        ThreeDsRequest {
            currency: self.currency.clone(),
            amount: self.amount,
            product_description: self.product_description.clone(),
            customer: self.customer.clone(),
            card: ThreeDsCard {
                card_type: self.payment_type,
                installments: self.installments,
                number: self.card_number.clone(),
                exp_month: self.card_exp_month.clone(),
                exp_year: self.card_exp_year.clone(),
                security_code: self.card_security_code.clone(),
                name: self.card_holder_name.clone(),
                document: self.card_holder_document.clone(),
                soft_description: self.soft_description.clone(),
            },
        }
    }

    /// Input for the simple variant's device-data execute call.
    pub fn device_data_request(&self) -> DeviceDataRequest {
        DeviceDataRequest {
            amount: self.amount,
            currency: self.currency.clone(),
            card: DeviceDataCard {
                number: self.card_number.clone(),
                exp_month: self.card_exp_month.clone(),
                exp_year: self.card_exp_year.clone(),
            },
        }
    }

    /// Body for `POST /api/order`, with the 3DS authentication data nested
    /// under the card.
    pub fn order_request(&self, three_ds: ThreeDsData) -> OrderRequest {
        OrderRequest {
            external_reference_id: self.external_reference_id.clone(),
            description: self.description.clone(),
            currency: self.currency.clone(),
            amount: self.amount,
            payment_type: self.payment_type,
            customer: self.customer.clone(),
            card: OrderCard {
                installments: self.installments,
                number: self.card_number.clone(),
                exp_month: self.card_exp_month.clone(),
                exp_year: self.card_exp_year.clone(),
                security_code: self.card_security_code.clone(),
                name: self.card_holder_name.clone(),
                document: self.card_holder_document.clone(),
                soft_description: self.soft_description.clone(),
                capture: self.capture,
                three_ds,
            },
        }
    }
}
