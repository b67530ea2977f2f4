use serde::{Deserialize, Serialize};

use crate::checkout::CheckoutFlow;
use crate::gateway::PaymentType;
use crate::three_ds::BrowserFingerprint;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Payment gateway connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Which gateway environment to talk to.
    #[serde(default)]
    pub environment: GatewayEnvironment,
    /// Explicit base URL override (takes precedence over `environment`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// OAuth client id for the client-credentials grant.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl GatewayConfig {
    /// Effective base URL, honoring the override.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }
}

/// Gateway environments with fixed endpoints
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GatewayEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl GatewayEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://api.sandbox.parcelamostudo.tech",
            Self::Production => "https://api.parcelamostudo.tech",
        }
    }
}

fn default_timeout() -> u32 {
    30
}

/// One checkout attempt, as submitted by the operator
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutConfig {
    /// Amount in cents.
    pub amount: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_installments")]
    pub installments: u32,
    #[serde(default)]
    pub payment_type: PaymentType,
    /// Which orchestration variant to run (default: full)
    #[serde(default)]
    pub flow: CheckoutFlow,
    pub customer: CustomerConfig,
    pub card: CardConfig,
    #[serde(default = "default_descriptor")]
    pub soft_description: String,
    #[serde(default = "default_descriptor")]
    pub product_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Merchant-side reference; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_reference_id: Option<String>,
    /// Whether to capture the order immediately (default: true)
    #[serde(default = "default_capture")]
    pub capture: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomerConfig {
    pub name: String,
    pub document: String,
    pub ip: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CardConfig {
    pub number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub security_code: String,
    pub holder_name: String,
    pub holder_document: String,
}

fn default_currency() -> String {
    "BRL".to_string()
}

fn default_installments() -> u32 {
    1
}

fn default_descriptor() -> String {
    "CheckoutDemo".to_string()
}

fn default_capture() -> bool {
    true
}

/// Browser fingerprint values reported by the headless executor
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowserConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_color_depth")]
    pub color_depth: u8,
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
    /// Minutes behind UTC, as reported by browsers.
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset: i32,
    #[serde(default)]
    pub java_enabled: bool,
    #[serde(default = "default_true")]
    pub javascript_enabled: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            language: default_language(),
            color_depth: default_color_depth(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            timezone_offset: default_timezone_offset(),
            java_enabled: false,
            javascript_enabled: true,
        }
    }
}

impl BrowserConfig {
    pub fn fingerprint(&self) -> BrowserFingerprint {
        BrowserFingerprint {
            color_depth: self.color_depth,
            language: self.language.clone(),
            screen_width: self.screen_width,
            screen_height: self.screen_height,
            timezone_offset: self.timezone_offset,
            user_agent: self.user_agent.clone(),
            java_enabled: self.java_enabled,
            javascript_enabled: self.javascript_enabled,
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0".to_string()
}

fn default_language() -> String {
    "pt-BR".to_string()
}

fn default_color_depth() -> u8 {
    24
}

fn default_screen_width() -> u32 {
    1920
}

fn default_screen_height() -> u32 {
    1080
}

fn default_timezone_offset() -> i32 {
    180
}

fn default_true() -> bool {
    true
}
