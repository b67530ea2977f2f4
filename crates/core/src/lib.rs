pub mod checkout;
pub mod config;
pub mod gateway;
pub mod testing;
pub mod three_ds;

pub use checkout::{
    CheckoutFlow, CheckoutOutcome, CheckoutReport, CheckoutRequest, CheckoutRunner, CheckoutStage,
    Credentials, RunnerError, Timeline, TimelineEntry,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, GatewayEnvironment,
};
pub use gateway::{
    GatewayError, HttpOrderGateway, OrderChallenge, OrderGateway, OrderRequest, OrderResponse,
    OrderSuccess, PublicKey, ThreeDsRequest, ThreeDsResponse, ValidationMethod,
};
pub use three_ds::{
    BrowserFingerprint, DeviceDataRequest, DeviceDataResult, ThreeDsError, ThreeDsExecutor,
};
