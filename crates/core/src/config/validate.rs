use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Gateway credentials and base URL
/// - Transaction amount and installment range
/// - Card number and expiry format
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Gateway validation
    if config.gateway.client_id.is_empty() {
        return Err(ConfigError::ValidationError(
            "gateway.client_id cannot be empty".to_string(),
        ));
    }
    if config.gateway.client_secret.is_empty() {
        return Err(ConfigError::ValidationError(
            "gateway.client_secret cannot be empty".to_string(),
        ));
    }
    let base_url = config.gateway.base_url();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "gateway base URL must be http(s): {}",
            base_url
        )));
    }
    if config.gateway.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "gateway.timeout_secs cannot be 0".to_string(),
        ));
    }

    // Checkout validation
    if config.checkout.amount == 0 {
        return Err(ConfigError::ValidationError(
            "checkout.amount must be greater than 0".to_string(),
        ));
    }
    if !(1..=12).contains(&config.checkout.installments) {
        return Err(ConfigError::ValidationError(format!(
            "checkout.installments must be between 1 and 12, got {}",
            config.checkout.installments
        )));
    }

    // Card validation
    let card = &config.checkout.card;
    if card.number.is_empty() || !card.number.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::ValidationError(
            "checkout.card.number must be all digits".to_string(),
        ));
    }
    if card.exp_month.len() != 2 || card.exp_month.parse::<u32>().map_or(true, |m| !(1..=12).contains(&m)) {
        return Err(ConfigError::ValidationError(format!(
            "checkout.card.exp_month must be a two-digit month, got {:?}",
            card.exp_month
        )));
    }
    if card.exp_year.len() != 4 || card.exp_year.parse::<u32>().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "checkout.card.exp_year must be a four-digit year, got {:?}",
            card.exp_year
        )));
    }

    Ok(())
}
