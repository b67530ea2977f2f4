mod headless;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_core::{
    load_config, validate_config, CheckoutOutcome, CheckoutRequest, CheckoutRunner, Credentials,
    HttpOrderGateway, OrderGateway, ThreeDsExecutor, Timeline,
};

use headless::HeadlessExecutor;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Checkout demo v{}", VERSION);

    // Determine config path
    let config_path = std::env::var("CHECKOUT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Environment: {:?}", config.gateway.environment);
    info!("Gateway: {}", config.gateway.base_url());
    info!("Flow: {:?}", config.checkout.flow);

    // One gateway client per authentication target; the bearer token lives
    // and dies with it.
    let gateway: Arc<dyn OrderGateway> =
        Arc::new(HttpOrderGateway::new(&config.gateway).context("Failed to create gateway client")?);

    let executor: Arc<dyn ThreeDsExecutor> = Arc::new(
        HeadlessExecutor::new(&config.browser).context("Failed to create 3DS executor")?,
    );

    let runner = CheckoutRunner::new(gateway, executor);

    let credentials = Credentials {
        client_id: config.gateway.client_id.clone(),
        client_secret: config.gateway.client_secret.clone(),
    };
    let request = CheckoutRequest::from_config(&config.checkout);

    info!(
        "Starting checkout: {} {} in {} installment(s)",
        request.amount, request.currency, request.installments
    );

    let report = runner
        .run(&credentials, &request, config.checkout.flow)
        .await
        .context("Checkout already in progress")?;

    print_timeline(&report.timeline);

    match report.outcome {
        CheckoutOutcome::Completed(order) => {
            info!(
                "Order {} completed with status '{}' ({} {} captured)",
                order.id_order, order.status, order.amount_captured, order.currency
            );
            Ok(())
        }
        CheckoutOutcome::Failed { stage, diagnostic } => {
            bail!("Checkout failed during {}: {}", stage, diagnostic)
        }
    }
}

/// Print the recorded trace, newest entry first, as the demo UI does.
fn print_timeline(timeline: &Timeline) {
    println!();
    println!("Timeline ({} entries):", timeline.len());
    for entry in timeline.entries() {
        match &entry.detail {
            Some(detail) => println!(
                "  [{}] {} - {}",
                entry.at.format("%H:%M:%S%.3f"),
                entry.title,
                detail
            ),
            None => println!("  [{}] {}", entry.at.format("%H:%M:%S%.3f"), entry.title),
        }
    }
    println!();
}
