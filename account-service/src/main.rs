use account_service::{config::AccountConfig, services::init_metrics, Application};
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = AccountConfig::load()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );
    init_metrics();

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        store = ?config.store,
        "Starting account service"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start account service: {}", e);
        e
    })?;

    app.run_until_stopped().await?;

    tracing::info!("Account service stopped");
    Ok(())
}
