use family_vault::config::VaultConfig;
use family_vault::services::init_metrics;
use family_vault::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = VaultConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "family-vault",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );

    // Must run after tracing and before any metric is recorded
    init_metrics();

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start family-vault: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
