use availability_service::config::AvailabilityConfig;
use availability_service::services::init_metrics;
use availability_service::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AvailabilityConfig::load()?;

    init_tracing(
        "availability-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;

    init_metrics()?;

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
