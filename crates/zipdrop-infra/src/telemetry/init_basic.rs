use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Subscriber options resolved from configuration
#[derive(Debug, Clone)]
pub struct TelemetryOptions {
    pub service_name: String,
    pub service_version: String,
    pub environment: String,
    /// Emit one JSON object per event instead of the human-readable format
    pub json: bool,
}

/// Initialize tracing with an `EnvFilter` (RUST_LOG) and a fmt layer
pub fn init_telemetry(options: &TelemetryOptions) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "zipdrop=debug,tower_http=debug".into());

    let json_layer = options
        .json
        .then(|| tracing_subscriber::fmt::layer().json());
    let text_layer = (!options.json).then(|| tracing_subscriber::fmt::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    tracing::info!(
        service = %options.service_name,
        version = %options.service_version,
        environment = %options.environment,
        json = options.json,
        "Tracing initialized"
    );
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
