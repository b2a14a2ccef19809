//! Platform Telemetry
//!
//! Structured logging setup and the default in-process metrics reporter.

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{PrometheusReporter, DEFAULT_NAMESPACE};
pub use tracing_setup::init_tracing;

/// Initialize tracing from the environment
pub fn init() -> Result<TelemetryConfig, TelemetryError> {
    let config = TelemetryConfig::from_env();
    init_tracing(&config)?;
    Ok(config)
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Tracing initialization failed: {0}")]
    TracingInit(String),

    #[error("Invalid metrics namespace: {0}")]
    InvalidNamespace(String),

    #[error("Metrics encoding failed: {0}")]
    Metrics(String),
}

impl From<TelemetryError> for platform_core::PlatformError {
    fn from(err: TelemetryError) -> Self {
        platform_core::PlatformError::Config(err.to_string())
    }
}
