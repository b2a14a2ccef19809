//! Platform Service
//!
//! Process entry point: `platform-service service <role>`.
//! Reads `MICRO_*` parameters, runs the selected profile and keeps the
//! resolved capabilities alive until shutdown.

use platform_core::ParameterSet;
use platform_profile::ProfileRegistry;
use tracing::{error, info};

mod bootstrap;
mod error;
mod runtime;

use error::ServiceError;

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    let telemetry = platform_telemetry::init()?;
    info!(service = %telemetry.service_name, "Starting platform service");

    let params = ParameterSet::from_env();
    let profiles = ProfileRegistry::with_defaults();

    let registry = match bootstrap::bootstrap(&params, &profiles).await {
        Ok(registry) => registry,
        Err(ServiceError::Setup(e)) if e.is_fatal() => {
            error!(
                step = %e.step,
                code = e.error_code(),
                error = %e.source,
                "Fatal error during setup, exiting"
            );
            std::process::exit(1);
        }
        Err(e) => {
            error!(error = %e, "Setup failed");
            return Err(e);
        }
    };

    runtime::run(registry).await;
    Ok(())
}
