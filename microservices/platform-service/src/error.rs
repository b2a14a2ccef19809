use platform_core::PlatformError;
use platform_profile::SetupError;
use platform_telemetry::TelemetryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Setup(#[from] SetupError),
}
