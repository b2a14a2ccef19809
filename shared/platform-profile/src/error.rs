//! Setup error classification

use platform_core::PlatformError;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SetupError>;

/// Bootstrap steps, in the order a profile runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Auth,
    Store,
    Config,
    Broker,
    Registry,
    AuthDefaults,
    Metrics,
    EventStream,
    EventStore,
    BlobStore,
    Runtime,
    Builder,
    Router,
    DefaultImage,
    Verify,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Store => "store",
            Self::Config => "config",
            Self::Broker => "broker",
            Self::Registry => "registry",
            Self::AuthDefaults => "auth-defaults",
            Self::Metrics => "metrics",
            Self::EventStream => "event-stream",
            Self::EventStore => "event-store",
            Self::BlobStore => "blob-store",
            Self::Runtime => "runtime",
            Self::Builder => "builder",
            Self::Router => "router",
            Self::DefaultImage => "default-image",
            Self::Verify => "verify",
        }
    }

    /// Once the event stream is reached earlier capabilities are already
    /// installed, so failing from there on leaves a half-bootstrapped process.
    pub fn severity(&self) -> Severity {
        if *self < Step::EventStream {
            Severity::Recoverable
        } else {
            Severity::Fatal
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Returned to the caller, which may retry with corrected parameters
    Recoverable,
    /// The process must exit
    Fatal,
}

#[derive(Debug, Error)]
#[error("{step} setup failed: {source}")]
pub struct SetupError {
    pub step: Step,
    pub severity: Severity,
    pub source: PlatformError,
}

impl SetupError {
    /// Classify a failure at `step`. Unparsable connection URLs and broken TLS
    /// material are fatal wherever they surface.
    pub fn new(step: Step, source: PlatformError) -> Self {
        let severity = match source {
            PlatformError::InvalidUrl(_) | PlatformError::Tls(_) => Severity::Fatal,
            _ => step.severity(),
        };
        Self {
            step,
            severity,
            source,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }

    pub fn error_code(&self) -> &'static str {
        self.source.error_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_severity() {
        for step in [Step::Auth, Step::Store, Step::Broker, Step::Metrics] {
            assert_eq!(step.severity(), Severity::Recoverable, "{}", step);
        }
        for step in [Step::EventStream, Step::BlobStore, Step::Builder, Step::Verify] {
            assert_eq!(step.severity(), Severity::Fatal, "{}", step);
        }
    }

    #[test]
    fn test_url_and_tls_errors_always_fatal() {
        let err = SetupError::new(Step::Broker, PlatformError::InvalidUrl("redis://".to_string()));
        assert!(err.is_fatal());

        let err = SetupError::new(Step::Registry, PlatformError::Tls("bad key".to_string()));
        assert!(err.is_fatal());

        let err = SetupError::new(Step::Store, PlatformError::Connection("refused".to_string()));
        assert!(!err.is_fatal());
        assert_eq!(err.error_code(), "CONNECTION_ERROR");
        assert_eq!(err.to_string(), "store setup failed: Connection error: refused");
    }
}
