//! Role and profile selection

use platform_core::{params, CapabilityRegistry, ParameterSet, PlatformError};
use platform_profile::{ProfileRegistry, DEFAULT_PROFILE};
use std::sync::Arc;
use tracing::info;

use crate::error::ServiceError;

/// Run the configured profile for the role given on the command line
pub async fn bootstrap(
    params: &ParameterSet,
    profiles: &ProfileRegistry,
) -> Result<Arc<CapabilityRegistry>, ServiceError> {
    let role = params.role().ok_or_else(|| {
        PlatformError::Config("missing role argument: platform-service service <role>".to_string())
    })?;
    let name = params.get_or(params::PROFILE, DEFAULT_PROFILE);
    let profile = profiles.get(name)?;

    info!(profile = %profile.name, role = %role, "Bootstrapping");

    let mut registry = CapabilityRegistry::new();
    profile.setup(&role, params, &mut registry).await?;

    Ok(Arc::new(registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_core::Capability;

    #[tokio::test]
    async fn test_bootstrap_local_store() {
        let params = ParameterSet::new().with_args(["service", "store"]);
        let registry = bootstrap(&params, &ProfileRegistry::with_defaults())
            .await
            .unwrap();

        assert!(registry.is_set(Capability::BlobStore));
        assert!(registry.is_set(Capability::EventStore));
    }

    #[tokio::test]
    async fn test_missing_role() {
        let params = ParameterSet::new().with_args(["service"]);
        let result = bootstrap(&params, &ProfileRegistry::with_defaults()).await;
        assert!(matches!(
            result,
            Err(ServiceError::Platform(PlatformError::Config(_)))
        ));
    }

    #[tokio::test]
    async fn test_unknown_profile() {
        let params = ParameterSet::new()
            .with(params::PROFILE, "staging")
            .with_args(["service", "runtime"]);
        let result = bootstrap(&params, &ProfileRegistry::with_defaults()).await;
        assert!(matches!(
            result,
            Err(ServiceError::Platform(PlatformError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_setup_error_surfaces() {
        let params = ParameterSet::new()
            .with(params::METRICS_NAMESPACE, "9lives")
            .with_args(["service", "api"]);
        let result = bootstrap(&params, &ProfileRegistry::with_defaults()).await;
        match result {
            Err(ServiceError::Setup(e)) => assert!(!e.is_fatal()),
            other => panic!("expected setup error, got {:?}", other.map(|_| ())),
        }
    }
}
