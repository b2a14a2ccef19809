//! Profile orchestration
//!
//! `Profile::setup` resolves every capability in dependency order into the
//! registry it is given. It never exits the process: failures come back as a
//! `SetupError` whose severity tells the caller whether to carry on.

use platform_core::{
    params, AuthOptions, Capability, CapabilityRegistry, ParameterSet, PlatformError, Role,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SetupError, Step};
use crate::factories::{BackendFactory, FactoryContext, FactorySet};

/// Which roles get an event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamPolicy {
    Always,
    Roles(Vec<Role>),
}

impl StreamPolicy {
    pub fn is_active(&self, role: &Role) -> bool {
        match self {
            Self::Always => true,
            Self::Roles(roles) => roles.contains(role),
        }
    }
}

/// A named bundle of backend factories plus the rules for activating them
pub struct Profile {
    pub name: String,
    pub factories: FactorySet,
    pub stream_policy: StreamPolicy,
    /// Roles that get a blob store
    pub blob_roles: Vec<Role>,
    /// Image the runtime uses when a deployment names none
    pub default_image: Option<String>,
}

impl Profile {
    /// Capabilities that must be present after setup for `role`
    pub fn required_capabilities(&self, role: &Role) -> Vec<Capability> {
        let mut required = vec![
            Capability::Auth,
            Capability::Store,
            Capability::Config,
            Capability::Broker,
            Capability::Registry,
            Capability::MetricsReporter,
        ];
        if self.stream_policy.is_active(role) {
            required.push(Capability::EventStream);
        }
        required.push(Capability::EventStore);
        if self.blob_store_active(role) {
            required.push(Capability::BlobStore);
        }
        required.push(Capability::Runtime);
        required.push(Capability::Builder);
        if self.factories.router.is_some() {
            required.push(Capability::Router);
        }
        required
    }

    fn blob_store_active(&self, role: &Role) -> bool {
        self.factories.blob_store.is_some() && self.blob_roles.contains(role)
    }

    /// Resolve all capabilities for `role` into `registry`
    #[instrument(skip_all, fields(profile = %self.name, role = %role))]
    pub async fn setup(
        &self,
        role: &Role,
        params: &ParameterSet,
        registry: &mut CapabilityRegistry,
    ) -> Result<()> {
        info!("Setting up profile");
        let factories = &self.factories;

        let auth = resolve(&*factories.auth, Step::Auth, role, params, registry).await?;
        registry.set_auth(auth);

        // eager: connection failures surface here, not on first use
        let store = resolve(&*factories.store, Step::Store, role, params, registry).await?;
        registry.set_store(store);

        let config = resolve(&*factories.config, Step::Config, role, params, registry).await?;
        registry.set_config(config);

        let broker = resolve(&*factories.broker, Step::Broker, role, params, registry).await?;
        registry.set_broker(broker);

        let discovery =
            resolve(&*factories.registry, Step::Registry, role, params, registry).await?;
        registry.set_registry(discovery);

        apply_auth_defaults(params, registry)?;

        if registry.metrics_reporter().is_some() {
            debug!(step = %Step::Metrics, "Metrics reporter already installed, keeping it");
        } else {
            let reporter = resolve(
                &*factories.metrics_reporter,
                Step::Metrics,
                role,
                params,
                registry,
            )
            .await?;
            registry.set_metrics_reporter(reporter);
        }

        if self.stream_policy.is_active(role) {
            let stream = resolve(
                &*factories.event_stream,
                Step::EventStream,
                role,
                params,
                registry,
            )
            .await?;
            registry.set_event_stream(stream);
        } else {
            debug!(step = %Step::EventStream, "Event stream not used by this role");
        }

        let events = resolve(
            &*factories.event_store,
            Step::EventStore,
            role,
            params,
            registry,
        )
        .await?;
        registry.set_event_store(events);

        match factories.blob_store.as_ref() {
            Some(factory) if self.blob_roles.contains(role) => {
                let blobs =
                    resolve(&**factory, Step::BlobStore, role, params, registry).await?;
                registry.set_blob_store(blobs);
            }
            _ => debug!(step = %Step::BlobStore, "Blob store not used by this role"),
        }

        let runtime = resolve(&*factories.runtime, Step::Runtime, role, params, registry).await?;
        registry.set_runtime(runtime);

        let builder = resolve(&*factories.builder, Step::Builder, role, params, registry).await?;
        registry.set_builder(builder);

        if let Some(factory) = factories.router.as_ref() {
            let router = resolve(&**factory, Step::Router, role, params, registry).await?;
            registry.set_router(router.clone());
            registry.client_mut().init_router(router);
        }

        if let Some(image) = &self.default_image {
            debug!(step = %Step::DefaultImage, image = %image, "Default image set");
            registry.set_default_image(image.clone());
        }

        let missing = registry.missing(&self.required_capabilities(role));
        if !missing.is_empty() {
            let names: Vec<_> = missing.iter().map(Capability::name).collect();
            return Err(SetupError::new(
                Step::Verify,
                PlatformError::MissingCapability(names.join(", ")),
            ));
        }

        info!(resolved = ?registry.resolved(), "Profile setup complete");
        Ok(())
    }
}

async fn resolve<T>(
    factory: &dyn BackendFactory<T>,
    step: Step,
    role: &Role,
    params: &ParameterSet,
    registry: &CapabilityRegistry,
) -> Result<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    let started = Instant::now();
    let ctx = FactoryContext::new(role, params, registry);

    match factory.build(&ctx).await {
        Ok(backend) => {
            info!(
                step = %step,
                backend = factory.backend(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Capability resolved"
            );
            Ok(backend)
        }
        Err(e) => {
            let err = SetupError::new(step, e);
            warn!(
                step = %step,
                backend = factory.backend(),
                fatal = err.is_fatal(),
                error = %err.source,
                "Capability failed"
            );
            Err(err)
        }
    }
}

/// Install process-wide auth defaults and the shared config secret key
fn apply_auth_defaults(params: &ParameterSet, registry: &CapabilityRegistry) -> Result<()> {
    let owned = |name| params.get(name).map(str::to_string);
    let fail = |e| SetupError::new(Step::AuthDefaults, e);

    let options = AuthOptions {
        public_key: owned(params::AUTH_PUBLIC_KEY),
        private_key: owned(params::AUTH_PRIVATE_KEY),
        issuer: owned(params::AUTH_ISSUER),
    };
    registry.require_auth().map_err(fail)?.init(options).map_err(fail)?;

    registry
        .require_config()
        .map_err(fail)?
        .set_secret_key(owned(params::CONFIG_SECRET_KEY));

    debug!(step = %Step::AuthDefaults, "Auth defaults applied");
    Ok(())
}
