//! Capability registry
//!
//! An explicitly constructed context object holding the single active backend
//! for each capability. It is populated once by a profile's setup (which takes
//! it by `&mut`, so there is exactly one writer), then shared read-only as
//! `Arc<CapabilityRegistry>` for the lifetime of the process.

use std::fmt;
use std::sync::Arc;

use crate::capability::*;
use crate::error::{PlatformError, Result};

macro_rules! capability_slots {
    ($( $field:ident, $set:ident, $require:ident: $cap:ident => $trait:ident; )*) => {
        /// Process-wide table of active backends, one slot per capability
        #[derive(Default)]
        pub struct CapabilityRegistry {
            $( $field: Option<Arc<dyn $trait>>, )*
            client: NetworkClient,
            default_image: Option<String>,
        }

        impl CapabilityRegistry {
            $(
                /// Current holder, `None` while unset
                pub fn $field(&self) -> Option<Arc<dyn $trait>> {
                    self.$field.clone()
                }

                /// Replace the current holder (last write wins)
                pub fn $set(&mut self, backend: Arc<dyn $trait>) {
                    self.$field = Some(backend);
                }

                pub fn $require(&self) -> Result<Arc<dyn $trait>> {
                    self.$field
                        .clone()
                        .ok_or_else(|| PlatformError::MissingCapability(Capability::$cap.to_string()))
                }
            )*

            pub fn is_set(&self, capability: Capability) -> bool {
                match capability {
                    $( Capability::$cap => self.$field.is_some(), )*
                }
            }
        }
    };
}

capability_slots! {
    auth, set_auth, require_auth: Auth => Authenticator;
    store, set_store, require_store: Store => Store;
    config, set_config, require_config: Config => ConfigStore;
    broker, set_broker, require_broker: Broker => Broker;
    registry, set_registry, require_registry: Registry => Registry;
    metrics_reporter, set_metrics_reporter, require_metrics_reporter: MetricsReporter => MetricsReporter;
    event_stream, set_event_stream, require_event_stream: EventStream => EventStream;
    event_store, set_event_store, require_event_store: EventStore => EventStore;
    blob_store, set_blob_store, require_blob_store: BlobStore => BlobStore;
    runtime, set_runtime, require_runtime: Runtime => Runtime;
    builder, set_builder, require_builder: Builder => Builder;
    router, set_router, require_router: Router => Router;
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capabilities currently holding a backend, in bootstrap order
    pub fn resolved(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.is_set(*c))
            .collect()
    }

    pub fn missing(&self, required: &[Capability]) -> Vec<Capability> {
        required
            .iter()
            .copied()
            .filter(|c| !self.is_set(*c))
            .collect()
    }

    /// Shared network client used for service-to-service calls
    pub fn client(&self) -> &NetworkClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut NetworkClient {
        &mut self.client
    }

    /// Container image the runtime uses when a deployment names none
    pub fn default_image(&self) -> Option<&str> {
        self.default_image.as_deref()
    }

    pub fn set_default_image(&mut self, image: impl Into<String>) {
        self.default_image = Some(image.into());
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("resolved", &self.resolved())
            .field("router_bound", &self.client.router().is_some())
            .field("default_image", &self.default_image)
            .finish()
    }
}

/// Client side of service-to-service calls
#[derive(Default, Clone)]
pub struct NetworkClient {
    router: Option<Arc<dyn Router>>,
}

impl NetworkClient {
    pub fn init_router(&mut self, router: Arc<dyn Router>) {
        self.router = Some(router);
    }

    pub fn router(&self) -> Option<Arc<dyn Router>> {
        self.router.clone()
    }

    /// Routes for a service; without a router the service name is dialled directly
    pub async fn resolve(&self, service: &str) -> Result<Vec<Route>> {
        match &self.router {
            Some(router) => router.lookup(service).await,
            None => Ok(vec![Route {
                service: service.to_string(),
                address: service.to_string(),
            }]),
        }
    }
}
