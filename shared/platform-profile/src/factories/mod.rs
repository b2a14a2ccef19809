//! Backend factories
//!
//! One factory per backend implementation. A profile is a `FactorySet` plus
//! activation rules; the orchestration in `Profile::setup` never names a
//! concrete backend.

use async_trait::async_trait;
use platform_core::{
    Authenticator, BlobStore, Broker, Builder, CapabilityRegistry, ConfigStore, EventStore,
    EventStream, MetricsReporter, ParameterSet, Registry, Result, Role, Router, Runtime, Store,
};
use std::sync::Arc;

mod auth;
mod blob;
mod broker;
mod builder;
mod config;
mod events;
mod metrics;
mod registry;
mod router;
mod runtime;
mod store;
mod stream;

pub use auth::JwtAuthFactory;
pub use blob::{LocalBlobStoreFactory, S3BlobStoreFactory};
pub use broker::{MemoryBrokerFactory, NatsBrokerFactory, RedisBrokerFactory};
pub use builder::{GolangBuilderFactory, LocalBuilderFactory};
pub use config::StoreConfigFactory;
pub use events::StoreEventsFactory;
pub use metrics::PrometheusReporterFactory;
pub use registry::{EtcdRegistryFactory, MemoryRegistryFactory};
pub use router::DnsRouterFactory;
pub use runtime::{KubernetesRuntimeFactory, LocalRuntimeFactory};
pub use store::{MemoryStoreFactory, PostgresStoreFactory};
pub use stream::{MemoryStreamFactory, NatsStreamFactory, RedisStreamFactory};

/// Everything a factory may read: the role, the parameters and the
/// capabilities resolved by earlier steps
#[derive(Clone, Copy)]
pub struct FactoryContext<'a> {
    pub role: &'a Role,
    pub params: &'a ParameterSet,
    pub capabilities: &'a CapabilityRegistry,
}

impl<'a> FactoryContext<'a> {
    pub fn new(
        role: &'a Role,
        params: &'a ParameterSet,
        capabilities: &'a CapabilityRegistry,
    ) -> Self {
        Self {
            role,
            params,
            capabilities,
        }
    }
}

/// Constructor for one backend of capability `T`
#[async_trait]
pub trait BackendFactory<T: ?Sized + Send + Sync + 'static>: Send + Sync {
    /// Backend this factory produces, for logs
    fn backend(&self) -> &'static str;

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<T>>;
}

pub type Factory<T> = Box<dyn BackendFactory<T>>;

/// Injected table of factories, one per capability
pub struct FactorySet {
    pub auth: Factory<dyn Authenticator>,
    pub store: Factory<dyn Store>,
    pub config: Factory<dyn ConfigStore>,
    pub broker: Factory<dyn Broker>,
    pub registry: Factory<dyn Registry>,
    pub metrics_reporter: Factory<dyn MetricsReporter>,
    pub event_stream: Factory<dyn EventStream>,
    pub event_store: Factory<dyn EventStore>,
    pub blob_store: Option<Factory<dyn BlobStore>>,
    pub runtime: Factory<dyn Runtime>,
    pub builder: Factory<dyn Builder>,
    pub router: Option<Factory<dyn Router>>,
}
