//! Built-in profiles and the profile registry

use platform_core::{PlatformError, Result, Role};
use std::collections::HashMap;
use std::sync::Arc;

use crate::factories::*;
use crate::profile::{Profile, StreamPolicy};

/// Default container image for deployments, our own cell
pub const DEFAULT_IMAGE: &str = "ghcr.io/m3o/cells:v3";

/// Highly available platform on Kubernetes: CockroachDB store, NATS broker
/// and stream, etcd registry, S3 blobs, kata-fc sandboxed runtime
pub fn platform() -> Profile {
    Profile {
        name: "platform".to_string(),
        factories: FactorySet {
            auth: Box::new(JwtAuthFactory),
            store: Box::new(PostgresStoreFactory),
            config: Box::new(StoreConfigFactory),
            broker: Box::new(NatsBrokerFactory),
            registry: Box::new(EtcdRegistryFactory),
            metrics_reporter: Box::new(PrometheusReporterFactory),
            event_stream: Box::new(NatsStreamFactory),
            event_store: Box::new(StoreEventsFactory),
            blob_store: Some(Box::new(S3BlobStoreFactory)),
            runtime: Box::new(KubernetesRuntimeFactory::default()),
            builder: Box::new(GolangBuilderFactory),
            router: Some(Box::new(DnsRouterFactory)),
        },
        stream_policy: StreamPolicy::Always,
        blob_roles: vec![Role::Runtime, Role::Store],
        default_image: Some(DEFAULT_IMAGE.to_string()),
    }
}

/// Platform on managed services: Postgres by URL and a single Redis URL for
/// both broker and stream. Only the events service talks to the stream.
pub fn managed() -> Profile {
    Profile {
        name: "managed".to_string(),
        factories: FactorySet {
            auth: Box::new(JwtAuthFactory),
            store: Box::new(PostgresStoreFactory),
            config: Box::new(StoreConfigFactory),
            broker: Box::new(RedisBrokerFactory),
            registry: Box::new(EtcdRegistryFactory),
            metrics_reporter: Box::new(PrometheusReporterFactory),
            event_stream: Box::new(RedisStreamFactory),
            event_store: Box::new(StoreEventsFactory),
            blob_store: Some(Box::new(S3BlobStoreFactory)),
            runtime: Box::new(KubernetesRuntimeFactory::default()),
            builder: Box::new(GolangBuilderFactory),
            router: Some(Box::new(DnsRouterFactory)),
        },
        stream_policy: StreamPolicy::Roles(vec![Role::Events]),
        blob_roles: vec![Role::Runtime, Role::Store],
        default_image: Some(DEFAULT_IMAGE.to_string()),
    }
}

/// Everything in process, for development and tests
pub fn local() -> Profile {
    Profile {
        name: "local".to_string(),
        factories: FactorySet {
            auth: Box::new(JwtAuthFactory),
            store: Box::new(MemoryStoreFactory),
            config: Box::new(StoreConfigFactory),
            broker: Box::new(MemoryBrokerFactory),
            registry: Box::new(MemoryRegistryFactory),
            metrics_reporter: Box::new(PrometheusReporterFactory),
            event_stream: Box::new(MemoryStreamFactory),
            event_store: Box::new(StoreEventsFactory),
            blob_store: Some(Box::new(LocalBlobStoreFactory)),
            runtime: Box::new(LocalRuntimeFactory),
            builder: Box::new(LocalBuilderFactory),
            router: None,
        },
        stream_policy: StreamPolicy::Always,
        blob_roles: vec![Role::Runtime, Role::Store],
        default_image: None,
    }
}

/// Profiles selectable by name
#[derive(Default)]
pub struct ProfileRegistry {
    profiles: HashMap<String, Arc<Profile>>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(platform());
        registry.register(managed());
        registry.register(local());
        registry
    }

    /// Register a profile under its name, replacing any previous one
    pub fn register(&mut self, profile: Profile) {
        self.profiles.insert(profile.name.clone(), Arc::new(profile));
    }

    pub fn get(&self, name: &str) -> Result<Arc<Profile>> {
        self.profiles
            .get(name)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(format!("profile {}", name)))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
