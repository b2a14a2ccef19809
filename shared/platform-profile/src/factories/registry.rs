use async_trait::async_trait;
use platform_backends::{EtcdOptions, EtcdRegistry, MemoryRegistry};
use platform_core::{params, resolve_tls, Registry, Result, TlsPaths};
use std::sync::Arc;

use super::{BackendFactory, FactoryContext};

/// etcd cluster, optionally over mutual TLS (`registry_tls_*`)
pub struct EtcdRegistryFactory;

#[async_trait]
impl BackendFactory<dyn Registry> for EtcdRegistryFactory {
    fn backend(&self) -> &'static str {
        "etcd"
    }

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<dyn Registry>> {
        let tls = resolve_tls(&TlsPaths::from_params(
            ctx.params,
            params::REGISTRY_TLS_CERT,
            params::REGISTRY_TLS_KEY,
            params::REGISTRY_TLS_CA,
        ))?;
        let options = EtcdOptions::new(ctx.params.get(params::REGISTRY_ADDRESS), tls);
        Ok(Arc::new(EtcdRegistry::new(options)?))
    }
}

pub struct MemoryRegistryFactory;

#[async_trait]
impl BackendFactory<dyn Registry> for MemoryRegistryFactory {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn build(&self, _ctx: &FactoryContext<'_>) -> Result<Arc<dyn Registry>> {
        Ok(Arc::new(MemoryRegistry))
    }
}
