use async_trait::async_trait;
use platform_backends::DnsRouter;
use platform_core::{params, Result, Router};
use std::sync::Arc;

use super::runtime::DEFAULT_RUNTIME_NAMESPACE;
use super::{BackendFactory, FactoryContext};

/// Cluster DNS routing in the runtime namespace
pub struct DnsRouterFactory;

#[async_trait]
impl BackendFactory<dyn Router> for DnsRouterFactory {
    fn backend(&self) -> &'static str {
        "dns"
    }

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<dyn Router>> {
        let namespace = ctx
            .params
            .get_or(params::RUNTIME_NAMESPACE, DEFAULT_RUNTIME_NAMESPACE);
        Ok(Arc::new(DnsRouter::new(namespace)))
    }
}
