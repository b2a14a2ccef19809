use async_trait::async_trait;
use platform_backends::{KubernetesOptions, KubernetesRuntime, LocalRuntime};
use platform_core::{params, Result, Runtime};
use std::sync::Arc;

use super::{BackendFactory, FactoryContext};

pub const DEFAULT_RUNTIME_NAMESPACE: &str = "micro";

/// Kubernetes with a fixed isolation runtime class
pub struct KubernetesRuntimeFactory {
    pub runtime_class: &'static str,
}

impl Default for KubernetesRuntimeFactory {
    fn default() -> Self {
        Self {
            runtime_class: "kata-fc",
        }
    }
}

#[async_trait]
impl BackendFactory<dyn Runtime> for KubernetesRuntimeFactory {
    fn backend(&self) -> &'static str {
        "kubernetes"
    }

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<dyn Runtime>> {
        let runtime = KubernetesRuntime::new(KubernetesOptions {
            runtime_class: Some(self.runtime_class.to_string()),
            namespace: ctx
                .params
                .get_or(params::RUNTIME_NAMESPACE, DEFAULT_RUNTIME_NAMESPACE)
                .to_string(),
        })?;
        Ok(Arc::new(runtime))
    }
}

pub struct LocalRuntimeFactory;

#[async_trait]
impl BackendFactory<dyn Runtime> for LocalRuntimeFactory {
    fn backend(&self) -> &'static str {
        "local"
    }

    async fn build(&self, _ctx: &FactoryContext<'_>) -> Result<Arc<dyn Runtime>> {
        Ok(Arc::new(LocalRuntime))
    }
}
