use async_trait::async_trait;
use platform_backends::StoreConfig;
use platform_core::{ConfigStore, Result};
use std::sync::Arc;

use super::{BackendFactory, FactoryContext};

/// Config layer over the already resolved store
pub struct StoreConfigFactory;

#[async_trait]
impl BackendFactory<dyn ConfigStore> for StoreConfigFactory {
    fn backend(&self) -> &'static str {
        "store"
    }

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<dyn ConfigStore>> {
        let store = ctx.capabilities.require_store()?;
        Ok(Arc::new(StoreConfig::new(store, "")))
    }
}
