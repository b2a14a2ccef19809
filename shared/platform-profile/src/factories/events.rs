use async_trait::async_trait;
use platform_backends::StoreEvents;
use platform_core::{EventStore, Result};
use std::sync::Arc;

use super::{BackendFactory, FactoryContext};

/// Event store sharing the store instance resolved earlier; never reconnects
pub struct StoreEventsFactory;

#[async_trait]
impl BackendFactory<dyn EventStore> for StoreEventsFactory {
    fn backend(&self) -> &'static str {
        "store"
    }

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<dyn EventStore>> {
        let store = ctx.capabilities.require_store()?;
        Ok(Arc::new(StoreEvents::new(store)))
    }
}
