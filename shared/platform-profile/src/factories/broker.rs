use async_trait::async_trait;
use platform_backends::{MemoryBroker, NatsBroker, RedisBroker};
use platform_core::{params, Broker, PlatformError, Result};
use std::sync::Arc;

use super::{BackendFactory, FactoryContext};

pub struct NatsBrokerFactory;

#[async_trait]
impl BackendFactory<dyn Broker> for NatsBrokerFactory {
    fn backend(&self) -> &'static str {
        "nats"
    }

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<dyn Broker>> {
        let broker = NatsBroker::new(ctx.params.get(params::BROKER_ADDRESS))?;
        Ok(Arc::new(broker))
    }
}

/// Redis broker; `broker_address` must be a full connection URL
pub struct RedisBrokerFactory;

#[async_trait]
impl BackendFactory<dyn Broker> for RedisBrokerFactory {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<dyn Broker>> {
        let url = ctx.params.get(params::BROKER_ADDRESS).ok_or_else(|| {
            PlatformError::Config("broker_address is required for the redis broker".to_string())
        })?;
        Ok(Arc::new(RedisBroker::from_url(url)?))
    }
}

pub struct MemoryBrokerFactory;

#[async_trait]
impl BackendFactory<dyn Broker> for MemoryBrokerFactory {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn build(&self, _ctx: &FactoryContext<'_>) -> Result<Arc<dyn Broker>> {
        Ok(Arc::new(MemoryBroker))
    }
}
