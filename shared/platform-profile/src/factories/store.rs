use async_trait::async_trait;
use platform_backends::{MemoryStore, PoolConfig, PostgresStore};
use platform_core::{params, Result, Store};
use std::sync::Arc;

use super::{BackendFactory, FactoryContext};

pub const DEFAULT_STORE_ADDRESS: &str = "127.0.0.1:26257";

/// Postgres wire store (CockroachDB or managed Postgres). Connects during
/// `build`, so the address must be known up front.
pub struct PostgresStoreFactory;

#[async_trait]
impl BackendFactory<dyn Store> for PostgresStoreFactory {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<dyn Store>> {
        let address = ctx
            .params
            .get_or(params::STORE_ADDRESS, DEFAULT_STORE_ADDRESS);
        let store = PostgresStore::connect(PoolConfig::from_address(address)).await?;
        Ok(Arc::new(store))
    }
}

pub struct MemoryStoreFactory;

#[async_trait]
impl BackendFactory<dyn Store> for MemoryStoreFactory {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn build(&self, _ctx: &FactoryContext<'_>) -> Result<Arc<dyn Store>> {
        Ok(Arc::new(MemoryStore::new()))
    }
}
