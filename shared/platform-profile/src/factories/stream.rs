use async_trait::async_trait;
use platform_backends::nats::{DEFAULT_ADDRESS, DEFAULT_CLUSTER_ID};
use platform_backends::{
    split_addresses, MemoryStream, NatsStream, NatsStreamOptions, RedisStream,
};
use platform_core::{
    params, resolve_tls, ConnectionSpec, EventStream, ParameterSet, PlatformError, Result,
    TlsBundle, TlsPaths,
};
use std::sync::Arc;

use super::{BackendFactory, FactoryContext};

/// Client credentials from `events_tls_*`; `None` when neither cert nor key is set
fn events_tls(params: &ParameterSet) -> Result<Option<TlsBundle>> {
    resolve_tls(&TlsPaths::from_params(
        params,
        params::EVENTS_TLS_CERT,
        params::EVENTS_TLS_KEY,
        params::EVENTS_TLS_CA,
    ))
}

/// NATS streaming on the broker cluster
pub struct NatsStreamFactory;

#[async_trait]
impl BackendFactory<dyn EventStream> for NatsStreamFactory {
    fn backend(&self) -> &'static str {
        "nats"
    }

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<dyn EventStream>> {
        let addresses = split_addresses(ctx.params.get(params::BROKER_ADDRESS), DEFAULT_ADDRESS);

        let stream = NatsStream::new(NatsStreamOptions {
            addresses,
            cluster_id: DEFAULT_CLUSTER_ID.to_string(),
            tls: events_tls(ctx.params)?,
        })?;
        Ok(Arc::new(stream))
    }
}

/// Redis streams described by the single `broker_address` URL
pub struct RedisStreamFactory;

#[async_trait]
impl BackendFactory<dyn EventStream> for RedisStreamFactory {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<dyn EventStream>> {
        let url = ctx.params.get(params::BROKER_ADDRESS).ok_or_else(|| {
            PlatformError::Config("broker_address is required for the redis stream".to_string())
        })?;
        let spec = ConnectionSpec::parse(url)?;
        Ok(Arc::new(RedisStream::new(spec, events_tls(ctx.params)?)))
    }
}

pub struct MemoryStreamFactory;

#[async_trait]
impl BackendFactory<dyn EventStream> for MemoryStreamFactory {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn build(&self, _ctx: &FactoryContext<'_>) -> Result<Arc<dyn EventStream>> {
        Ok(Arc::new(MemoryStream))
    }
}
