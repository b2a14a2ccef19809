use async_trait::async_trait;
use platform_backends::{LocalBlobStore, S3BlobStore, S3Options};
use platform_core::{BlobStore, Result};
use std::env;
use std::sync::Arc;

use super::{BackendFactory, FactoryContext};

/// S3-compatible bucket configured from `blob_store_*`
pub struct S3BlobStoreFactory;

#[async_trait]
impl BackendFactory<dyn BlobStore> for S3BlobStoreFactory {
    fn backend(&self) -> &'static str {
        "s3"
    }

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<dyn BlobStore>> {
        let store = S3BlobStore::new(S3Options::from_params(ctx.params))?;
        Ok(Arc::new(store))
    }
}

pub struct LocalBlobStoreFactory;

#[async_trait]
impl BackendFactory<dyn BlobStore> for LocalBlobStoreFactory {
    fn backend(&self) -> &'static str {
        "local"
    }

    async fn build(&self, _ctx: &FactoryContext<'_>) -> Result<Arc<dyn BlobStore>> {
        let dir = env::temp_dir().join("micro").join("blob");
        Ok(Arc::new(LocalBlobStore::new(dir)))
    }
}
