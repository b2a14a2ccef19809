use async_trait::async_trait;
use platform_backends::{GolangBuilder, LocalBuilder};
use platform_core::{params, Builder, Result};
use std::sync::Arc;

use super::{BackendFactory, FactoryContext};

/// Go toolchain from `builder_toolchain` or `PATH`
pub struct GolangBuilderFactory;

#[async_trait]
impl BackendFactory<dyn Builder> for GolangBuilderFactory {
    fn backend(&self) -> &'static str {
        "golang"
    }

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<dyn Builder>> {
        let builder = GolangBuilder::new(ctx.params.get(params::BUILDER_TOOLCHAIN))?;
        Ok(Arc::new(builder))
    }
}

pub struct LocalBuilderFactory;

#[async_trait]
impl BackendFactory<dyn Builder> for LocalBuilderFactory {
    fn backend(&self) -> &'static str {
        "local"
    }

    async fn build(&self, _ctx: &FactoryContext<'_>) -> Result<Arc<dyn Builder>> {
        Ok(Arc::new(LocalBuilder))
    }
}
