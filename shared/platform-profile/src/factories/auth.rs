use async_trait::async_trait;
use platform_backends::JwtAuth;
use platform_core::{Authenticator, Result};
use std::sync::Arc;

use super::{BackendFactory, FactoryContext};

/// Token authenticator; keys are applied later from the auth defaults
pub struct JwtAuthFactory;

#[async_trait]
impl BackendFactory<dyn Authenticator> for JwtAuthFactory {
    fn backend(&self) -> &'static str {
        "jwt"
    }

    async fn build(&self, _ctx: &FactoryContext<'_>) -> Result<Arc<dyn Authenticator>> {
        Ok(Arc::new(JwtAuth::new()))
    }
}
