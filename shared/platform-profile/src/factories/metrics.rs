use async_trait::async_trait;
use platform_core::{params, MetricsReporter, Result};
use platform_telemetry::{PrometheusReporter, DEFAULT_NAMESPACE};
use std::sync::Arc;

use super::{BackendFactory, FactoryContext};

pub struct PrometheusReporterFactory;

#[async_trait]
impl BackendFactory<dyn MetricsReporter> for PrometheusReporterFactory {
    fn backend(&self) -> &'static str {
        "prometheus"
    }

    async fn build(&self, ctx: &FactoryContext<'_>) -> Result<Arc<dyn MetricsReporter>> {
        let namespace = ctx
            .params
            .get_or(params::METRICS_NAMESPACE, DEFAULT_NAMESPACE);
        Ok(Arc::new(PrometheusReporter::new(namespace)?))
    }
}
