//! Kubernetes runtime handle and cluster DNS router

use async_trait::async_trait;
use platform_core::{Backend, PlatformError, Result, Route, Router, Runtime};
use tracing::debug;

pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct KubernetesOptions {
    /// Runtime class for sandboxed pods, e.g. `kata-fc`
    pub runtime_class: Option<String>,
    pub namespace: String,
}

impl Default for KubernetesOptions {
    fn default() -> Self {
        Self {
            runtime_class: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KubernetesRuntime {
    runtime_class: Option<String>,
    namespace: String,
}

impl KubernetesRuntime {
    pub fn new(options: KubernetesOptions) -> Result<Self> {
        if !is_dns_label(&options.namespace) {
            return Err(PlatformError::Config(format!(
                "invalid namespace: {}",
                options.namespace
            )));
        }
        if let Some(class) = options.runtime_class.as_deref() {
            if !is_dns_label(class) {
                return Err(PlatformError::Config(format!("invalid runtime class: {}", class)));
            }
        }

        debug!(
            namespace = %options.namespace,
            runtime_class = options.runtime_class.as_deref().unwrap_or("default"),
            "Kubernetes runtime configured"
        );

        Ok(Self {
            runtime_class: options.runtime_class,
            namespace: options.namespace,
        })
    }
}

impl Backend for KubernetesRuntime {
    fn backend(&self) -> &'static str {
        "kubernetes"
    }
}

impl Runtime for KubernetesRuntime {
    fn runtime_class(&self) -> Option<&str> {
        self.runtime_class.as_deref()
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// Resolves services through cluster DNS:
/// `<service>.<namespace>.svc.cluster.local`
#[derive(Debug, Clone)]
pub struct DnsRouter {
    namespace: String,
    port: u16,
}

impl DnsRouter {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            port: DEFAULT_PORT,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl Backend for DnsRouter {
    fn backend(&self) -> &'static str {
        "dns"
    }
}

#[async_trait]
impl Router for DnsRouter {
    async fn lookup(&self, service: &str) -> Result<Vec<Route>> {
        // service names may be dotted (go.micro.store); DNS labels may not
        let host = service.to_ascii_lowercase().replace('.', "-");
        if !is_dns_label(&host) {
            return Err(PlatformError::NotFound(format!("no route to {}", service)));
        }

        Ok(vec![Route {
            service: service.to_string(),
            address: format!(
                "{}.{}.svc.cluster.local:{}",
                host, self.namespace, self.port
            ),
        }])
    }
}

fn is_dns_label(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.starts_with('-')
        && !name.ends_with('-')
}
