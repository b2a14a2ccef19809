//! etcd service registry handle

use platform_core::{Backend, Registry, Result, TlsBundle};
use tracing::debug;

use crate::{split_addresses, validate_address};

pub const DEFAULT_ADDRESS: &str = "127.0.0.1:2379";

#[derive(Debug, Clone, Default)]
pub struct EtcdOptions {
    pub addresses: Vec<String>,
    pub tls: Option<TlsBundle>,
}

impl EtcdOptions {
    pub fn new(addresses: Option<&str>, tls: Option<TlsBundle>) -> Self {
        Self {
            addresses: split_addresses(addresses, DEFAULT_ADDRESS),
            tls,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EtcdRegistry {
    addresses: Vec<String>,
    tls: Option<TlsBundle>,
}

impl EtcdRegistry {
    pub fn new(options: EtcdOptions) -> Result<Self> {
        let scheme = if options.tls.is_some() { "https" } else { "http" };
        let addresses = if options.addresses.is_empty() {
            vec![DEFAULT_ADDRESS.to_string()]
        } else {
            options.addresses
        };

        for address in &addresses {
            validate_address(address, scheme)?;
        }

        debug!(?addresses, tls = options.tls.is_some(), "etcd registry configured");

        Ok(Self {
            addresses,
            tls: options.tls,
        })
    }

    pub fn tls(&self) -> Option<&TlsBundle> {
        self.tls.as_ref()
    }
}

impl Backend for EtcdRegistry {
    fn backend(&self) -> &'static str {
        "etcd"
    }
}

impl Registry for EtcdRegistry {
    fn addresses(&self) -> Vec<String> {
        self.addresses.clone()
    }

    fn tls_enabled(&self) -> bool {
        self.tls.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_address() {
        let registry = EtcdRegistry::new(EtcdOptions::new(None, None)).unwrap();
        assert_eq!(registry.addresses(), vec![DEFAULT_ADDRESS.to_string()]);
        assert!(!registry.tls_enabled());

        let registry = EtcdRegistry::new(EtcdOptions::default()).unwrap();
        assert_eq!(registry.addresses().len(), 1);
    }

    #[test]
    fn test_cluster_addresses() {
        let options = EtcdOptions::new(Some("etcd-0.etcd:2379,etcd-1.etcd:2379"), None);
        let registry = EtcdRegistry::new(options).unwrap();
        assert_eq!(registry.addresses().len(), 2);
    }

    #[test]
    fn test_invalid_address_rejected() {
        let options = EtcdOptions::new(Some("etcd-0.etcd"), None);
        assert!(EtcdRegistry::new(options).is_err());
    }
}
