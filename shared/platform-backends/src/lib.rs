//! Platform Backends
//!
//! Concrete handles behind each capability. Wire clients for the remote
//! systems (NATS, Redis, etcd, S3, Kubernetes) live elsewhere; these handles
//! carry the validated connection settings those clients are built from.

pub mod etcd;
pub mod golang;
pub mod jwt;
pub mod kubernetes;
pub mod local;
pub mod memory;
pub mod nats;
pub mod postgres;
pub mod redis;
pub mod s3;
pub mod store_config;
pub mod store_events;

pub use etcd::{EtcdOptions, EtcdRegistry};
pub use golang::GolangBuilder;
pub use jwt::JwtAuth;
pub use kubernetes::{DnsRouter, KubernetesOptions, KubernetesRuntime};
pub use local::{LocalBlobStore, LocalBuilder, LocalRuntime};
pub use memory::{MemoryBroker, MemoryRegistry, MemoryStore, MemoryStream};
pub use nats::{NatsBroker, NatsStream, NatsStreamOptions};
pub use postgres::{PoolConfig, PostgresStore};
pub use redis::{RedisBroker, RedisStream};
pub use s3::{S3BlobStore, S3Options};
pub use store_config::StoreConfig;
pub use store_events::StoreEvents;

use platform_core::{ConnectionSpec, PlatformError, Result};

/// Split a comma separated address list, falling back to `default` when empty
pub fn split_addresses(raw: Option<&str>, default: &str) -> Vec<String> {
    let addresses: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect();

    if addresses.is_empty() {
        vec![default.to_string()]
    } else {
        addresses
    }
}

/// Validate a `host:port` or `scheme://host:port` address
pub fn validate_address(address: &str, scheme: &str) -> Result<ConnectionSpec> {
    if address.contains("://") {
        ConnectionSpec::parse(address)
    } else {
        match address.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
                ConnectionSpec::parse(&format!("{}://{}", scheme, address))
            }
            _ => Err(PlatformError::InvalidUrl(format!(
                "{}: expected host:port",
                address
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_addresses() {
        assert_eq!(split_addresses(None, "127.0.0.1:2379"), vec!["127.0.0.1:2379"]);
        assert_eq!(
            split_addresses(Some("etcd-0:2379, etcd-1:2379,"), "x"),
            vec!["etcd-0:2379", "etcd-1:2379"]
        );
    }

    #[test]
    fn test_validate_address() {
        assert_eq!(
            validate_address("etcd.etcd:2379", "http").unwrap().address,
            "etcd.etcd:2379"
        );
        assert!(validate_address("nats://nats:4222", "nats").is_ok());
        assert!(validate_address("etcd.etcd", "http").is_err());
        assert!(validate_address(":2379", "http").is_err());
    }
}
