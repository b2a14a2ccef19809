//! NATS broker and NATS streaming handles

use platform_core::{Backend, Broker, EventStream, PlatformError, Result, TlsBundle};
use tracing::debug;

use crate::{split_addresses, validate_address};

pub const DEFAULT_ADDRESS: &str = "nats://127.0.0.1:4222";
pub const DEFAULT_CLUSTER_ID: &str = "nats-streaming";

#[derive(Debug, Clone)]
pub struct NatsBroker {
    addresses: Vec<String>,
}

impl NatsBroker {
    /// Build from a comma separated address list; empty means the local default
    pub fn new(addresses: Option<&str>) -> Result<Self> {
        let addresses = split_addresses(addresses, DEFAULT_ADDRESS);
        for address in &addresses {
            validate_address(address, "nats")?;
        }

        debug!(?addresses, "NATS broker configured");
        Ok(Self { addresses })
    }
}

impl Backend for NatsBroker {
    fn backend(&self) -> &'static str {
        "nats"
    }
}

impl Broker for NatsBroker {
    fn addresses(&self) -> Vec<String> {
        self.addresses.clone()
    }
}

#[derive(Debug, Clone)]
pub struct NatsStreamOptions {
    /// Cluster members, all of which the stream may connect to
    pub addresses: Vec<String>,
    pub cluster_id: String,
    pub tls: Option<TlsBundle>,
}

impl Default for NatsStreamOptions {
    fn default() -> Self {
        Self {
            addresses: vec![DEFAULT_ADDRESS.to_string()],
            cluster_id: DEFAULT_CLUSTER_ID.to_string(),
            tls: None,
        }
    }
}

/// Event stream on a NATS streaming cluster
#[derive(Debug, Clone)]
pub struct NatsStream {
    addresses: Vec<String>,
    cluster_id: String,
    tls: Option<TlsBundle>,
}

impl NatsStream {
    pub fn new(options: NatsStreamOptions) -> Result<Self> {
        if options.addresses.is_empty() {
            return Err(PlatformError::Config(
                "nats stream needs at least one address".to_string(),
            ));
        }
        for address in &options.addresses {
            validate_address(address, "nats")?;
        }

        debug!(
            addresses = ?options.addresses,
            cluster_id = %options.cluster_id,
            tls = options.tls.is_some(),
            "NATS stream configured"
        );

        Ok(Self {
            addresses: options.addresses,
            cluster_id: options.cluster_id,
            tls: options.tls,
        })
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    pub fn tls(&self) -> Option<&TlsBundle> {
        self.tls.as_ref()
    }
}

impl Backend for NatsStream {
    fn backend(&self) -> &'static str {
        "nats"
    }
}

impl EventStream for NatsStream {
    fn address(&self) -> String {
        self.addresses.join(",")
    }

    fn tls_enabled(&self) -> bool {
        self.tls.is_some()
    }
}
