//! Bootstrap parameters and process role

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Environment prefix for parameters (`MICRO_STORE_ADDRESS` -> `store_address`)
pub const ENV_PREFIX: &str = "MICRO_";

/// Well-known parameter names
pub mod params {
    pub const PROFILE: &str = "profile";

    pub const STORE_ADDRESS: &str = "store_address";
    pub const BROKER_ADDRESS: &str = "broker_address";
    pub const REGISTRY_ADDRESS: &str = "registry_address";

    pub const REGISTRY_TLS_CERT: &str = "registry_tls_cert";
    pub const REGISTRY_TLS_KEY: &str = "registry_tls_key";
    pub const REGISTRY_TLS_CA: &str = "registry_tls_ca";

    pub const EVENTS_TLS_CERT: &str = "events_tls_cert";
    pub const EVENTS_TLS_KEY: &str = "events_tls_key";
    pub const EVENTS_TLS_CA: &str = "events_tls_ca";

    pub const AUTH_PUBLIC_KEY: &str = "auth_public_key";
    pub const AUTH_PRIVATE_KEY: &str = "auth_private_key";
    pub const AUTH_ISSUER: &str = "auth_issuer";
    pub const CONFIG_SECRET_KEY: &str = "config_secret_key";

    pub const BLOB_STORE_ACCESS_KEY: &str = "blob_store_access_key";
    pub const BLOB_STORE_SECRET_KEY: &str = "blob_store_secret_key";
    pub const BLOB_STORE_ENDPOINT: &str = "blob_store_endpoint";
    pub const BLOB_STORE_REGION: &str = "blob_store_region";
    pub const BLOB_STORE_BUCKET: &str = "blob_store_bucket";
    pub const BLOB_STORE_INSECURE: &str = "blob_store_insecure";

    pub const RUNTIME_NAMESPACE: &str = "runtime_namespace";
    pub const BUILDER_TOOLCHAIN: &str = "builder_toolchain";
    pub const METRICS_NAMESPACE: &str = "metrics_namespace";
}

/// Named string parameters plus the positional argument list.
///
/// Read-only once bootstrap starts. Empty values are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    values: HashMap<String, String>,
    args: Vec<String>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect `MICRO_*` variables and the process arguments (binary name excluded)
    pub fn from_env() -> Self {
        Self::from_vars(env::vars(), env::args().skip(1))
    }

    pub fn from_vars<V, A>(vars: V, args: A) -> Self
    where
        V: IntoIterator<Item = (String, String)>,
        A: IntoIterator<Item = String>,
    {
        let values = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_lowercase(), value))
            })
            .collect();

        Self {
            values,
            args: args.into_iter().collect(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Any non-empty value switches a flag on
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Role is positional argument 1 (`service <role>`)
    pub fn role(&self) -> Option<Role> {
        self.arg(1).filter(|r| !r.is_empty()).map(Role::from)
    }
}

/// Declared operating mode of the process
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Api,
    Auth,
    Broker,
    Config,
    Events,
    Network,
    Proxy,
    Registry,
    Runtime,
    Store,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Api => "api",
            Self::Auth => "auth",
            Self::Broker => "broker",
            Self::Config => "config",
            Self::Events => "events",
            Self::Network => "network",
            Self::Proxy => "proxy",
            Self::Registry => "registry",
            Self::Runtime => "runtime",
            Self::Store => "store",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "api" => Self::Api,
            "auth" => Self::Auth,
            "broker" => Self::Broker,
            "config" => Self::Config,
            "events" => Self::Events,
            "network" => Self::Network,
            "proxy" => Self::Proxy,
            "registry" => Self::Registry,
            "runtime" => Self::Runtime,
            "store" => Self::Store,
            other => Self::Other(other.to_string()),
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from(s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
