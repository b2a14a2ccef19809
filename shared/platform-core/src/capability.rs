//! Capability contracts
//!
//! Every backend the platform depends on is reached through one of these traits.
//! Exactly one implementation per capability is active per process; the
//! `CapabilityRegistry` holds them as `Arc<dyn Trait>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

use crate::error::Result;

/// Named capability slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Auth,
    Store,
    Config,
    Broker,
    Registry,
    MetricsReporter,
    EventStream,
    EventStore,
    BlobStore,
    Runtime,
    Builder,
    Router,
}

impl Capability {
    pub const ALL: [Capability; 12] = [
        Self::Auth,
        Self::Store,
        Self::Config,
        Self::Broker,
        Self::Registry,
        Self::MetricsReporter,
        Self::EventStream,
        Self::EventStore,
        Self::BlobStore,
        Self::Runtime,
        Self::Builder,
        Self::Router,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Store => "store",
            Self::Config => "config",
            Self::Broker => "broker",
            Self::Registry => "registry",
            Self::MetricsReporter => "metrics-reporter",
            Self::EventStream => "event-stream",
            Self::EventStore => "event-store",
            Self::BlobStore => "blob-store",
            Self::Runtime => "runtime",
            Self::Builder => "builder",
            Self::Router => "router",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common surface of every backend handle
pub trait Backend: Send + Sync + fmt::Debug {
    /// Implementation name (e.g. "postgres", "nats", "memory")
    fn backend(&self) -> &'static str;
}

// ============================================================================
// Store
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    pub value: Vec<u8>,
}

impl Record {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Distributed key-value store
#[async_trait]
pub trait Store: Backend {
    async fn read(&self, key: &str) -> Result<Option<Record>>;

    /// Records whose key starts with `prefix`, ordered by key
    async fn list(&self, prefix: &str) -> Result<Vec<Record>>;

    async fn write(&self, record: Record) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;
}

// ============================================================================
// Config
// ============================================================================

/// Key-value backed configuration layer
#[async_trait]
pub trait ConfigStore: Backend {
    /// Install the shared key used to seal secret values
    fn set_secret_key(&self, key: Option<String>);

    async fn get(&self, path: &str) -> Result<Option<serde_json::Value>>;

    async fn set(&self, path: &str, value: serde_json::Value, secret: bool) -> Result<()>;

    async fn delete(&self, path: &str) -> Result<()>;
}

// ============================================================================
// Messaging and discovery handles
// ============================================================================

pub trait Broker: Backend {
    fn addresses(&self) -> Vec<String>;
}

pub trait Registry: Backend {
    fn addresses(&self) -> Vec<String>;

    fn tls_enabled(&self) -> bool;
}

/// Event backbone shared by every service
pub trait EventStream: Backend {
    fn address(&self) -> String;

    fn tls_enabled(&self) -> bool;

    fn username(&self) -> Option<&str> {
        None
    }
}

// ============================================================================
// Event store
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub topic: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: HashMap<String, String>,
    pub payload: Vec<u8>,
}

impl Event {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            topic: topic.into(),
            timestamp: Utc::now(),
            metadata: HashMap::new(),
            payload: payload.into(),
        }
    }
}

/// Persistent event history written through the shared `Store`
#[async_trait]
pub trait EventStore: Backend {
    /// The store the events are persisted in
    fn store(&self) -> std::sync::Arc<dyn Store>;

    async fn write(&self, event: &Event) -> Result<()>;

    /// Events for a topic, oldest first
    async fn read(&self, topic: &str) -> Result<Vec<Event>>;
}

// ============================================================================
// Blob store, runtime, builder
// ============================================================================

pub trait BlobStore: Backend {
    /// Where blobs land, e.g. `https://ams3.digitaloceanspaces.com/micro-store`
    fn location(&self) -> String;
}

pub trait Runtime: Backend {
    /// Container runtime class used for isolation, if any
    fn runtime_class(&self) -> Option<&str>;

    fn namespace(&self) -> &str;
}

/// Output of a source build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub source: PathBuf,
    pub path: PathBuf,
}

/// Compiles deployable application source into runnable artifacts
#[async_trait]
pub trait Builder: Backend {
    async fn build(&self, source: &Path) -> Result<Artifact>;
}

// ============================================================================
// Routing
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub service: String,
    pub address: String,
}

#[async_trait]
pub trait Router: Backend {
    async fn lookup(&self, service: &str) -> Result<Vec<Route>>;
}

// ============================================================================
// Auth
// ============================================================================

/// Process-wide authentication defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthOptions {
    /// Base64 encoded PEM public key
    pub public_key: Option<String>,
    /// Base64 encoded PEM private key
    pub private_key: Option<String>,
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub issuer: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    pub expiry: DateTime<Utc>,
}

pub trait Authenticator: Backend {
    fn init(&self, options: AuthOptions) -> Result<()>;

    fn options(&self) -> AuthOptions;

    fn generate(&self, account: &Account, ttl: Duration) -> Result<Token>;

    fn inspect(&self, token: &str) -> Result<Account>;
}

// ============================================================================
// Metrics
// ============================================================================

pub trait MetricsReporter: Send + Sync {
    fn count(&self, name: &str, value: u64, tags: &[(&str, &str)]);

    fn gauge(&self, name: &str, value: f64, tags: &[(&str, &str)]);

    fn timing(&self, name: &str, value: Duration, tags: &[(&str, &str)]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_names_unique() {
        let mut names: Vec<_> = Capability::ALL.iter().map(|c| c.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Capability::ALL.len());
    }

    #[test]
    fn test_event_ids_unique() {
        let a = Event::new("deploy", b"a".to_vec());
        let b = Event::new("deploy", b"a".to_vec());
        assert_ne!(a.id, b.id);
    }
}
