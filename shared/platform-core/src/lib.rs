//! Platform Core - capability contracts and bootstrap primitives
//!
//! This crate provides:
//! - The capability interfaces every backend implements (store, broker, registry, ...)
//! - The `CapabilityRegistry` context object holding the active backend per capability
//! - Parameter and role handling for the bootstrap entry point
//! - TLS credential resolution and connection-string adaptation
//! - Error handling utilities

pub mod capability;
pub mod config;
pub mod connection;
pub mod error;
pub mod registry;
pub mod tls;

pub use capability::*;
pub use config::{params, ParameterSet, Role};
pub use connection::{ConnectionSpec, UrlTls};
pub use error::{PlatformError, Result};
pub use registry::{CapabilityRegistry, NetworkClient};
pub use tls::{resolve_tls, TlsBundle, TlsPaths};
