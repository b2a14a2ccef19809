//! Platform Profile
//!
//! Named bundles of backend factories and the bootstrap that resolves them,
//! in dependency order, into a `CapabilityRegistry`.

pub mod catalogue;
pub mod error;
pub mod factories;
pub mod profile;

pub use catalogue::{ProfileRegistry, DEFAULT_IMAGE};
pub use error::{Result, Severity, SetupError, Step};
pub use factories::{BackendFactory, FactoryContext, FactorySet};
pub use profile::{Profile, StreamPolicy};

/// Profile used when `MICRO_PROFILE` is unset
pub const DEFAULT_PROFILE: &str = "local";
