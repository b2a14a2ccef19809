//! TLS credential resolution
//!
//! Pairs a PEM certificate chain with its private key and, optionally, a CA
//! bundle into a rustls client configuration. Without a CA path the root store
//! is empty: the system trust roots are never loaded implicitly.

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ClientConfig, RootCertStore};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ParameterSet;
use crate::error::{PlatformError, Result};

/// Certificate, key and CA file locations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TlsPaths<'a> {
    pub cert: Option<&'a str>,
    pub key: Option<&'a str>,
    pub ca: Option<&'a str>,
}

impl<'a> TlsPaths<'a> {
    pub fn from_params(params: &'a ParameterSet, cert: &str, key: &str, ca: &str) -> Self {
        Self {
            cert: params.get(cert),
            key: params.get(key),
            ca: params.get(ca),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cert.is_none() && self.key.is_none()
    }
}

/// Validated transport-security configuration, immutable after construction
#[derive(Clone)]
pub struct TlsBundle {
    certificates: Vec<CertificateDer<'static>>,
    ca_roots: usize,
    config: Arc<ClientConfig>,
}

impl TlsBundle {
    pub fn client_config(&self) -> Arc<ClientConfig> {
        self.config.clone()
    }

    pub fn certificates(&self) -> &[CertificateDer<'static>] {
        &self.certificates
    }

    /// Number of trust anchors loaded from the CA bundle
    pub fn ca_roots(&self) -> usize {
        self.ca_roots
    }
}

impl fmt::Debug for TlsBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsBundle")
            .field("certificates", &self.certificates.len())
            .field("ca_roots", &self.ca_roots)
            .finish()
    }
}

/// Resolve a TLS bundle from file paths.
///
/// Returns `Ok(None)` when neither certificate nor key is given. As soon as one
/// of them is set both must load and pair, and a given CA file must be readable.
pub fn resolve_tls(paths: &TlsPaths<'_>) -> Result<Option<TlsBundle>> {
    if paths.is_empty() {
        return Ok(None);
    }

    let cert_path = paths
        .cert
        .ok_or_else(|| PlatformError::Tls("key given without a certificate".to_string()))?;
    let key_path = paths
        .key
        .ok_or_else(|| PlatformError::Tls("certificate given without a key".to_string()))?;

    let certificates = load_certificates(cert_path)?;
    if certificates.is_empty() {
        return Err(PlatformError::Tls(format!(
            "no certificates found in {}",
            cert_path
        )));
    }
    let key = load_private_key(key_path)?;

    let mut roots = RootCertStore::empty();
    if let Some(ca_path) = paths.ca {
        let (added, ignored) = roots.add_parsable_certificates(load_certificates(ca_path)?);
        if ignored > 0 {
            warn!(ca = ca_path, ignored, "Skipped unparsable CA certificates");
        }
        debug!(ca = ca_path, added, "Loaded certificate authority");
    }
    let ca_roots = roots.len();

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| PlatformError::Tls(e.to_string()))?
        .with_root_certificates(roots)
        .with_client_auth_cert(certificates.clone(), key)
        .map_err(|e| PlatformError::Tls(format!("certificate/key pairing failed: {}", e)))?;

    Ok(Some(TlsBundle {
        certificates,
        ca_roots,
        config: Arc::new(config),
    }))
}

fn open(path: &str) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| PlatformError::Tls(format!("cannot read {}: {}", path, e)))
}

fn load_certificates(path: &str) -> Result<Vec<CertificateDer<'static>>> {
    rustls_pemfile::certs(&mut open(path)?)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| PlatformError::Tls(format!("invalid certificate in {}: {}", path, e)))
}

fn load_private_key(path: &str) -> Result<PrivateKeyDer<'static>> {
    rustls_pemfile::private_key(&mut open(path)?)
        .map_err(|e| PlatformError::Tls(format!("invalid private key in {}: {}", path, e)))?
        .ok_or_else(|| PlatformError::Tls(format!("no private key found in {}", path)))
}
