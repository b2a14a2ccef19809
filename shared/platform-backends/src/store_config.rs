//! Configuration layer on top of the primary store
//!
//! Values are JSON documents stored under `<namespace>config/<path>`. Secret
//! values are sealed with AES-256-GCM using a key derived from the shared
//! config secret key.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use parking_lot::RwLock;
use platform_core::{Backend, ConfigStore, PlatformError, Record, Result, Store};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

const NONCE_LEN: usize = 12;

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Envelope {
    Plain { value: serde_json::Value },
    Sealed { data: String },
}

pub struct StoreConfig {
    store: Arc<dyn Store>,
    namespace: String,
    secret_key: RwLock<Option<[u8; 32]>>,
}

impl StoreConfig {
    pub fn new(store: Arc<dyn Store>, namespace: &str) -> Self {
        Self {
            store,
            namespace: namespace.to_string(),
            secret_key: RwLock::new(None),
        }
    }

    /// The store this configuration is persisted in
    pub fn store(&self) -> Arc<dyn Store> {
        self.store.clone()
    }

    fn key(&self, path: &str) -> String {
        format!("{}config/{}", self.namespace, path.trim_matches('/'))
    }

    fn cipher(&self) -> Result<Aes256Gcm> {
        let key = (*self.secret_key.read())
            .ok_or_else(|| PlatformError::Config("config secret key not set".to_string()))?;
        Aes256Gcm::new_from_slice(&key).map_err(|e| PlatformError::Internal(e.to_string()))
    }

    fn seal(&self, value: &serde_json::Value) -> Result<String> {
        let cipher = self.cipher()?;
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let plaintext = serde_json::to_vec(value)?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_ref())
            .map_err(|_| PlatformError::Internal("failed to seal config value".to_string()))?;

        let mut sealed = nonce.to_vec();
        sealed.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(sealed))
    }

    fn open(&self, data: &str) -> Result<serde_json::Value> {
        let cipher = self.cipher()?;
        let sealed = STANDARD
            .decode(data)
            .map_err(|e| PlatformError::Serialization(e.to_string()))?;
        if sealed.len() < NONCE_LEN {
            return Err(PlatformError::Serialization("sealed value too short".to_string()));
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| PlatformError::Config("config secret key does not match".to_string()))?;
        Ok(serde_json::from_slice(&plaintext)?)
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("store", &self.store.backend())
            .field("namespace", &self.namespace)
            .field("secret_key_set", &self.secret_key.read().is_some())
            .finish()
    }
}

impl Backend for StoreConfig {
    fn backend(&self) -> &'static str {
        "store"
    }
}

#[async_trait]
impl ConfigStore for StoreConfig {
    fn set_secret_key(&self, key: Option<String>) {
        *self.secret_key.write() = key.map(|k| Sha256::digest(k.as_bytes()).into());
    }

    async fn get(&self, path: &str) -> Result<Option<serde_json::Value>> {
        let Some(record) = self.store.read(&self.key(path)).await? else {
            return Ok(None);
        };

        match serde_json::from_slice(&record.value)? {
            Envelope::Plain { value } => Ok(Some(value)),
            Envelope::Sealed { data } => self.open(&data).map(Some),
        }
    }

    async fn set(&self, path: &str, value: serde_json::Value, secret: bool) -> Result<()> {
        let envelope = if secret {
            Envelope::Sealed {
                data: self.seal(&value)?,
            }
        } else {
            Envelope::Plain { value }
        };

        self.store
            .write(Record::new(self.key(path), serde_json::to_vec(&envelope)?))
            .await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.store.delete(&self.key(path)).await
    }
}
