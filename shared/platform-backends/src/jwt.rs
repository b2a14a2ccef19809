//! JWT authenticator
//!
//! Tokens are RS256 signed. Keys arrive as base64 encoded PEM so they can be
//! passed through environment variables.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use parking_lot::RwLock;
use platform_core::{Account, AuthOptions, Authenticator, Backend, PlatformError, Result, Token};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_ISSUER: &str = "micro";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iss: String,
    exp: i64,
    iat: i64,
    jti: String,
    #[serde(default)]
    scopes: Vec<String>,
}

#[derive(Default)]
struct Keys {
    encoding: Option<EncodingKey>,
    decoding: Option<DecodingKey>,
}

#[derive(Default)]
pub struct JwtAuth {
    options: RwLock<AuthOptions>,
    keys: RwLock<Keys>,
}

impl JwtAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn issuer(&self) -> String {
        self.options
            .read()
            .issuer
            .clone()
            .unwrap_or_else(|| DEFAULT_ISSUER.to_string())
    }
}

impl fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = self.keys.read();
        f.debug_struct("JwtAuth")
            .field("issuer", &self.issuer())
            .field("can_sign", &keys.encoding.is_some())
            .field("can_verify", &keys.decoding.is_some())
            .finish()
    }
}

impl Backend for JwtAuth {
    fn backend(&self) -> &'static str {
        "jwt"
    }
}

impl Authenticator for JwtAuth {
    fn init(&self, options: AuthOptions) -> Result<()> {
        let encoding = options.private_key.as_deref().map(encoding_key).transpose()?;
        let decoding = options.public_key.as_deref().map(decoding_key).transpose()?;

        *self.keys.write() = Keys { encoding, decoding };
        *self.options.write() = options;
        Ok(())
    }

    fn options(&self) -> AuthOptions {
        self.options.read().clone()
    }

    fn generate(&self, account: &Account, ttl: Duration) -> Result<Token> {
        let keys = self.keys.read();
        let key = keys
            .encoding
            .as_ref()
            .ok_or_else(|| PlatformError::Auth("no private key configured".to_string()))?;

        let now = Utc::now();
        let expiry = now
            + chrono::Duration::from_std(ttl).map_err(|e| PlatformError::Auth(e.to_string()))?;

        let claims = Claims {
            sub: account.id.clone(),
            iss: self.issuer(),
            exp: expiry.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            scopes: account.scopes.clone(),
        };

        let access_token =
            encode(&Header::new(Algorithm::RS256), &claims, key).map_err(auth_error)?;

        Ok(Token {
            access_token,
            expiry,
        })
    }

    fn inspect(&self, token: &str) -> Result<Account> {
        let keys = self.keys.read();
        let key = keys
            .decoding
            .as_ref()
            .ok_or_else(|| PlatformError::Auth("no public key configured".to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.issuer()]);

        let data = decode::<Claims>(token, key, &validation).map_err(auth_error)?;

        Ok(Account {
            id: data.claims.sub,
            issuer: data.claims.iss,
            scopes: data.claims.scopes,
        })
    }
}

fn pem(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| PlatformError::Auth(format!("key is not base64: {}", e)))
}

fn encoding_key(encoded: &str) -> Result<EncodingKey> {
    EncodingKey::from_rsa_pem(&pem(encoded)?).map_err(auth_error)
}

fn decoding_key(encoded: &str) -> Result<DecodingKey> {
    DecodingKey::from_rsa_pem(&pem(encoded)?).map_err(auth_error)
}

fn auth_error(e: jsonwebtoken::errors::Error) -> PlatformError {
    PlatformError::Auth(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_KEY: &str = include_str!("../testdata/auth_private.pem");
    const PUBLIC_KEY: &str = include_str!("../testdata/auth_public.pem");

    fn options(issuer: Option<&str>) -> AuthOptions {
        AuthOptions {
            public_key: Some(STANDARD.encode(PUBLIC_KEY)),
            private_key: Some(STANDARD.encode(PRIVATE_KEY)),
            issuer: issuer.map(str::to_string),
        }
    }

    fn account() -> Account {
        Account {
            id: "svc-store".to_string(),
            issuer: "micro".to_string(),
            scopes: vec!["service".to_string()],
        }
    }

    #[test]
    fn test_generate_and_inspect() {
        let auth = JwtAuth::new();
        auth.init(options(Some("m3o"))).unwrap();

        let token = auth.generate(&account(), Duration::from_secs(60)).unwrap();
        assert!(token.expiry > Utc::now());

        let inspected = auth.inspect(&token.access_token).unwrap();
        assert_eq!(inspected.id, "svc-store");
        assert_eq!(inspected.issuer, "m3o");
        assert_eq!(inspected.scopes, vec!["service".to_string()]);
    }

    #[test]
    fn test_issuer_mismatch_rejected() {
        let signer = JwtAuth::new();
        signer.init(options(Some("m3o"))).unwrap();
        let token = signer.generate(&account(), Duration::from_secs(60)).unwrap();

        let verifier = JwtAuth::new();
        verifier.init(options(None)).unwrap();
        assert!(matches!(
            verifier.inspect(&token.access_token),
            Err(PlatformError::Auth(_))
        ));
    }

    #[test]
    fn test_without_keys() {
        let auth = JwtAuth::new();
        auth.init(AuthOptions::default()).unwrap();
        assert!(auth.generate(&account(), Duration::from_secs(60)).is_err());
        assert!(auth.inspect("token").is_err());
        assert_eq!(auth.options(), AuthOptions::default());
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let auth = JwtAuth::new();
        let bad = AuthOptions {
            private_key: Some("%%%".to_string()),
            ..AuthOptions::default()
        };
        assert!(auth.init(bad).is_err());

        let not_pem = AuthOptions {
            public_key: Some(STANDARD.encode("not a key")),
            ..AuthOptions::default()
        };
        assert!(auth.init(not_pem).is_err());
    }
}
