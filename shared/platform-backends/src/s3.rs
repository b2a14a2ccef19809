//! S3-compatible blob store handle (DigitalOcean Spaces, MinIO, AWS)

use platform_core::{params, Backend, BlobStore, ParameterSet, PlatformError, Result};
use std::fmt;
use tracing::debug;

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Clone, Default)]
pub struct S3Options {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub bucket: Option<String>,
    pub insecure: bool,
}

impl S3Options {
    pub fn from_params(params: &ParameterSet) -> Self {
        let owned = |name| params.get(name).map(str::to_string);
        Self {
            access_key: owned(params::BLOB_STORE_ACCESS_KEY),
            secret_key: owned(params::BLOB_STORE_SECRET_KEY),
            endpoint: owned(params::BLOB_STORE_ENDPOINT),
            region: owned(params::BLOB_STORE_REGION),
            bucket: owned(params::BLOB_STORE_BUCKET),
            insecure: params.flag(params::BLOB_STORE_INSECURE),
        }
    }
}

impl fmt::Debug for S3Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Options")
            .field("access_key", &self.access_key.as_ref().map(|_| "***"))
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("insecure", &self.insecure)
            .finish()
    }
}

pub struct S3BlobStore {
    access_key: String,
    secret_key: String,
    endpoint: String,
    region: String,
    bucket: String,
    insecure: bool,
}

impl S3BlobStore {
    pub fn new(options: S3Options) -> Result<Self> {
        let required = |value: Option<String>, name: &str| {
            value
                .filter(|v| !v.is_empty())
                .ok_or_else(|| PlatformError::Config(format!("blob store {} is required", name)))
        };

        let endpoint = required(options.endpoint, "endpoint")?;
        let endpoint = endpoint
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string();
        if endpoint.is_empty() {
            return Err(PlatformError::Config("blob store endpoint is required".to_string()));
        }

        let store = Self {
            access_key: required(options.access_key, "access key")?,
            secret_key: required(options.secret_key, "secret key")?,
            bucket: required(options.bucket, "bucket")?,
            region: options
                .region
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint,
            insecure: options.insecure,
        };

        debug!(
            endpoint = %store.endpoint,
            bucket = %store.bucket,
            region = %store.region,
            insecure = store.insecure,
            "S3 blob store configured"
        );

        Ok(store)
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn has_secret_key(&self) -> bool {
        !self.secret_key.is_empty()
    }
}

impl fmt::Debug for S3BlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3BlobStore")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("insecure", &self.insecure)
            .finish()
    }
}

impl Backend for S3BlobStore {
    fn backend(&self) -> &'static str {
        "s3"
    }
}

impl BlobStore for S3BlobStore {
    fn location(&self) -> String {
        let scheme = if self.insecure { "http" } else { "https" };
        format!("{}://{}/{}", scheme, self.endpoint, self.bucket)
    }
}
