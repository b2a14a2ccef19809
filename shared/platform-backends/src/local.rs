//! Single-host backends for the local profile

use async_trait::async_trait;
use platform_core::{Artifact, Backend, BlobStore, Builder, PlatformError, Result, Runtime};
use std::path::{Path, PathBuf};

/// Blobs kept in a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    dir: PathBuf,
}

impl LocalBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Backend for LocalBlobStore {
    fn backend(&self) -> &'static str {
        "local"
    }
}

impl BlobStore for LocalBlobStore {
    fn location(&self) -> String {
        format!("file://{}", self.dir.display())
    }
}

/// Runs services as local processes, without an isolation class
#[derive(Debug, Clone, Default)]
pub struct LocalRuntime;

impl Backend for LocalRuntime {
    fn backend(&self) -> &'static str {
        "local"
    }
}

impl Runtime for LocalRuntime {
    fn runtime_class(&self) -> Option<&str> {
        None
    }

    fn namespace(&self) -> &str {
        "local"
    }
}

/// Runs sources as-is; the artifact is the source directory itself
#[derive(Debug, Clone, Default)]
pub struct LocalBuilder;

impl Backend for LocalBuilder {
    fn backend(&self) -> &'static str {
        "local"
    }
}

#[async_trait]
impl Builder for LocalBuilder {
    async fn build(&self, source: &Path) -> Result<Artifact> {
        if !tokio::fs::try_exists(source).await? {
            return Err(PlatformError::NotFound(format!(
                "source {} does not exist",
                source.display()
            )));
        }

        Ok(Artifact {
            source: source.to_path_buf(),
            path: source.to_path_buf(),
        })
    }
}
