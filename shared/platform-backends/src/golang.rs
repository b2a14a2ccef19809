//! Go source builder
//!
//! The toolchain is located when the builder is constructed so a host
//! without Go fails at startup instead of on the first deployment.

use async_trait::async_trait;
use platform_core::{Artifact, Backend, Builder, PlatformError, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct GolangBuilder {
    go: PathBuf,
    out_dir: PathBuf,
}

impl GolangBuilder {
    /// Use the given `go` binary, or find one on `PATH`
    pub fn new(toolchain: Option<&str>) -> Result<Self> {
        let go = match toolchain {
            Some(path) => {
                which::which(path).map_err(|e| {
                    PlatformError::Build(format!("go toolchain not usable at {}: {}", path, e))
                })?
            }
            None => which::which("go").map_err(|e| {
                PlatformError::Build(format!("go toolchain not found on PATH: {}", e))
            })?,
        };

        debug!(go = %go.display(), "Go builder configured");

        Ok(Self {
            go,
            out_dir: env::temp_dir().join("micro-builds"),
        })
    }

    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn toolchain(&self) -> &Path {
        &self.go
    }
}

impl Backend for GolangBuilder {
    fn backend(&self) -> &'static str {
        "golang"
    }
}

#[async_trait]
impl Builder for GolangBuilder {
    #[instrument(skip(self, source), fields(source = %source.display()))]
    async fn build(&self, source: &Path) -> Result<Artifact> {
        tokio::fs::create_dir_all(&self.out_dir).await?;
        let out = self.out_dir.join(Uuid::new_v4().to_string());

        info!(out = %out.display(), "Building Go source");

        let output = tokio::process::Command::new(&self.go)
            .arg("build")
            .arg("-o")
            .arg(&out)
            .arg(".")
            .current_dir(source)
            .output()
            .await?;

        if !output.status.success() {
            return Err(PlatformError::Build(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(Artifact {
            source: source.to_path_buf(),
            path: out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_toolchain() {
        let result = GolangBuilder::new(Some("/nonexistent/bin/go"));
        assert!(matches!(result, Err(PlatformError::Build(_))));
    }

    #[cfg(unix)]
    fn write_go(dir: &Path, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let go = dir.join("go");
        std::fs::write(&go, b"#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&go, std::fs::Permissions::from_mode(mode)).unwrap();
        go
    }

    #[cfg(unix)]
    #[test]
    fn test_explicit_toolchain() {
        let dir = tempfile::tempdir().unwrap();
        let go = write_go(dir.path(), 0o755);

        let builder = GolangBuilder::new(go.to_str()).unwrap();
        assert_eq!(builder.toolchain().file_name(), go.file_name());
        assert_eq!(builder.backend(), "golang");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_toolchain_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let go = write_go(dir.path(), 0o644);

        let result = GolangBuilder::new(go.to_str());
        assert!(matches!(result, Err(PlatformError::Build(_))));
    }
}
