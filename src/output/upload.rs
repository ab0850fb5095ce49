//! Upload collaborator
//!
//! The crawl pipeline only needs a place to hand its finished artifact;
//! everything behind that is a collaborator reached through [`Uploader`].
//! The shipped implementation archives into a filesystem root laid out by
//! the resolved destination, which is also what the tests drive. A failed
//! upload never touches the local artifact; deleting it after success is
//! the caller's call.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{CrawlError, Result};

#[async_trait]
pub trait Uploader: Send + Sync {
    /// Uploads a local file to the resolved destination identifier.
    async fn upload(&self, local: &Path, destination: &str) -> Result<()>;
}

/// Archives artifacts under a local root directory.
#[derive(Debug, Clone)]
pub struct FsUploader {
    root: PathBuf,
}

impl FsUploader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Uploader for FsUploader {
    async fn upload(&self, local: &Path, destination: &str) -> Result<()> {
        let target = self.root.join(destination);

        let copy = || -> std::io::Result<()> {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(local, &target)?;
            Ok(())
        };

        copy().map_err(|err| CrawlError::Upload {
            destination: destination.to_string(),
            message: err.to_string(),
        })?;

        tracing::info!(
            local = %local.display(),
            target = %target.display(),
            "archived listing artifact"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn uploads_into_the_destination_layout() {
        let root = tempfile::tempdir().unwrap();
        let mut artifact = tempfile::NamedTempFile::new().unwrap();
        write!(artifact, "[]").unwrap();

        let uploader = FsUploader::new(root.path());
        uploader
            .upload(artifact.path(), "2024/3/11/century21_pt.json")
            .await
            .unwrap();

        let uploaded = root.path().join("2024/3/11/century21_pt.json");
        assert_eq!(std::fs::read_to_string(uploaded).unwrap(), "[]");
        // The local artifact stays; removal is the caller's decision
        assert!(artifact.path().exists());
    }

    #[tokio::test]
    async fn missing_local_file_is_an_upload_error() {
        let root = tempfile::tempdir().unwrap();
        let uploader = FsUploader::new(root.path());

        let err = uploader
            .upload(Path::new("/nonexistent/artifact.json"), "x.json")
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::Upload { .. }));
    }
}
