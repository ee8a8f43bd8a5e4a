//! On-disk photo storage under `UPLOAD_DIR`, served at `/uploads`.

use chrono::Utc;
use core_config::{ConfigError, FromEnv, env_or_default};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadConfig {
    pub dir: PathBuf,
}

impl FromEnv for UploadConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dir: PathBuf::from(env_or_default("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
        })
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
        }
    }
}

/// Writes photos as `<unix millis>.<ext>` and hands back their public URL.
#[derive(Clone, Debug)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: config.dir.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns `/uploads/<file>`. A name collision moves to the next
    /// millisecond; existing files are never overwritten.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> io::Result<String> {
        fs::create_dir_all(&self.dir).await?;

        let ext = original_name.and_then(extension);
        let mut millis = Utc::now().timestamp_millis();

        loop {
            let file_name = match &ext {
                Some(ext) => format!("{millis}.{ext}"),
                None => millis.to_string(),
            };
            let path = self.dir.join(&file_name);

            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(mut file) => {
                    file.write_all(bytes).await?;
                    file.flush().await?;
                    tracing::info!(file = %path.display(), size = bytes.len(), "Stored photo");
                    return Ok(format!("{PUBLIC_PREFIX}/{file_name}"));
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => millis += 1,
                Err(e) => return Err(e),
            }
        }
    }

    /// Deletes a file previously returned by [`save`](Self::save). URLs that
    /// do not point into this store are ignored.
    pub async fn remove(&self, url: &str) {
        let Some(file_name) = url
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
        else {
            return;
        };

        if let Err(e) = fs::remove_file(self.dir.join(file_name)).await {
            tracing::warn!(url, error = %e, "Failed to remove stored photo");
        }
    }
}

/// Lowercased extension of the client's file name, if it looks sane.
fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
}
