/*!
 * API key storage.
 *
 * The key survives across sessions in a small file under the user's config
 * directory. It is read once at startup and then passed around explicitly as
 * `providers::Credentials`.
 */

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

use crate::providers::Credentials;

/// Asynchronous store for a single string secret
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Stored key, or `None` when nothing was saved yet.
    async fn load(&self) -> Result<Option<String>>;

    async fn save(&self, api_key: &str) -> Result<()>;

    /// Stored key as credentials; empty credentials when nothing was saved.
    async fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials::new(self.load().await?.unwrap_or_default()))
    }
}

/// File-backed credential store
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store located at `<config dir>/layerlingo/api_key`
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().ok_or_else(|| anyhow!("No config directory on this platform"))?;
        Ok(Self::new(dir.join("layerlingo").join("api_key")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let key = content.trim().to_string();
                Ok((!key.is_empty()).then_some(key))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to read credentials: {}", self.path.display())
            }),
        }
    }

    async fn save(&self, api_key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        tokio::fs::write(&self.path, api_key.trim())
            .await
            .with_context(|| format!("Failed to write credentials: {}", self.path.display()))?;
        debug!("Saved API key to {}", self.path.display());
        Ok(())
    }
}

/// Credential store kept in memory
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    key: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.key.lock().clone())
    }

    async fn save(&self, api_key: &str) -> Result<()> {
        *self.key.lock() = Some(api_key.trim().to_string());
        Ok(())
    }
}
