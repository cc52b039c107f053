use std::{io::ErrorKind, path::PathBuf};

use crate::{config, error::Result, types::OAuthToken};

/// Durable storage for the OAuth token.
pub struct TokenManager {
    path: PathBuf,
}

impl TokenManager {
    pub fn new() -> Self {
        Self::at(config::token_path())
    }

    pub fn at(path: PathBuf) -> Self {
        TokenManager { path }
    }

    /// Loads the cached token. A missing file is `Ok(None)`; unreadable or
    /// malformed content is an error.
    pub async fn load(&self) -> Result<Option<OAuthToken>> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let token: OAuthToken = serde_json::from_str(&content)?;
        Ok(Some(token))
    }

    /// Writes the token, replacing any previous one.
    pub async fn persist(&self, token: &OAuthToken) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Removes the cached token. Returns whether there was one.
    pub async fn clear(&self) -> Result<bool> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Default for TokenManager {
    fn default() -> Self {
        Self::new()
    }
}
