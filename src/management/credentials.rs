use std::{io::ErrorKind, path::PathBuf};

use crate::{config, error::Result, types::Credentials};

/// Saved account credentials (`config.json` in the data directory).
pub struct CredentialsManager {
    path: PathBuf,
}

impl CredentialsManager {
    pub fn new() -> Self {
        Self::at(config::credentials_path())
    }

    pub fn at(path: PathBuf) -> Self {
        CredentialsManager { path }
    }

    /// Returns the saved credentials, or `None` when nothing usable is saved.
    pub async fn load(&self) -> Result<Option<Credentials>> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let credentials: Credentials = serde_json::from_str(&content)?;
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Ok(None);
        }
        Ok(Some(credentials))
    }

    pub async fn persist(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(credentials)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Default for CredentialsManager {
    fn default() -> Self {
        Self::new()
    }
}
