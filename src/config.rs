//! Configuration management for the Beatport top tracks CLI.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults

use std::{env, path::PathBuf};

use crate::{beatport::Endpoints, types::Credentials};

const APP_DIR: &str = "bpcli";

/// Loads environment variables from `<data_local_dir>/bpcli/.env`.
///
/// The directory is created when missing. A missing `.env` file is fine;
/// a malformed one is reported.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/bpcli/.env`
/// - macOS: `~/Library/Application Support/bpcli/.env`
/// - Windows: `%LOCALAPPDATA%/bpcli/.env`
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Root of everything `bpcli` stores on disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

pub fn token_path() -> PathBuf {
    data_dir().join("cache/token.json")
}

pub fn credentials_path() -> PathBuf {
    data_dir().join("config.json")
}

/// API and auth base URLs, from `BEATPORT_API_URL` and `BEATPORT_AUTH_URL`.
pub fn endpoints() -> Endpoints {
    let api = non_empty_var("BEATPORT_API_URL")
        .unwrap_or_else(|| crate::beatport::DEFAULT_API_URL.to_string());
    let auth = non_empty_var("BEATPORT_AUTH_URL");
    Endpoints::new(&api, auth.as_deref())
}

/// Pre-configured OAuth client id. When set, the docs page is not scraped.
pub fn client_id() -> Option<String> {
    non_empty_var("BEATPORT_CLIENT_ID")
}

/// Credentials from `BEATPORT_USERNAME` and `BEATPORT_PASSWORD`, if both are set.
pub fn env_credentials() -> Option<Credentials> {
    Some(Credentials {
        username: non_empty_var("BEATPORT_USERNAME")?,
        password: non_empty_var("BEATPORT_PASSWORD")?,
    })
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
