//! # Beatport Integration Module
//!
//! Talks to the Beatport v4 API without registered API credentials, the same
//! way the Beatport web docs do:
//!
//! ```text
//! TokenManager ──(cached?)──► done
//!      │ no
//!      ▼
//! ClientIdResolver ─► Authenticator (login → authorize → token) ─► TokenManager
//!                                                         │
//!                                                         ▼
//!                                                  CatalogClient
//! ```
//!
//! Every request goes through [`Transport`], which retries connection
//! failures and 5xx responses with exponential backoff over one shared
//! cookie [`Session`].
//!
//! ## Submodules
//!
//! - [`transport`] - session, retry policy and request execution
//! - [`extract`] - text extraction used for scraping
//! - [`resolver`] - OAuth client id discovery
//! - [`auth`] - authorization-code flow
//! - [`catalog`] - genre listing and top tracks with search fallback

pub mod auth;
pub mod catalog;
pub mod extract;
pub mod resolver;
pub mod transport;

pub use auth::Authenticator;
pub use catalog::{CatalogClient, FallbackPolicy};
pub use extract::{RegexExtractor, TextExtractor};
pub use resolver::ClientIdResolver;
pub use transport::{RetryPolicy, Session, Transport};

pub const DEFAULT_API_URL: &str = "https://api.beatport.com/v4";

/// Base URLs of the API and its auth server, and the paths derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: String,
    pub auth_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, None)
    }
}

impl Endpoints {
    /// Builds the endpoint set. The auth server defaults to `<api>/auth`.
    pub fn new(api_base: &str, auth_base: Option<&str>) -> Self {
        let api_base = api_base.trim_end_matches('/').to_string();
        let auth_base = match auth_base {
            Some(auth) => auth.trim_end_matches('/').to_string(),
            None => format!("{api_base}/auth"),
        };
        Self {
            api_base,
            auth_base,
        }
    }

    pub fn docs_url(&self) -> String {
        format!("{}/docs/", self.api_base)
    }

    pub fn login_url(&self) -> String {
        format!("{}/login/", self.auth_base)
    }

    pub fn authorize_url(&self) -> String {
        format!("{}/o/authorize/", self.auth_base)
    }

    pub fn token_url(&self) -> String {
        format!("{}/o/token/", self.auth_base)
    }

    pub fn redirect_uri(&self) -> String {
        format!("{}/o/post-message/", self.auth_base)
    }

    pub fn genres_url(&self) -> String {
        format!("{}/catalog/genres/", self.api_base)
    }

    pub fn top_tracks_url(&self, genre_id: u64) -> String {
        format!("{}/catalog/genres/{genre_id}/top/100", self.api_base)
    }

    pub fn search_url(&self) -> String {
        format!("{}/catalog/search", self.api_base)
    }
}
