//! # CLI Module
//!
//! User-facing commands. Each command builds a [`Context`] (transport, endpoints
//! and token cache), makes sure a token is available, and hands results to the
//! renderers in [`crate::utils`].
//!
//! ## Commands
//!
//! - [`auth`] - run the login flow and cache the token
//! - [`logout`] - drop the cached token
//! - [`genres`] - list catalog genres
//! - [`top`] - top tracks of a genre
//!
//! Credentials are taken from the environment, then from the saved
//! credentials file, then asked for interactively.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Res,
    beatport::{Authenticator, Endpoints, RetryPolicy, Session, Transport},
    config, info,
    management::{CredentialsManager, TokenManager},
    success,
    types::{Credentials, OAuthToken},
    warning,
};

mod auth;
mod genres;
pub mod prompt;
mod top;

pub use auth::auth;
pub use auth::logout;
pub use genres::genres;
pub use top::top;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_flags(json: bool, csv: bool) -> Self {
        match (json, csv) {
            (true, _) => OutputFormat::Json,
            (_, true) => OutputFormat::Csv,
            _ => OutputFormat::Text,
        }
    }

    /// Status messages are only printed for human-readable output.
    pub fn is_text(&self) -> bool {
        *self == OutputFormat::Text
    }
}

pub(crate) struct Context {
    pub transport: Transport,
    pub endpoints: Endpoints,
    pub tokens: TokenManager,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(format: OutputFormat) -> Res<Self> {
        let session = Session::new()?;
        Ok(Self {
            transport: Transport::new(session, RetryPolicy::default()),
            endpoints: config::endpoints(),
            tokens: TokenManager::new(),
            format,
        })
    }

    /// Returns the cached token or runs the full authentication flow.
    pub async fn token(&self) -> Res<OAuthToken> {
        let mut authenticator = Authenticator::new(&self.transport, &self.endpoints, &self.tokens)
            .with_client_id(config::client_id());

        if let Some(token) = authenticator.cached_token().await? {
            return Ok(token);
        }

        let (credentials, prompted) = resolve_credentials(self.format).await?;

        let pb = self.spinner("Authenticating...");
        let token = authenticator.authenticate(&credentials).await;
        pb.finish_and_clear();
        let token = token?;

        if self.format.is_text() {
            success!("Successfully authenticated!");
        }
        if prompted {
            offer_to_save(&credentials).await;
        }
        Ok(token)
    }

    pub fn spinner(&self, message: &'static str) -> ProgressBar {
        if !self.format.is_text() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb
    }
}

/// Returns credentials and whether they were typed in by the user.
async fn resolve_credentials(format: OutputFormat) -> Res<(Credentials, bool)> {
    if let Some(credentials) = config::env_credentials() {
        return Ok((credentials, false));
    }

    match CredentialsManager::new().load().await {
        Ok(Some(credentials)) => {
            if format.is_text() {
                info!("Using saved credentials");
            }
            return Ok((credentials, false));
        }
        Ok(None) => {}
        Err(e) => warning!("Failed to load saved credentials: {}", e),
    }

    let username = prompt::line("Enter Beatport Username: ")?;
    let password = prompt::password("Enter Beatport Password: ")?;
    Ok((Credentials { username, password }, true))
}

async fn offer_to_save(credentials: &Credentials) {
    let manager = CredentialsManager::new();
    match prompt::confirm(&format!(
        "Do you want to save credentials to {}?",
        manager.path().display()
    )) {
        Ok(true) => match manager.persist(credentials).await {
            Ok(_) => success!("Credentials saved."),
            Err(e) => warning!("Failed to save credentials: {}", e),
        },
        Ok(false) => {}
        Err(e) => warning!("{}", e),
    }
}
