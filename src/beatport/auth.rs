use reqwest::{StatusCode, header::LOCATION};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    beatport::{ClientIdResolver, Endpoints, Transport, transport::read_json},
    error::{Error, Result},
    management::TokenManager,
    types::{Credentials, OAuthToken},
};

/// Field the login endpoint echoes back on success.
const ACCOUNT_FIELD: &str = "username";

/// Browser-style authorization-code flow against the Beatport auth server.
///
/// 1. A cached token short-circuits the whole flow without any request.
/// 2. Login posts the credentials as JSON; the session cookie lands in the
///    shared jar.
/// 3. Authorize requests a code without following the redirect and reads it
///    from the `Location` header.
/// 4. The code is exchanged for a token, which is persisted.
///
/// Any failing step aborts the flow. A cached token that has expired is only
/// noticed when a catalog request is rejected.
pub struct Authenticator<'a> {
    transport: &'a Transport,
    endpoints: &'a Endpoints,
    tokens: &'a TokenManager,
    client_id: Option<String>,
}

impl<'a> Authenticator<'a> {
    pub fn new(transport: &'a Transport, endpoints: &'a Endpoints, tokens: &'a TokenManager) -> Self {
        Self {
            transport,
            endpoints,
            tokens,
            client_id: None,
        }
    }

    /// Uses a known client id instead of scraping one.
    pub fn with_client_id(mut self, client_id: Option<String>) -> Self {
        self.client_id = client_id.filter(|id| !id.is_empty());
        self
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Token from the store, if one was saved by an earlier run.
    pub async fn cached_token(&self) -> Result<Option<OAuthToken>> {
        self.tokens.load().await
    }

    pub async fn authenticate(&mut self, credentials: &Credentials) -> Result<OAuthToken> {
        if let Some(token) = self.cached_token().await? {
            debug!("using cached token");
            return Ok(token);
        }

        self.login(credentials).await?;
        debug!("logged in");

        let code = self.authorize().await?;
        debug!("authorization code obtained");

        let token = self.exchange_code(&code).await?;
        info!("authenticated");
        Ok(token)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        let request = self
            .transport
            .post(&self.endpoints.login_url())
            .json(credentials);
        let response = self.transport.send(request).await?;
        let body = response.text().await?;

        // Bad credentials come back as a 200 with an error object.
        match serde_json::from_str::<Value>(&body) {
            Ok(json) if json.get(ACCOUNT_FIELD).is_some() => Ok(()),
            _ => Err(Error::Login { body }),
        }
    }

    pub async fn authorize(&mut self) -> Result<String> {
        let client_id = match &self.client_id {
            Some(id) => id.clone(),
            None => {
                let id = ClientIdResolver::new(self.transport, self.endpoints)
                    .resolve()
                    .await?;
                self.client_id = Some(id.clone());
                id
            }
        };

        let redirect_uri = self.endpoints.redirect_uri();
        let request = self
            .transport
            .get_without_redirects(&self.endpoints.authorize_url())
            .query(&[
                ("response_type", "code"),
                ("client_id", client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
            ]);
        let response = self.transport.send(request).await?;
        let status = response.status();

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let Some(location) = location else {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::MissingLocation { status, body });
        };

        extract_code(response.url(), &location)
    }

    pub async fn exchange_code(&self, code: &str) -> Result<OAuthToken> {
        let client_id = self.client_id.clone().unwrap_or_default();
        let redirect_uri = self.endpoints.redirect_uri();
        let request = self.transport.post(&self.endpoints.token_url()).form(&[
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri.as_str()),
            ("client_id", client_id.as_str()),
        ]);
        let response = self.transport.send(request).await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenExchange { status, body });
        }

        let token: OAuthToken = read_json(response).await?;
        if let Err(e) = self.tokens.persist(&token).await {
            // The fresh token is still good for this run.
            warn!(error = %e, "failed to save token");
        }
        Ok(token)
    }
}

/// Reads the `code` query parameter from a redirect location, which may be
/// relative to the authorize request.
pub fn extract_code(request_url: &Url, location: &str) -> Result<String> {
    let target = match Url::parse(location) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => request_url.join(location)?,
        Err(_) => {
            return Err(Error::MissingCode {
                location: location.to_string(),
            });
        }
    };

    target
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.into_owned())
        .filter(|code| !code.is_empty())
        .ok_or_else(|| Error::MissingCode {
            location: location.to_string(),
        })
}
