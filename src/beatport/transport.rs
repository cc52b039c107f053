use std::{sync::Arc, time::Duration};

use reqwest::{Client, RequestBuilder, Response, cookie::Jar, redirect};
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Per-attempt timeout. Not cumulative across retries.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cookie-bearing HTTP session.
///
/// Holds one cookie jar and two clients built on top of it, so cookies set
/// by a request on one client are sent by the other. The redirect-less
/// client is used where the flow needs to read a `Location` header itself.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    no_redirect: Client,
}

impl Session {
    pub fn new() -> Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let jar = Arc::new(Jar::default());

        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(timeout)
            .build()?;
        let no_redirect = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .redirect(redirect::Policy::none())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            no_redirect,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn client_without_redirects(&self) -> &Client {
        &self.no_redirect
    }
}

/// Bounded exponential backoff.
///
/// Attempt `0` is sent immediately; attempt `i` waits `base_delay * 2^i`.
/// With the defaults that is 2s, 4s and 8s before attempts 2 to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay applied before `attempt` (0-based). Zero for the first attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    /// Full backoff schedule between attempts.
    pub fn schedule(&self) -> Vec<Duration> {
        (1..self.max_attempts()).map(|a| self.delay_for(a)).collect()
    }
}

/// Sends requests over a [`Session`] and retries transport failures and
/// server errors according to a [`RetryPolicy`].
///
/// Successful and 4xx responses are handed back after a single attempt;
/// deciding what a 4xx means is up to the caller.
#[derive(Debug, Clone)]
pub struct Transport {
    session: Session,
    policy: RetryPolicy,
}

impl Transport {
    pub fn new(session: Session, policy: RetryPolicy) -> Self {
        Self { session, policy }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.session.client().get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.session.client().post(url)
    }

    /// GET that hands back redirects instead of following them.
    pub fn get_without_redirects(&self, url: &str) -> RequestBuilder {
        self.session.client_without_redirects().get(url)
    }

    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let mut last_error: Option<Error> = None;

        for attempt in 0..self.policy.max_attempts() {
            if attempt > 0 {
                let delay = self.policy.delay_for(attempt);
                warn!(attempt = attempt + 1, ?delay, "retrying request");
                sleep(delay).await;
            }

            let Some(req) = request.try_clone() else {
                return Err(Error::UnclonableRequest);
            };

            match req.send().await {
                Ok(response) if !response.status().is_server_error() => {
                    debug!(
                        url = %response.url(),
                        status = %response.status(),
                        attempt = attempt + 1,
                        "request completed"
                    );
                    return Ok(response);
                }
                Ok(response) => {
                    let status = response.status();
                    debug!(
                        url = %response.url(),
                        %status,
                        attempt = attempt + 1,
                        "server error"
                    );
                    let body = response.text().await.unwrap_or_default();
                    last_error = Some(Error::RetriesExhausted {
                        attempts: attempt + 1,
                        status,
                        body,
                    });
                }
                Err(err) => {
                    debug!(error = %err, attempt = attempt + 1, "request failed");
                    last_error = Some(Error::Transport(err));
                }
            }
        }

        Err(last_error.unwrap_or(Error::UnclonableRequest))
    }
}

/// Reads the body and decodes it as JSON. A malformed body is an
/// [`Error::Decode`], not a transport failure.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
