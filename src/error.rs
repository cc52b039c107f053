//! Error taxonomy for the Beatport integration.
//!
//! Every failure is fatal to the operation that raised it. Only the transport
//! retries, and only on connection failures and 5xx responses; none of the
//! semantic failures below (bad credentials, missing code, bad status) are
//! ever retried.

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network failure or timeout of the last attempt.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Every attempt got a 5xx. Carries the last response body.
    #[error("request failed after {attempts} attempts, last status {status}: {body}")]
    RetriesExhausted {
        attempts: u32,
        status: StatusCode,
        body: String,
    },

    #[error("request cannot be cloned for retrying")]
    UnclonableRequest,

    /// The OAuth client id could not be scraped from the docs page.
    #[error("could not fetch API_CLIENT_ID: {0}")]
    Scrape(String),

    /// The login endpoint answered without echoing the account.
    #[error("login failed: {body}")]
    Login { body: String },

    #[error("authorization failed, no location header (status {status}). Body: {body}")]
    MissingLocation { status: StatusCode, body: String },

    #[error("authorization failed, no code in location: {location}")]
    MissingCode { location: String },

    #[error("failed to get token (status {status}): {body}")]
    TokenExchange { status: StatusCode, body: String },

    /// Non-200 from a catalog endpoint. Does not invalidate the token.
    #[error("failed to get {context} (status {status}): {body}")]
    Query {
        context: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, Error>;
