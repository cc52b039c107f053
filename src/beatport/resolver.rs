use tracing::{debug, warn};
use url::Url;

use crate::{
    beatport::{Endpoints, RegexExtractor, TextExtractor, Transport},
    error::{Error, Result},
};

/// Discovers the OAuth client id the Beatport web docs use.
///
/// The docs page references a versioned script bundle which embeds the id as
/// `API_CLIENT_ID: '...'`. Candidates are tried in document order and the
/// first id found wins. This depends on the current layout of the docs site;
/// a failure here means no request can be authorized at all.
pub struct ClientIdResolver<'a, S = RegexExtractor, C = RegexExtractor> {
    transport: &'a Transport,
    endpoints: &'a Endpoints,
    scripts: S,
    client_ids: C,
}

impl<'a> ClientIdResolver<'a> {
    pub fn new(transport: &'a Transport, endpoints: &'a Endpoints) -> Self {
        Self {
            transport,
            endpoints,
            scripts: RegexExtractor::script_sources(),
            client_ids: RegexExtractor::client_id(),
        }
    }
}

impl<'a, S: TextExtractor, C: TextExtractor> ClientIdResolver<'a, S, C> {
    /// Uses custom extractors for the script references and the id itself.
    pub fn with_extractors(
        transport: &'a Transport,
        endpoints: &'a Endpoints,
        scripts: S,
        client_ids: C,
    ) -> Self {
        Self {
            transport,
            endpoints,
            scripts,
            client_ids,
        }
    }

    pub async fn resolve(&self) -> Result<String> {
        let docs_url = self.endpoints.docs_url();
        let response = self.transport.send(self.transport.get(&docs_url)).await?;
        let status = response.status();
        let page = response.text().await?;
        debug!(%status, bytes = page.len(), "fetched docs page");

        let candidates = self.scripts.extract(&page);
        if candidates.is_empty() {
            return Err(Error::Scrape(format!(
                "no script reference found on {docs_url} (status {status})"
            )));
        }

        let base = Url::parse(&self.endpoints.api_base)?;
        for candidate in &candidates {
            let script_url = match resolve_asset_url(&base, candidate) {
                Ok(url) => url,
                Err(e) => {
                    warn!(candidate = %candidate, error = %e, "skipping unparsable script reference");
                    continue;
                }
            };

            debug!(%script_url, "scanning script bundle");
            let body = match self.fetch(script_url.as_str()).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(%script_url, error = %e, "cannot fetch script bundle");
                    continue;
                }
            };

            let found = self.client_ids.extract(&body);
            if let Some(client_id) = found.into_iter().find(|id| !id.is_empty()) {
                return Ok(client_id);
            }
        }

        Err(Error::Scrape(format!(
            "none of {} script bundle(s) contains a client id",
            candidates.len()
        )))
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.transport.send(self.transport.get(url)).await?;
        Ok(response.text().await?)
    }
}

/// Resolves a script reference against the scheme and host of `base`.
/// Absolute references are returned unchanged.
pub fn resolve_asset_url(base: &Url, reference: &str) -> Result<Url> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Ok(Url::parse(reference)?);
    }
    Ok(base.join(reference)?)
}
