use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::{
    beatport::{Endpoints, Transport, transport::read_json},
    error::{Error, Result},
    types::{
        Genre, GenreResponse, OAuthToken, RankedTrackList, RankingSource, SearchTracksResponse,
        TopTracksResponse,
    },
};

/// Page size used for every catalog listing.
pub const PAGE_SIZE: u32 = 100;

/// When the genre chart may be replaced by a genre-filtered search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Only a 404 from the chart endpoint triggers the search.
    #[default]
    NotFoundOnly,
    /// Any non-200 from the chart endpoint triggers the search.
    AnyFailure,
}

impl FallbackPolicy {
    fn applies_to(&self, status: StatusCode) -> bool {
        match self {
            FallbackPolicy::NotFoundOnly => status == StatusCode::NOT_FOUND,
            FallbackPolicy::AnyFailure => status != StatusCode::OK,
        }
    }
}

/// Authenticated read access to the catalog.
pub struct CatalogClient<'a> {
    transport: &'a Transport,
    endpoints: &'a Endpoints,
    token: &'a OAuthToken,
    fallback: FallbackPolicy,
}

impl<'a> CatalogClient<'a> {
    pub fn new(transport: &'a Transport, endpoints: &'a Endpoints, token: &'a OAuthToken) -> Self {
        Self {
            transport,
            endpoints,
            token,
            fallback: FallbackPolicy::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub async fn list_genres(&self) -> Result<Vec<Genre>> {
        let request = self
            .transport
            .get(&self.endpoints.genres_url())
            .query(&[("per_page", PAGE_SIZE)]);
        let response = self.send(request).await?;

        let response = ensure_ok(response, "genres").await?;
        let genres: GenreResponse = read_json(response).await?;
        Ok(genres.results)
    }

    /// Fetches the top tracks of a genre.
    ///
    /// The chart endpoint is undocumented and may be missing. In that case a
    /// search filtered by genre is used instead; its result is flagged as
    /// [`RankingSource::SearchFallback`] and its errors are the ones reported.
    pub async fn top_tracks(&self, genre_id: u64) -> Result<RankedTrackList> {
        let request = self
            .transport
            .get(&self.endpoints.top_tracks_url(genre_id))
            .query(&[("per_page", PAGE_SIZE)]);
        let response = self.send(request).await?;

        let status = response.status();
        if status == StatusCode::OK {
            let chart: TopTracksResponse = read_json(response).await?;
            return Ok(RankedTrackList {
                source: RankingSource::TopChart,
                tracks: chart.results,
            });
        }

        if !self.fallback.applies_to(status) {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Query {
                context: "top 100",
                status,
                body,
            });
        }

        warn!(genre_id, %status, "top 100 unavailable, falling back to search");
        self.search_by_genre(genre_id).await
    }

    async fn search_by_genre(&self, genre_id: u64) -> Result<RankedTrackList> {
        let query = format!("genre_id:{genre_id}");
        let per_page = PAGE_SIZE.to_string();
        let request = self.transport.get(&self.endpoints.search_url()).query(&[
            ("q", query.as_str()),
            ("per_page", per_page.as_str()),
            ("type", "tracks"),
        ]);
        let response = self.send(request).await?;

        let response = ensure_ok(response, "top 100 (fallback)").await?;
        let search: SearchTracksResponse = read_json(response).await?;
        debug!(genre_id, tracks = search.tracks.len(), "fallback search done");
        Ok(RankedTrackList {
            source: RankingSource::SearchFallback,
            tracks: search.tracks,
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        self.transport
            .send(request.bearer_auth(&self.token.access_token))
            .await
    }
}

async fn ensure_ok(response: Response, context: &'static str) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Query {
        context,
        status,
        body,
    })
}
