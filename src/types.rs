use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

/// Token issued by the authorization-code exchange.
///
/// This is also the on-disk layout of the token cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub refresh_token: String,
    #[serde(default, deserialize_with = "null_default")]
    pub token_type: String,
    #[serde(default, deserialize_with = "null_default")]
    pub scope: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default, deserialize_with = "null_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub slug: String,
}

/// A catalog track. Some entries come without artist data (missing or
/// `null`), so `artists` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub mix_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub artists: Vec<Artist>,
}

/// Treats an explicit `null` like a missing field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Track {
    /// First credited artist, if any.
    pub fn primary_artist(&self) -> Option<&Artist> {
        self.artists.first()
    }

    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingSource {
    /// The genre's top 100 chart.
    TopChart,
    /// Genre-filtered search, used when the chart is unavailable.
    SearchFallback,
}

/// Result of a top tracks query.
///
/// Fallback results approximate the chart; their order is whatever the search
/// endpoint returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedTrackList {
    pub source: RankingSource,
    pub tracks: Vec<Track>,
}

impl RankedTrackList {
    pub fn is_approximate(&self) -> bool {
        self.source == RankingSource::SearchFallback
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub struct GenreResponse {
    pub results: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
pub struct TopTracksResponse {
    pub results: Vec<Track>,
}

#[derive(Debug, Deserialize)]
pub struct SearchTracksResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub tracks: Vec<Track>,
}

#[derive(Tabled)]
pub struct GenreTableRow {
    pub id: u64,
    pub name: String,
    pub slug: String,
}
