use serde::Deserialize;

use super::ServiceError;

/// Every Genius payload is wrapped as `{"meta": {...}, "response": {...}}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    result: SearchHit,
}

#[derive(Debug, Deserialize)]
struct SongResponse {
    song: SongDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    /// Opaque song reference, e.g. `/songs/2396`.
    pub api_path: String,
    #[serde(default)]
    pub full_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProducerCredit {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SongDetail {
    #[serde(default)]
    pub full_title: Option<String>,
    #[serde(rename = "producer_artists")]
    pub producer_credits: Vec<ProducerCredit>,
}

pub fn parse_search(body: &str) -> Result<Vec<SearchHit>, ServiceError> {
    let envelope: Envelope<SearchResponse> = serde_json::from_str(body)?;
    Ok(envelope
        .response
        .hits
        .into_iter()
        .map(|hit| hit.result)
        .collect())
}

pub fn parse_song_detail(body: &str) -> Result<SongDetail, ServiceError> {
    let envelope: Envelope<SongResponse> = serde_json::from_str(body)?;
    Ok(envelope.response.song)
}
