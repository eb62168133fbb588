use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use tracing::debug;

use crate::config::ServiceSettings;

use super::types::{SearchHit, SongDetail, parse_search, parse_song_detail};
use super::{ServiceError, SongService};

/// Error bodies are echoed into logs; keep them short.
const MAX_ERROR_BODY: usize = 200;

/// Blocking Genius API client authenticated with a bearer token.
pub struct GeniusClient {
    http: Client,
    base_url: String,
    token: String,
}

impl GeniusClient {
    pub fn new(settings: &ServiceSettings, token: &str) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn song_url(&self, api_path: &str) -> Result<String, ServiceError> {
        if !api_path.starts_with('/') || api_path.contains("..") {
            return Err(ServiceError::BadReference(api_path.to_string()));
        }
        Ok(format!("{}{}", self.base_url, api_path))
    }

    fn send(&self, request: RequestBuilder) -> Result<String, ServiceError> {
        let response = request.bearer_auth(&self.token).send()?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ServiceError::Unauthorized(status.as_u16()));
        }

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        Ok(response.text()?)
    }
}

impl SongService for GeniusClient {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, ServiceError> {
        let url = format!("{}/search", self.base_url);
        debug!(%url, %query, "Searching Genius");

        let body = self.send(self.http.get(&url).query(&[("q", query)]))?;
        parse_search(&body)
    }

    fn song_detail(&self, api_path: &str) -> Result<SongDetail, ServiceError> {
        let url = self.song_url(api_path)?;
        debug!(%url, "Fetching song");

        let body = self.send(self.http.get(&url))?;
        parse_song_detail(&body)
    }
}
