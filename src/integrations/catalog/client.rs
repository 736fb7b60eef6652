// src/integrations/catalog/client.rs
//
// Catalog API Integration
//
// ARCHITECTURE:
// - REST client for the catalog's JSON API
// - Every endpoint answers `{ "response": ..., "error": ... }`
// - Maps wire data to domain values (ApiAnime, VideoEntry), nothing more
// - Used by CatalogService through the CatalogApi trait
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - No reconciliation here: videos are returned exactly as received
// - No retries

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::CatalogConfig;
use crate::domain::anime::{AnimeId, ApiAnime};
use crate::domain::video::VideoEntry;
use crate::error::{AppError, AppResult};

/// The API rejects search limits outside 0-30; 0 is useless, so 1-30.
pub const SEARCH_LIMIT_MIN: u32 = 1;
pub const SEARCH_LIMIT_MAX: u32 = 30;

pub fn clamp_search_limit(limit: u32) -> u32 {
    limit.clamp(SEARCH_LIMIT_MIN, SEARCH_LIMIT_MAX)
}

/// Read access to the remote catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Front-page title list
    async fn list_anime(&self) -> AppResult<Vec<ApiAnime>>;

    /// A single title; `None` when the API reports an error or has no such title
    async fn get_anime(&self, anime_id: AnimeId) -> AppResult<Option<ApiAnime>>;

    /// Raw, unreconciled videos of a title
    async fn list_videos(&self, anime_id: AnimeId) -> AppResult<Vec<VideoEntry>>;

    /// Title search; `limit` is clamped to 1-30
    async fn search(&self, query: &str, limit: u32, offset: u32) -> AppResult<Vec<ApiAnime>>;
}

/// Response envelope shared by all endpoints
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: Option<T>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// HTTP implementation of [`CatalogApi`]
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    http_client: Client,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // INTERNAL: Request Execution
    // ========================================================================

    /// GET `path` (relative to the base URL) and decode the envelope.
    ///
    /// Error statuses are tolerated as long as the body is an envelope, since
    /// the API reports unknown titles that way.
    async fn fetch<T>(&self, path: &str) -> AppResult<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(envelope) => {
                if let Some(error) = &envelope.error {
                    log::warn!("Catalog API error for {}: {}", path, error);
                }
                Ok(envelope)
            }
            Err(_) if !status.is_success() => Err(AppError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            }),
            Err(e) => Err(AppError::Other(format!(
                "Failed to parse catalog response for {}: {}",
                path, e
            ))),
        }
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn list_anime(&self) -> AppResult<Vec<ApiAnime>> {
        let envelope: Envelope<Vec<ApiAnime>> = self.fetch("/anime/").await?;
        Ok(envelope.response.unwrap_or_default())
    }

    async fn get_anime(&self, anime_id: AnimeId) -> AppResult<Option<ApiAnime>> {
        let envelope: Envelope<ApiAnime> = self.fetch(&format!("/anime/{}", anime_id)).await?;
        if envelope.error.is_some() {
            return Ok(None);
        }
        Ok(envelope.response)
    }

    async fn list_videos(&self, anime_id: AnimeId) -> AppResult<Vec<VideoEntry>> {
        let envelope: Envelope<Vec<VideoEntry>> =
            self.fetch(&format!("/anime/{}/videos", anime_id)).await?;
        let videos = envelope.response.unwrap_or_default();
        log::info!("Fetched {} raw videos for title {}", videos.len(), anime_id);
        Ok(videos)
    }

    async fn search(&self, query: &str, limit: u32, offset: u32) -> AppResult<Vec<ApiAnime>> {
        let path = format!(
            "/search?q={}&limit={}&offset={}",
            urlencoding::encode(query),
            clamp_search_limit(limit),
            offset
        );

        let envelope: Envelope<Vec<ApiAnime>> = self.fetch(&path).await?;
        if envelope.error.is_some() {
            return Ok(Vec::new());
        }
        Ok(envelope.response.unwrap_or_default())
    }
}
