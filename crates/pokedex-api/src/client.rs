use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::cache::DetailsCache;
use crate::error::ApiError;
use crate::traits::PokemonSource;
use crate::types::{PokemonDetails, PokemonListResponse, PokemonSummary};

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/";

const USER_AGENT: &str = concat!("pokedex/", env!("CARGO_PKG_VERSION"));

/// PokéAPI v2 client with a per-URL details memo.
#[derive(Debug)]
pub struct PokeApiClient {
    base_url: Url,
    list_limit: u32,
    http: Client,
    cache: DetailsCache,
}

impl PokeApiClient {
    /// Build a client against `base_url`. Every request is bounded by `timeout`.
    pub fn new(base_url: &str, list_limit: u32, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Self::with_client(base_url, list_limit, http)
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, list_limit: u32, http: Client) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: normalize_base(base_url)?,
            list_limit,
            http,
            cache: DetailsCache::new(),
        })
    }

    pub fn cache(&self) -> &DetailsCache {
        &self.cache
    }

    /// URL of the roster endpoint.
    pub fn list_url(&self) -> Result<Url, ApiError> {
        let mut url = self.base_url.join("pokemon")?;
        url.query_pairs_mut()
            .append_pair("limit", &self.list_limit.to_string())
            .append_pair("offset", "0");
        Ok(url)
    }

    /// Check the HTTP response for errors and keep the status and reason on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let reason = status.canonical_reason().unwrap_or_default().to_string();
            tracing::warn!(status = status.as_u16(), url = %resp.url(), "PokéAPI error");
            Err(ApiError::Status {
                status: status.as_u16(),
                reason,
            })
        }
    }

    async fn fetch_details(&self, url: &str) -> Result<PokemonDetails, ApiError> {
        let resp = self.http.get(url).send().await?;
        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl PokemonSource for PokeApiClient {
    async fn list_pokemon(&self) -> Result<Vec<PokemonSummary>, ApiError> {
        let url = self.list_url()?;
        tracing::debug!(%url, "fetching roster");

        let resp = self.http.get(url).send().await?;
        let resp = Self::check_response(resp).await?;
        let page: PokemonListResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        tracing::info!(count = page.results.len(), "roster loaded");
        Ok(page.results)
    }

    async fn get_details(&self, url: &str) -> Result<Arc<PokemonDetails>, ApiError> {
        if let Some(hit) = self.cache.get(url).await {
            tracing::trace!(url, "details cache hit");
            return Ok(hit);
        }

        tracing::debug!(url, "fetching details");
        let details = self.fetch_details(url).await?;
        Ok(self.cache.insert(url, details).await)
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn normalize_base(base_url: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
