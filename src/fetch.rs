use crate::config::{Config, FanOut};
use crate::error::CatalogError;
use crate::models::{Detail, ListResponse, NamedResource, Page};
use crate::utils::extract_id_from_url;
use futures::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Substituted when a sprite URL cannot be loaded.
pub const FALLBACK_SPRITE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/0.png";

/// Read-only access to the remote Pokémon catalog.
pub trait Catalog: Send + Sync {
    /// One page of summaries: a list call plus one detail call per entry,
    /// returned in list order.
    fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> impl Future<Output = Result<Page, CatalogError>> + Send;

    fn fetch_by_id(&self, id: u32) -> impl Future<Output = Result<Detail, CatalogError>> + Send;

    /// Names are matched case-insensitively.
    fn fetch_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Detail, CatalogError>> + Send;

    /// Raw image bytes, falling back to a placeholder sprite on failure.
    fn fetch_sprite(&self, url: &str)
        -> impl Future<Output = Result<Vec<u8>, CatalogError>> + Send;
}

/// HTTP implementation of [`Catalog`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    fan_out: FanOut,
    max_concurrency: usize,
    fallback_sprite_url: String,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("dextui/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.base().to_string(),
            fan_out: config.fan_out,
            max_concurrency: config.max_concurrency.max(1),
            fallback_sprite_url: FALLBACK_SPRITE_URL.to_string(),
        })
    }

    pub fn with_fallback_sprite(mut self, url: impl Into<String>) -> Self {
        self.fallback_sprite_url = url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        debug!(url, "GET");
        let res = self.http.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(res.bytes().await?.to_vec())
    }

    async fn fetch_entry(
        &self,
        entry: &NamedResource,
    ) -> (NamedResource, Result<Detail, CatalogError>) {
        (entry.clone(), self.get_json(&entry.url).await)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let bytes = self.get_bytes(url).await?;
        serde_json::from_slice(&bytes).map_err(|source| CatalogError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl Catalog for CatalogClient {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Page, CatalogError> {
        let list_url = format!("{}/pokemon?offset={}&limit={}", self.base_url, offset, limit);
        let list: ListResponse = self.get_json(&list_url).await?;

        // buffered keeps completion order equal to list order
        let requests: Vec<_> = list.results.iter().map(|entry| self.fetch_entry(entry)).collect();
        let details: Vec<_> = stream::iter(requests)
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let listed = details.len();
        let mut items = Vec::with_capacity(listed);
        for (entry, result) in details {
            match result {
                Ok(detail) => {
                    let mut summary = detail.to_summary(&self.base_url);
                    if summary.id == 0 {
                        summary.id = extract_id_from_url(&entry.url);
                    }
                    items.push(summary);
                }
                Err(e) if self.fan_out == FanOut::Lenient => {
                    warn!(name = %entry.name, error = %e, "skipping entry that failed to load");
                }
                Err(e) => return Err(e),
            }
        }
        info!(offset, limit, listed, loaded = items.len(), "page fetched");
        Ok(Page { items, listed })
    }

    async fn fetch_by_id(&self, id: u32) -> Result<Detail, CatalogError> {
        self.get_json(&format!("{}/pokemon/{}", self.base_url, id)).await
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Detail, CatalogError> {
        let name = name.trim().to_lowercase();
        self.get_json(&format!("{}/pokemon/{}", self.base_url, name)).await
    }

    async fn fetch_sprite(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        match self.get_bytes(url).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                warn!(url, error = %e, "sprite unavailable, using fallback");
                self.get_bytes(&self.fallback_sprite_url).await
            }
        }
    }
}
