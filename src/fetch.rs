//! Remote catalog client: list and detail retrieval with session caches.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheKey, SessionCache};
use crate::config::Config;
use crate::error::{CatalogError, TransportError};
use crate::models::{DisplayRecord, ListingPage, RawDetail};
use crate::normalize::normalize;
use crate::transport::{HttpTransport, Transport};

enum Lookup {
    Id(u32),
    Name(String),
}

pub struct CatalogClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    lists: SessionCache<Vec<DisplayRecord>>,
    details: SessionCache<RawDetail>,
    // lowercase name -> canonical id, so name lookups share the detail cache
    names: Mutex<HashMap<String, u32>>,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let transport = HttpTransport::new(&config.user_agent)?;
        Ok(Self::with_transport(config.base_url(), Arc::new(transport)))
    }

    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            lists: SessionCache::new(),
            details: SessionCache::new(),
            names: Mutex::new(HashMap::new()),
        }
    }

    pub fn list_url(&self, limit: usize) -> String {
        format!("{}/pokemon?limit={}", self.base_url, limit)
    }

    pub fn detail_url(&self, key: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, key)
    }

    /// Fetch `limit` entries as display records, in listing order.
    ///
    /// A cached batch for the same `limit` is returned as-is without touching
    /// the network. Detail records are requested concurrently and the batch
    /// only succeeds if every one of them does.
    pub async fn fetch_list(&self, limit: usize) -> Result<Arc<Vec<DisplayRecord>>, CatalogError> {
        let key = CacheKey::List(limit);
        if let Some(hit) = self.lists.get(&key) {
            debug!(key = %key, "list cache hit");
            return Ok(hit);
        }

        match self.load_list(limit).await {
            Ok(records) => {
                let records = Arc::new(records);
                self.lists.insert(key, Arc::clone(&records));
                info!(limit, count = records.len(), "catalog listing loaded");
                Ok(records)
            }
            Err(source) => {
                error!(limit, error = %source, "failed to load catalog listing");
                if let Some(hit) = self.lists.get(&key) {
                    warn!(key = %key, "serving cached listing after failure");
                    return Ok(hit);
                }
                Err(CatalogError::CatalogUnavailable {
                    message: "Could not load the catalog. Check your internet connection."
                        .to_string(),
                    source,
                })
            }
        }
    }

    async fn load_list(&self, limit: usize) -> Result<Vec<DisplayRecord>, TransportError> {
        let page: ListingPage = self.get_json(&self.list_url(limit)).await?;

        let lookups: Vec<Lookup> = page
            .results
            .iter()
            .enumerate()
            .map(|(pos, listing)| match listing.identity() {
                Some(id) => Lookup::Id(id),
                None if !listing.name.is_empty() => {
                    warn!(
                        name = %listing.name,
                        url = %listing.url,
                        "listing url carries no id, resolving by name"
                    );
                    Lookup::Name(listing.name.to_lowercase())
                }
                None => {
                    let id = pos as u32 + 1;
                    warn!(url = %listing.url, id, "nameless listing without id, using position");
                    Lookup::Id(id)
                }
            })
            .collect();

        // every request runs to completion and caches its result before the
        // batch is judged; join_all keeps input order
        let settled = join_all(lookups.iter().map(|l| self.resolve_lookup(l))).await;
        let details = settled.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(details.iter().map(|d| normalize(d)).collect())
    }

    async fn resolve_lookup(&self, lookup: &Lookup) -> Result<Arc<RawDetail>, TransportError> {
        match lookup {
            Lookup::Id(id) => self.resolve_id(*id).await,
            Lookup::Name(name) => self.resolve_name(name).await,
        }
    }

    /// Fetch the raw detail record for `id`.
    pub async fn fetch_by_id(&self, id: u32) -> Result<Arc<RawDetail>, CatalogError> {
        match self.resolve_id(id).await {
            Ok(detail) => Ok(detail),
            Err(source) => {
                error!(id, error = %source, "failed to fetch detail");
                if let Some(hit) = self.details.get(&CacheKey::Detail(id)) {
                    return Ok(hit);
                }
                Err(CatalogError::DetailUnavailable {
                    message: format!("Could not load the information for entry {}.", id),
                    source,
                })
            }
        }
    }

    /// Fetch the raw detail record for `name` (case-insensitive).
    pub async fn fetch_by_name(&self, name: &str) -> Result<Arc<RawDetail>, CatalogError> {
        let name = name.to_lowercase();
        match self.resolve_name(&name).await {
            Ok(detail) => Ok(detail),
            Err(source) => {
                error!(name = %name, error = %source, "failed to fetch detail");
                if let Some(hit) = self.cached_by_name(&name) {
                    return Ok(hit);
                }
                Err(CatalogError::DetailUnavailable {
                    message: format!("Could not find entry \"{}\".", name),
                    source,
                })
            }
        }
    }

    /// Raw bytes of an artwork or sprite reference. Not cached here.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.transport.get(url).await
    }

    /// Drop every cached listing and detail record.
    pub fn clear_caches(&self) {
        self.lists.clear();
        self.details.clear();
        self.names.lock().unwrap_or_else(|e| e.into_inner()).clear();
        info!("catalog caches cleared");
    }

    pub fn cached_lists(&self) -> usize {
        self.lists.len()
    }

    pub fn cached_details(&self) -> usize {
        self.details.len()
    }

    async fn resolve_id(&self, id: u32) -> Result<Arc<RawDetail>, TransportError> {
        let key = CacheKey::Detail(id);
        if let Some(hit) = self.details.get(&key) {
            debug!(key = %key, "detail cache hit");
            return Ok(hit);
        }
        let detail: RawDetail = self.get_json(&self.detail_url(&id.to_string())).await?;
        Ok(self.remember(detail, None))
    }

    async fn resolve_name(&self, name: &str) -> Result<Arc<RawDetail>, TransportError> {
        if let Some(hit) = self.cached_by_name(name) {
            debug!(name = %name, "detail cache hit by name");
            return Ok(hit);
        }
        let detail: RawDetail = self.get_json(&self.detail_url(name)).await?;
        Ok(self.remember(detail, Some(name)))
    }

    fn cached_by_name(&self, name: &str) -> Option<Arc<RawDetail>> {
        let id = *self
            .names
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)?;
        self.details.get(&CacheKey::Detail(id))
    }

    /// Store `detail` under its canonical id and index it by name, plus the
    /// name it was requested under when that differs.
    fn remember(&self, detail: RawDetail, requested_as: Option<&str>) -> Arc<RawDetail> {
        let detail = Arc::new(detail);
        let id = detail.id;
        {
            let mut names = self.names.lock().unwrap_or_else(|e| e.into_inner());
            if !detail.name.is_empty() {
                names.insert(detail.name.to_lowercase(), id);
            }
            if let Some(alias) = requested_as {
                names.insert(alias.to_string(), id);
            }
        }
        self.details.insert(CacheKey::Detail(id), Arc::clone(&detail));
        detail
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, TransportError> {
        debug!(url, "GET");
        let body = self.transport.get(url).await?;
        serde_json::from_slice(&body).map_err(|source| TransportError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
            Err(TransportError::Status {
                status: 503,
                url: url.to_string(),
            })
        }
    }

    #[test]
    fn endpoint_urls() {
        let c = CatalogClient::with_transport("http://catalog.test/api/", Arc::new(Unreachable));
        assert_eq!(c.list_url(50), "http://catalog.test/api/pokemon?limit=50");
        assert_eq!(c.detail_url("25"), "http://catalog.test/api/pokemon/25");
        assert_eq!(c.detail_url("pikachu"), "http://catalog.test/api/pokemon/pikachu");
    }

    #[tokio::test]
    async fn detail_failure_is_user_facing() {
        let c = CatalogClient::with_transport("http://catalog.test", Arc::new(Unreachable));
        let err = c.fetch_by_id(7).await.unwrap_err();
        assert!(matches!(err, CatalogError::DetailUnavailable { .. }));
        assert_eq!(err.to_string(), "Could not load the information for entry 7.");
        assert_eq!(err.transport().status(), Some(503));

        let err = c.fetch_by_name("Squirtle").await.unwrap_err();
        assert_eq!(err.to_string(), "Could not find entry \"squirtle\".");
        assert_eq!(c.cached_details(), 0);
    }
}
