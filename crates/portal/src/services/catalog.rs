//! Consultation package catalog.
//!
//! The package list is the same for every visitor, so it is cached for
//! 5 minutes using `moka`.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use crate::api::types::Package;
use crate::api::{ApiClient, ApiError};

const PACKAGES_KEY: &str = "packages";

/// Cached view of `GET /packages`.
#[derive(Clone)]
pub struct Catalog {
    api: ApiClient,
    cache: Cache<&'static str, Arc<Vec<Package>>>,
}

impl Catalog {
    /// Create a catalog backed by the given client.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self { api, cache }
    }

    /// All packages on offer.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is not cached and the backend call fails.
    /// Failures are not cached.
    pub async fn packages(&self, credentials: Option<&str>) -> Result<Arc<Vec<Package>>, ApiError> {
        if let Some(packages) = self.cache.get(PACKAGES_KEY).await {
            debug!("Cache hit for packages");
            return Ok(packages);
        }

        let packages: Vec<Package> = self.api.get("packages", credentials).await?;
        let packages = Arc::new(packages);
        self.cache.insert(PACKAGES_KEY, Arc::clone(&packages)).await;
        Ok(packages)
    }

    /// Look up one package by id.
    ///
    /// # Errors
    ///
    /// See [`Catalog::packages`].
    pub async fn find(
        &self,
        id: &str,
        credentials: Option<&str>,
    ) -> Result<Option<Package>, ApiError> {
        let packages = self.packages(credentials).await?;
        Ok(packages.iter().find(|p| p.id == id).cloned())
    }
}
