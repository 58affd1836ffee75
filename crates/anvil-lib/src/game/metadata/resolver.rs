use super::cache::{load_cached_manifest, save_manifest};
use super::fetcher::fetch_manifest;
use super::types::{VersionDescriptor, VersionManifestCache};
use crate::config::{http_client, LauncherSettings};
use crate::error::{LauncherError, LauncherResult, MissingKind};
use crate::game::installer::core::traits::VersionSource;
use crate::game::layout::DataLayout;
use chrono::Duration;
use futures::future::BoxFuture;
use reqwest::Client;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// How many manifest refreshes a single lookup may trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    refreshes: u32,
}

impl RetryBudget {
    /// One refresh, then a miss is final.
    pub fn once() -> Self {
        Self { refreshes: 1 }
    }

    /// Lookup against the cached document only.
    pub fn none() -> Self {
        Self { refreshes: 0 }
    }

    fn try_consume(&mut self) -> bool {
        if self.refreshes == 0 {
            return false;
        }
        self.refreshes -= 1;
        true
    }
}

/// Resolves version names against the cached manifest, refreshing it from
/// the upstream feeds when a name is unknown.
pub struct VersionResolver {
    cache_path: PathBuf,
    client: Client,
    settings: LauncherSettings,
    manifest: RwLock<VersionManifestCache>,
}

impl VersionResolver {
    /// Load the cache from disk, fetching it when missing or unreadable.
    pub async fn open(layout: &DataLayout, settings: &LauncherSettings) -> LauncherResult<Self> {
        let client = http_client(settings)?;
        Self::open_with_client(layout, settings, client).await
    }

    pub async fn open_with_client(
        layout: &DataLayout,
        settings: &LauncherSettings,
        client: Client,
    ) -> LauncherResult<Self> {
        let cache_path = layout.manifest_cache_path();

        let cached = if cache_path.exists() {
            match load_cached_manifest(&cache_path).await {
                Ok(manifest) => Some(manifest),
                Err(e) => {
                    log::warn!("Failed to load cached version manifest: {}, fetching fresh...", e);
                    None
                }
            }
        } else {
            log::info!("No cached version manifest found, fetching fresh...");
            None
        };

        let resolver = Self {
            cache_path,
            client,
            settings: settings.clone(),
            manifest: RwLock::new(cached.clone().unwrap_or_default()),
        };

        match cached {
            None => resolver.refresh_manifest().await?,
            Some(manifest) => {
                let age = manifest.age();
                if age > Duration::hours(settings.manifest_max_age_hours) {
                    log::info!(
                        "Cached version manifest is stale (age: {} hours), refreshing...",
                        age.num_hours()
                    );
                    if let Err(e) = resolver.refresh_manifest().await {
                        log::warn!("Refresh failed, keeping stale version manifest: {}", e);
                    }
                } else {
                    log::info!("Using cached version manifest (age: {} hours)", age.num_hours());
                }
            }
        }

        Ok(resolver)
    }

    /// Re-fetch every feed and replace the cache file. The file is only
    /// touched once all feeds were fetched successfully.
    pub async fn refresh_manifest(&self) -> LauncherResult<()> {
        let deadline = self.settings.refresh_deadline();
        let fresh = tokio::time::timeout(deadline, fetch_manifest(&self.client, &self.settings.feeds))
            .await
            .map_err(|_| LauncherError::Timeout {
                operation: "version manifest refresh",
                secs: deadline.as_secs(),
            })??;

        save_manifest(&self.cache_path, &fresh)?;
        *self.manifest.write().await = fresh;
        Ok(())
    }

    /// Copy of the current cache document.
    pub async fn manifest(&self) -> VersionManifestCache {
        self.manifest.read().await.clone()
    }

    pub async fn latest_release(&self) -> String {
        self.manifest.read().await.base_versions.release.clone()
    }

    pub async fn latest_snapshot(&self) -> String {
        self.manifest.read().await.base_versions.snapshot.clone()
    }

    /// First stable loader build, if any is known.
    pub async fn default_loader(&self) -> Option<String> {
        let manifest = self.manifest.read().await;
        let loader = &manifest.loader_versions.default_loader;
        (!loader.is_empty()).then(|| loader.clone())
    }

    pub async fn find_base(&self, name: &str) -> LauncherResult<VersionDescriptor> {
        self.find_base_with(name, RetryBudget::once()).await
    }

    pub async fn find_base_with(
        &self,
        name: &str,
        mut budget: RetryBudget,
    ) -> LauncherResult<VersionDescriptor> {
        loop {
            if let Some(found) = self.manifest.read().await.base(name) {
                return Ok(found.clone());
            }
            if !budget.try_consume() {
                return Err(LauncherError::not_found(MissingKind::Version, name));
            }
            log::info!("Couldn't find version {}, refreshing manifest", name);
            self.refresh_manifest().await?;
        }
    }

    pub async fn find_loader_variant(
        &self,
        name: &str,
        loader_version: &str,
    ) -> LauncherResult<VersionDescriptor> {
        self.find_loader_variant_with(name, loader_version, RetryBudget::once())
            .await
    }

    /// The loader must already be known; only the game version lookup may
    /// trigger a refresh.
    pub async fn find_loader_variant_with(
        &self,
        name: &str,
        loader_version: &str,
        mut budget: RetryBudget,
    ) -> LauncherResult<VersionDescriptor> {
        if !self.manifest.read().await.has_loader(loader_version) {
            return Err(LauncherError::not_found(MissingKind::Loader, loader_version));
        }

        loop {
            if let Some(template) = self.manifest.read().await.loader_template(name) {
                return Ok(template.expand(loader_version));
            }
            if !budget.try_consume() {
                return Err(LauncherError::not_found(MissingKind::Version, name));
            }
            log::info!("Couldn't find loader support for {}, refreshing manifest", name);
            self.refresh_manifest().await?;
        }
    }
}

impl VersionSource for VersionResolver {
    fn find_base<'a>(&'a self, name: &'a str) -> BoxFuture<'a, LauncherResult<VersionDescriptor>> {
        Box::pin(VersionResolver::find_base(self, name))
    }
}
