//! Materializes a version (and any version it inherits from) on disk:
//! spec file, client jar, libraries, asset index and objects, log config.

pub mod core;
pub mod types;

#[cfg(test)]
mod tests;

use crate::config::LauncherSettings;
use crate::error::{LauncherError, LauncherResult};
use crate::game::installer::core::batch::{BatchArtifact, BatchDownloader};
use crate::game::installer::core::downloader::{ensure_downloaded, read_or_download};
use crate::game::installer::core::library::resolve_library;
use crate::game::installer::core::traits::VersionSource;
use crate::game::layout::{asset_prefix, check_asset_hash, check_file_name, DataLayout};
use crate::game::metadata::types::VersionDescriptor;
use crate::game::rules::RuleEvaluator;
use crate::models::version::{AssetIndex, VersionSpec};
use futures::future::BoxFuture;
use reqwest::Client;
use std::sync::Arc;
use types::{ProgressReporter, SilentProgressReporter};

/// Oldest spec schema (`minimumLauncherVersion`) this installer understands.
pub const MIN_LAUNCHER_VERSION: u32 = 21;
/// Newest spec schema this installer understands.
pub const MAX_LAUNCHER_VERSION: u32 = 21;

/// Reject specs declaring a schema outside the supported range. Loader specs
/// leave the field out (0) and always pass.
pub fn check_schema(spec: &VersionSpec) -> LauncherResult<()> {
    let version = spec.schema_version();
    if version != 0 && !(MIN_LAUNCHER_VERSION..=MAX_LAUNCHER_VERSION).contains(&version) {
        return Err(LauncherError::UnsupportedSchema {
            version,
            min: MIN_LAUNCHER_VERSION,
            max: MAX_LAUNCHER_VERSION,
        });
    }
    Ok(())
}

pub struct Installer {
    layout: DataLayout,
    client: Client,
    rules: RuleEvaluator,
    versions: Arc<dyn VersionSource>,
    asset_base_url: String,
    asset_concurrency: usize,
    reporter: Arc<dyn ProgressReporter>,
}

impl Installer {
    pub fn new(
        layout: DataLayout,
        settings: &LauncherSettings,
        client: Client,
        rules: RuleEvaluator,
        versions: Arc<dyn VersionSource>,
    ) -> Self {
        Self {
            layout,
            client,
            rules,
            versions,
            asset_base_url: settings.asset_base_url.trim_end_matches('/').to_string(),
            asset_concurrency: settings.asset_concurrency,
            reporter: Arc::new(SilentProgressReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Install a version, installing the version it inherits from first.
    pub fn install<'a>(
        &'a self,
        descriptor: &'a VersionDescriptor,
    ) -> BoxFuture<'a, LauncherResult<()>> {
        Box::pin(async move {
            let result = self.install_chain(descriptor, Vec::new()).await;
            match &result {
                Ok(()) => self
                    .reporter
                    .done(true, Some(&format!("Installed {}", descriptor.id))),
                Err(e) => self.reporter.done(false, Some(&e.to_string())),
            }
            result
        })
    }

    fn install_chain<'a>(
        &'a self,
        descriptor: &'a VersionDescriptor,
        mut chain: Vec<String>,
    ) -> BoxFuture<'a, LauncherResult<()>> {
        Box::pin(async move {
            if chain.contains(&descriptor.id) {
                return Err(LauncherError::InheritanceCycle {
                    id: descriptor.id.clone(),
                    chain: chain.join(" -> "),
                });
            }
            chain.push(descriptor.id.clone());

            let spec = self.fetch_spec(descriptor).await?;
            check_schema(&spec)?;

            if let Some(parent) = spec.inherits_from.as_deref() {
                log::info!("{} inherits from {}, installing it first", spec.id, parent);
                let base = self.versions.find_base(parent).await?;
                self.install_chain(&base, chain).await?;
            }

            self.install_from_spec(&spec).await
        })
    }

    /// Read `versions/{id}/{id}.json`, downloading it when missing.
    pub async fn fetch_spec(&self, descriptor: &VersionDescriptor) -> LauncherResult<VersionSpec> {
        check_file_name("version id", &descriptor.id)?;
        let path = self.layout.version_spec_path(&descriptor.id);
        self.reporter
            .start_step(&format!("Fetching version spec {}", descriptor.id), None);

        let bytes = read_or_download(
            &self.client,
            &descriptor.source_url,
            &path,
            descriptor.sha1.as_deref(),
        )
        .await
        .map_err(|e| e.for_artifact(format!("version spec {}", descriptor.id)))?;

        VersionSpec::from_json(&bytes, &path.display().to_string())
    }

    /// Install the artifacts of a single spec, without following `inheritsFrom`.
    pub async fn install_from_spec(&self, spec: &VersionSpec) -> LauncherResult<()> {
        check_schema(spec)?;
        check_file_name("version id", &spec.id)?;
        log::info!("Installing {}", spec.id);

        self.install_client(spec).await?;
        self.install_libraries(spec).await?;
        self.install_assets(spec).await?;
        self.install_log_config(spec).await?;

        log::info!("Installed {}", spec.id);
        Ok(())
    }

    async fn install_client(&self, spec: &VersionSpec) -> LauncherResult<()> {
        let Some(client) = spec.client_download() else {
            return Ok(());
        };
        self.reporter.start_step("Downloading client", None);
        let path = self.layout.version_jar_path(&spec.id);
        ensure_downloaded(&self.client, &client.url, &path, client.expected_sha1())
            .await
            .map_err(|e| e.for_artifact(format!("client jar {}", spec.id)))?;
        Ok(())
    }

    /// Libraries are processed one at a time, in declaration order.
    async fn install_libraries(&self, spec: &VersionSpec) -> LauncherResult<()> {
        let included: Vec<_> = spec
            .libraries
            .iter()
            .filter(|lib| self.rules.allows(&lib.rules))
            .collect();

        let total = included.len() as u32;
        self.reporter.start_step("Downloading libraries", Some(total));

        for (index, library) in included.into_iter().enumerate() {
            let Some(resolved) = resolve_library(library)? else {
                continue;
            };
            self.reporter
                .set_message(&format!("Downloading {}", resolved.name));

            let path = self.layout.library_path(&resolved.path);
            ensure_downloaded(&self.client, &resolved.url, &path, resolved.sha1.as_deref())
                .await
                .map_err(|e| e.for_artifact(format!("library {}", resolved.name)))?;

            self.reporter.set_step_count(index as u32 + 1, Some(total));
        }
        Ok(())
    }

    async fn install_assets(&self, spec: &VersionSpec) -> LauncherResult<()> {
        let Some(index_ref) = &spec.asset_index else {
            return Ok(());
        };

        check_file_name("asset index id", &index_ref.id)?;
        self.reporter
            .start_step(&format!("Fetching asset index {}", index_ref.id), None);
        let index_path = self.layout.asset_index_path(&index_ref.id);
        let bytes = read_or_download(
            &self.client,
            &index_ref.download.url,
            &index_path,
            index_ref.download.expected_sha1(),
        )
        .await
        .map_err(|e| e.for_artifact(format!("asset index {}", index_ref.id)))?;
        let index: AssetIndex = serde_json::from_slice(&bytes)
            .map_err(|e| LauncherError::decode(index_path.display().to_string(), e))?;
        // The whole index is checked before anything is scheduled.
        for object in index.objects.values() {
            check_asset_hash(&object.hash)?;
        }

        let artifacts: Vec<BatchArtifact> = index
            .objects
            .iter()
            .map(|(name, object)| BatchArtifact {
                name: name.clone(),
                url: format!(
                    "{}/{}/{}",
                    self.asset_base_url,
                    asset_prefix(&object.hash),
                    object.hash
                ),
                path: self.layout.asset_object_path(&object.hash),
                sha1: Some(object.hash.clone()),
            })
            .collect();

        self.reporter.start_step(
            &format!("Downloading assets ({} bytes)", index_ref.total_size),
            Some(artifacts.len() as u32),
        );

        let summary = BatchDownloader::new(self.client.clone(), self.asset_concurrency)
            .download_all(artifacts, self.reporter.clone())
            .await?;
        log::info!(
            "Assets for {}: {} downloaded, {} already present",
            index_ref.id,
            summary.downloaded,
            summary.skipped
        );
        Ok(())
    }

    async fn install_log_config(&self, spec: &VersionSpec) -> LauncherResult<()> {
        let Some(logging) = spec.client_logging() else {
            return Ok(());
        };
        let file = &logging.file;
        check_file_name("log config id", &file.id)?;
        let path = self.layout.log_config_path(&file.id);
        ensure_downloaded(&self.client, &file.download.url, &path, file.download.expected_sha1())
            .await
            .map_err(|e| e.for_artifact(format!("log config {}", file.id)))?;
        Ok(())
    }
}
