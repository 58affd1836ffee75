use crate::error::{ArtifactFailure, LauncherError, LauncherResult};
use crate::game::installer::core::downloader::{ensure_downloaded, DownloadOutcome};
use crate::game::installer::types::ProgressReporter;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub struct BatchArtifact {
    pub name: String,
    pub url: String,
    pub path: PathBuf,
    pub sha1: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub downloaded: usize,
    pub skipped: usize,
}

/// Downloads a flat set of independent artifacts with at most `concurrency`
/// requests in flight. Every artifact is attempted; failures are collected
/// and returned together once the whole batch has settled.
pub struct BatchDownloader {
    client: Client,
    concurrency: usize,
}

impl BatchDownloader {
    pub fn new(client: Client, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn download_all(
        &self,
        artifacts: Vec<BatchArtifact>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> LauncherResult<BatchSummary> {
        // Deduplicate artifacts by path to avoid concurrent writes to the same file
        let mut seen_paths = HashSet::new();
        let unique: Vec<BatchArtifact> = artifacts
            .into_iter()
            .filter(|a| seen_paths.insert(a.path.clone()))
            .collect();

        let total = unique.len();
        if total == 0 {
            return Ok(BatchSummary::default());
        }

        let finished = Arc::new(AtomicUsize::new(0));
        reporter.set_step_count(0, Some(total as u32));

        let results: Vec<(String, LauncherResult<DownloadOutcome>)> = stream::iter(unique)
            .map(|artifact| {
                let client = self.client.clone();
                let reporter = reporter.clone();
                let finished = finished.clone();

                async move {
                    let result = ensure_downloaded(
                        &client,
                        &artifact.url,
                        &artifact.path,
                        artifact.sha1.as_deref(),
                    )
                    .await;

                    if let Err(e) = &result {
                        log::warn!("Failed to download {} from {}: {}", artifact.name, artifact.url, e);
                    }

                    let done = finished.fetch_add(1, Ordering::SeqCst) + 1;
                    reporter.set_step_count(done as u32, Some(total as u32));

                    (artifact.name, result)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut summary = BatchSummary::default();
        let mut failures = Vec::new();
        for (name, result) in results {
            match result {
                Ok(DownloadOutcome::Downloaded) => summary.downloaded += 1,
                Ok(DownloadOutcome::AlreadyPresent) => summary.skipped += 1,
                Err(error) => failures.push(ArtifactFailure {
                    artifact: name,
                    error,
                }),
            }
        }

        if !failures.is_empty() {
            log::error!("{} of {} downloads failed", failures.len(), total);
            return Err(LauncherError::Batch { failures, total });
        }

        log::debug!(
            "Batch complete: {} downloaded, {} already present",
            summary.downloaded,
            summary.skipped
        );
        Ok(summary)
    }
}
