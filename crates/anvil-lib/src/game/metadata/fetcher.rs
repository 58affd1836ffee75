use super::types::*;
use crate::config::FeedUrls;
use crate::error::{LauncherError, LauncherResult};
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// GET a JSON document and decode it.
pub async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> LauncherResult<T> {
    log::debug!("Fetching {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LauncherError::network(url, e))?;

    if !response.status().is_success() {
        return Err(LauncherError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| LauncherError::network(url, e))?;
    serde_json::from_slice(&bytes).map_err(|e| LauncherError::decode(url, e))
}

/// Fetch all four feeds and fold them into a fresh cache document.
pub async fn fetch_manifest(client: &Client, feeds: &FeedUrls) -> LauncherResult<VersionManifestCache> {
    log::info!("Fetching version manifests...");

    let base: BaseManifestFeed = fetch_json(client, &feeds.base_manifest).await?;
    let experimental: BaseManifestFeed = fetch_json(client, &feeds.experimental_manifest).await?;
    let loader_builds: Vec<LoaderBuild> = fetch_json(client, &feeds.loader_builds).await?;
    let loader_games: Vec<LoaderGameVersion> = fetch_json(client, &feeds.loader_games).await?;

    let mut base_versions = BaseVersions::default();
    merge_base_feed(&mut base_versions, base);
    merge_base_feed(&mut base_versions, experimental);

    let loader_versions = build_loader_versions(feeds, loader_builds, loader_games);

    log::info!(
        "Fetched {} base versions and {} loader-compatible versions ({} loader builds)",
        base_versions.versions.len(),
        loader_versions.versions.len(),
        loader_versions.loaders.len()
    );

    Ok(VersionManifestCache {
        last_updated: Utc::now(),
        base_versions,
        loader_versions,
    })
}

/// Later feeds override `latest` pointers and same-id entries of earlier ones.
fn merge_base_feed(target: &mut BaseVersions, feed: BaseManifestFeed) {
    if let Some(latest) = feed.latest {
        if !latest.release.is_empty() {
            target.release = latest.release;
        }
        if !latest.snapshot.is_empty() {
            target.snapshot = latest.snapshot;
        }
    }

    for entry in feed.versions {
        let descriptor = VersionDescriptor {
            stable: entry.version_type == "release",
            id: entry.id.clone(),
            source_url: entry.url,
            sha1: entry.sha1.filter(|s| !s.is_empty()),
        };
        target.versions.insert(entry.id.to_lowercase(), descriptor);
    }
}

fn build_loader_versions(
    feeds: &FeedUrls,
    builds: Vec<LoaderBuild>,
    games: Vec<LoaderGameVersion>,
) -> LoaderVersions {
    let default_loader = builds
        .iter()
        .find(|b| b.stable)
        .map(|b| b.version.clone())
        .unwrap_or_default();

    let loaders: HashMap<String, bool> = builds
        .into_iter()
        .map(|b| (b.version.to_lowercase(), b.stable))
        .collect();

    let profile_base = feeds.loader_profile_base();
    let versions = games
        .into_iter()
        .map(|game| {
            let descriptor = VersionDescriptor {
                id: format!("fabric-loader-{}-{}", LOADER_PLACEHOLDER, game.version),
                source_url: format!(
                    "{}/{}/{}/profile/json",
                    profile_base, game.version, LOADER_PLACEHOLDER
                ),
                stable: game.stable,
                sha1: None,
            };
            (game.version.to_lowercase(), descriptor)
        })
        .collect();

    LoaderVersions {
        versions,
        default_loader,
        loaders,
    }
}
