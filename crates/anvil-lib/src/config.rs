//! Centralized launcher settings.
//! Constants hold the upstream defaults; `LauncherSettings` lets an embedding
//! application (or a test) override them without touching the core.

use crate::error::{LauncherError, LauncherResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// URL Constants
pub const VANILLA_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest_v2.json";
pub const EXPERIMENTAL_MANIFEST_URL: &str =
    "https://maven.fabricmc.net/net/minecraft/experimental_versions.json";
pub const FABRIC_LOADER_URL: &str = "https://meta.fabricmc.net/v2/versions/loader";
pub const FABRIC_GAME_URL: &str = "https://meta.fabricmc.net/v2/versions/game";
pub const ASSET_OBJECT_BASE_URL: &str = "https://resources.download.minecraft.net";

pub const CONNECT_TIMEOUT_SECS: u64 = 30;
pub const MANIFEST_REFRESH_DEADLINE_SECS: u64 = 60;
pub const MANIFEST_MAX_AGE_HOURS: i64 = 24;
pub const DEFAULT_ASSET_CONCURRENCY: usize = 100;

pub const LAUNCHER_NAME: &str = "anvil";
pub const LAUNCHER_VERSION: &str = "0.0.1";
/// Client id handed to the game through `${clientid}` (base64 encoded at launch).
pub const CLIENT_ID: &str = "130AE6860AA54506B25FB36A61B6773D";

/// Remote feeds consumed by the version resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedUrls {
    pub base_manifest: String,
    pub experimental_manifest: String,
    pub loader_builds: String,
    pub loader_games: String,
}

impl Default for FeedUrls {
    fn default() -> Self {
        Self {
            base_manifest: VANILLA_MANIFEST_URL.to_string(),
            experimental_manifest: EXPERIMENTAL_MANIFEST_URL.to_string(),
            loader_builds: FABRIC_LOADER_URL.to_string(),
            loader_games: FABRIC_GAME_URL.to_string(),
        }
    }
}

impl FeedUrls {
    /// Point every feed at one host, keeping the upstream path layout.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            base_manifest: format!("{}/mc/game/version_manifest_v2.json", base),
            experimental_manifest: format!("{}/net/minecraft/experimental_versions.json", base),
            loader_builds: format!("{}/v2/versions/loader", base),
            loader_games: format!("{}/v2/versions/game", base),
        }
    }

    /// Base of per-version loader profile documents, derived from the loader feed.
    pub fn loader_profile_base(&self) -> &str {
        self.loader_builds.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LauncherSettings {
    pub feeds: FeedUrls,
    pub asset_base_url: String,
    pub asset_concurrency: usize,
    pub connect_timeout_secs: u64,
    pub refresh_deadline_secs: u64,
    pub manifest_max_age_hours: i64,
    pub launcher_name: String,
    pub launcher_version: String,
    pub client_id: String,
    pub resolution: Resolution,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            feeds: FeedUrls::default(),
            asset_base_url: ASSET_OBJECT_BASE_URL.to_string(),
            asset_concurrency: DEFAULT_ASSET_CONCURRENCY,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            refresh_deadline_secs: MANIFEST_REFRESH_DEADLINE_SECS,
            manifest_max_age_hours: MANIFEST_MAX_AGE_HOURS,
            launcher_name: LAUNCHER_NAME.to_string(),
            launcher_version: LAUNCHER_VERSION.to_string(),
            client_id: CLIENT_ID.to_string(),
            resolution: Resolution::default(),
        }
    }
}

impl LauncherSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn refresh_deadline(&self) -> Duration {
        Duration::from_secs(self.refresh_deadline_secs)
    }

    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.launcher_name, self.launcher_version)
    }
}

/// Build the HTTP client shared by the resolver and installer.
///
/// Only connecting is bounded. Transfers may take as long as they need;
/// the manifest refresh carries its own overall deadline.
pub fn http_client(settings: &LauncherSettings) -> LauncherResult<Client> {
    Client::builder()
        .connect_timeout(settings.connect_timeout())
        .user_agent(settings.user_agent())
        .build()
        .map_err(|e| LauncherError::network("client builder", e))
}
