use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placeholder substituted with the loader version in loader descriptors.
pub const LOADER_PLACEHOLDER: &str = "%s";

/// A resolved (or, for loader variants, templated) version reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDescriptor {
    pub id: String,
    #[serde(rename = "url")]
    pub source_url: String,
    #[serde(default)]
    pub stable: bool,
    /// Hash of the spec document, when the feed publishes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
}

impl VersionDescriptor {
    /// Expand a loader template with a concrete loader version.
    pub fn expand(&self, loader_version: &str) -> VersionDescriptor {
        VersionDescriptor {
            id: expand_template(&self.id, loader_version),
            source_url: expand_template(&self.source_url, loader_version),
            stable: self.stable,
            sha1: self.sha1.clone(),
        }
    }
}

/// Replace the single `%s` placeholder in `template`.
pub fn expand_template(template: &str, value: &str) -> String {
    template.replacen(LOADER_PLACEHOLDER, value, 1)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseVersions {
    #[serde(default)]
    pub release: String,
    #[serde(default)]
    pub snapshot: String,
    #[serde(default)]
    pub versions: HashMap<String, VersionDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderVersions {
    /// Game version -> templated loader descriptor.
    #[serde(default)]
    pub versions: HashMap<String, VersionDescriptor>,
    #[serde(default)]
    pub default_loader: String,
    /// Loader version -> stable flag.
    #[serde(default)]
    pub loaders: HashMap<String, bool>,
}

/// The `versions_v2.json` cache document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionManifestCache {
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub base_versions: BaseVersions,
    #[serde(default)]
    pub loader_versions: LoaderVersions,
}

impl Default for VersionManifestCache {
    fn default() -> Self {
        Self {
            last_updated: DateTime::<Utc>::UNIX_EPOCH,
            base_versions: BaseVersions::default(),
            loader_versions: LoaderVersions::default(),
        }
    }
}

impl VersionManifestCache {
    pub fn base(&self, name: &str) -> Option<&VersionDescriptor> {
        self.base_versions.versions.get(&name.to_lowercase())
    }

    pub fn loader_template(&self, name: &str) -> Option<&VersionDescriptor> {
        self.loader_versions.versions.get(&name.to_lowercase())
    }

    pub fn has_loader(&self, loader_version: &str) -> bool {
        self.loader_versions
            .loaders
            .contains_key(&loader_version.to_lowercase())
    }

    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.last_updated
    }
}

// ---- Upstream feed shapes ----

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestVersions {
    #[serde(default)]
    pub release: String,
    #[serde(default)]
    pub snapshot: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    #[serde(rename = "type", default)]
    pub version_type: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
}

/// `version_manifest_v2.json` and the experimental manifest share this shape.
#[derive(Debug, Clone, Deserialize)]
pub struct BaseManifestFeed {
    #[serde(default)]
    pub latest: Option<LatestVersions>,
    #[serde(default)]
    pub versions: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoaderBuild {
    pub version: String,
    #[serde(default)]
    pub stable: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoaderGameVersion {
    pub version: String,
    #[serde(default)]
    pub stable: bool,
}
