//! On-disk / upstream version spec document (`versions/{id}/{id}.json`).

use crate::error::{LauncherError, LauncherResult};
use crate::game::rules::Rule;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Download {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: u64,
    pub url: String,
}

impl Download {
    /// The expected hash, if one was declared. An empty string counts as absent.
    pub fn expected_sha1(&self) -> Option<&str> {
        self.sha1.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionDownloads {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Download>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_mappings: Option<Download>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<Download>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_mappings: Option<Download>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryArtifact {
    pub path: String,
    #[serde(flatten)]
    pub download: Download,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<LibraryArtifact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<LibraryDownloads>,
    /// Maven repository base for libraries that only carry a coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Where a library's jar comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum LibrarySource<'a> {
    Direct(&'a LibraryArtifact),
    Repository(&'a str),
    /// Neither a direct artifact nor a repository (e.g. natives-only entries).
    Unavailable,
}

impl Library {
    pub fn source(&self) -> LibrarySource<'_> {
        if let Some(artifact) = self.downloads.as_ref().and_then(|d| d.artifact.as_ref()) {
            return LibrarySource::Direct(artifact);
        }
        match self.url.as_deref() {
            Some(repo) => LibrarySource::Repository(repo),
            None => LibrarySource::Unavailable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexRef {
    pub id: String,
    #[serde(default)]
    pub total_size: u64,
    #[serde(flatten)]
    pub download: Download,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetIndex {
    #[serde(default)]
    pub objects: HashMap<String, AssetObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogFile {
    pub id: String,
    #[serde(flatten)]
    pub download: Download,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientLogging {
    /// JVM argument template, e.g. `-Dlog4j.configurationFile=${path}`.
    pub argument: String,
    pub file: LogFile,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Logging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientLogging>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaVersionRequirement {
    #[serde(default)]
    pub component: String,
    pub major_version: u32,
}

/// One entry of `arguments.jvm` / `arguments.game`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    Literal(String),
    Conditional {
        #[serde(default)]
        rules: Vec<Rule>,
        value: ArgumentValue,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Single(String),
    Multiple(Vec<String>),
}

impl ArgumentValue {
    pub fn values(&self) -> &[String] {
        match self {
            ArgumentValue::Single(value) => std::slice::from_ref(value),
            ArgumentValue::Multiple(values) => values,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<Argument>,
    #[serde(default)]
    pub jvm: Vec<Argument>,
}

/// Installation and launch descriptor for a single version.
///
/// Optional fields stay `None` when the document omits them so that a child
/// spec can tell "not provided" apart from an intentionally empty value when
/// it is merged over its base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_launcher_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<VersionDownloads>,
    #[serde(default)]
    pub libraries: Vec<Library>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_index: Option<AssetIndexRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Logging>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_version: Option<JavaVersionRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub version_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Arguments>,
}

impl VersionSpec {
    /// Decode a spec document, naming `what` in the error on failure.
    pub fn from_json(bytes: &[u8], what: &str) -> LauncherResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| LauncherError::decode(what, e))
    }

    /// Schema version, with an absent field reported as 0.
    pub fn schema_version(&self) -> u32 {
        self.minimum_launcher_version.unwrap_or(0)
    }

    pub fn client_download(&self) -> Option<&Download> {
        self.downloads.as_ref().and_then(|d| d.client.as_ref())
    }

    pub fn client_logging(&self) -> Option<&ClientLogging> {
        self.logging.as_ref().and_then(|l| l.client.as_ref())
    }

    pub fn jvm_arguments(&self) -> Vec<Argument> {
        self.arguments
            .as_ref()
            .map(|a| a.jvm.clone())
            .unwrap_or_default()
    }

    /// Only the structured `arguments.game` list is read. Pre-1.13 specs
    /// carry a flat `minecraftArguments` string instead and are rejected by
    /// the installer's schema gate.
    pub fn game_arguments(&self) -> Vec<Argument> {
        self.arguments
            .as_ref()
            .map(|a| a.game.clone())
            .unwrap_or_default()
    }

    /// Asset index name used for `${assets_index_name}`.
    pub fn assets_name(&self) -> Option<&str> {
        self.assets
            .as_deref()
            .or_else(|| self.asset_index.as_ref().map(|a| a.id.as_str()))
    }
}
