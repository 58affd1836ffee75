use crate::error::{LauncherError, LauncherResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    #[default]
    Unknown,
    Vanilla,
    Fabric,
}

/// An installed game instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub directory: PathBuf,
    #[serde(rename = "type", default)]
    pub profile_type: ProfileType,
    /// Installed version id, e.g. `1.20.1` or `fabric-loader-0.15.0-1.20.1`.
    #[serde(rename = "version", default)]
    pub version_id: String,
    /// Name of the java runtime this profile prefers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java: Option<String>,
}

static NAME_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_.-]{1,32}$").ok());

pub fn is_valid_profile_name(name: &str) -> bool {
    NAME_PATTERN
        .as_ref()
        .map(|re| re.is_match(name))
        .unwrap_or(false)
}

impl Profile {
    pub fn new(name: &str, directory: impl Into<PathBuf>) -> LauncherResult<Self> {
        if !is_valid_profile_name(name) {
            return Err(LauncherError::InvalidProfileName {
                name: name.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            directory: directory.into(),
            profile_type: ProfileType::Unknown,
            version_id: String::new(),
            java: None,
        })
    }

    /// Record the version an install produced.
    pub fn set_version(&mut self, version_id: impl Into<String>, profile_type: ProfileType) {
        self.version_id = version_id.into();
        self.profile_type = profile_type;
    }
}
