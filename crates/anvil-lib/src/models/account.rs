use crate::error::LauncherResult;
use crate::utils::uuid::trim_uuid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicrosoftTokenData {
    pub user_hash: String,
}

/// Placeholder for legacy accounts. No token data is tracked yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MojangTokenData {}

/// Token data keyed by account type, stored as `{"type": ..., "source": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "source", rename_all = "lowercase")]
pub enum Credential {
    Microsoft(MicrosoftTokenData),
    Mojang(MojangTokenData),
}

impl Credential {
    /// Xbox user hash, only known for Microsoft accounts.
    pub fn xuid(&self) -> Option<&str> {
        match self {
            Credential::Microsoft(data) => Some(&data.user_hash),
            Credential::Mojang(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub uuid: String,
    pub profile: AccountProfile,
    #[serde(flatten)]
    pub credential: Credential,
}

/// The player identity substituted into launch arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub username: String,
    /// 32 character uuid without hyphens.
    pub uuid: String,
    pub xuid: Option<String>,
}

impl PlayerIdentity {
    pub fn new(username: impl Into<String>, uuid: &str) -> LauncherResult<Self> {
        Ok(Self {
            username: username.into(),
            uuid: trim_uuid(uuid)?,
            xuid: None,
        })
    }
}

impl Account {
    pub fn identity(&self) -> LauncherResult<PlayerIdentity> {
        Ok(PlayerIdentity {
            username: self.profile.username.clone(),
            uuid: trim_uuid(&self.uuid)?,
            xuid: self.credential.xuid().map(str::to_string),
        })
    }
}
