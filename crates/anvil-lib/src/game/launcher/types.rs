use crate::models::{JavaRuntime, PlayerIdentity, Profile};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickPlayKind {
    Singleplayer,
    Multiplayer,
    Realms,
}

impl QuickPlayKind {
    /// Rule feature switched on for the session.
    pub fn feature(&self) -> &'static str {
        match self {
            QuickPlayKind::Singleplayer => "is_quick_play_singleplayer",
            QuickPlayKind::Multiplayer => "is_quick_play_multiplayer",
            QuickPlayKind::Realms => "is_quick_play_realms",
        }
    }

    /// Argument variable carrying the target.
    pub fn variable(&self) -> &'static str {
        match self {
            QuickPlayKind::Singleplayer => "quickPlaySingleplayer",
            QuickPlayKind::Multiplayer => "quickPlayMultiplayer",
            QuickPlayKind::Realms => "quickPlayRealms",
        }
    }
}

/// Join a world, server or realm directly after startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPlay {
    pub kind: QuickPlayKind,
    /// World name, `host[:port]` or realm id.
    pub target: String,
}

/// Everything the composer needs for one launch.
#[derive(Debug, Clone, Copy)]
pub struct LaunchRequest<'a> {
    pub profile: &'a Profile,
    pub access_token: &'a str,
    pub identity: &'a PlayerIdentity,
    pub java: &'a JavaRuntime,
    pub quick_play: Option<&'a QuickPlay>,
}

/// A fully expanded command, ready for the process executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedLaunch {
    pub executable: PathBuf,
    pub argv: Vec<String>,
    pub work_dir: PathBuf,
}

impl ComposedLaunch {
    /// Shell-quoted command line with `secret` masked, for logging.
    pub fn display_redacted(&self, secret: &str) -> String {
        let mut parts = vec![self.executable.to_string_lossy().into_owned()];
        parts.extend(self.argv.iter().map(|arg| {
            if !secret.is_empty() && arg.contains(secret) {
                arg.replace(secret, "********")
            } else {
                arg.clone()
            }
        }));
        shlex::try_join(parts.iter().map(String::as_str)).unwrap_or_else(|_| parts.join(" "))
    }
}
