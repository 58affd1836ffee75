//! Platform and feature gating for libraries and argument fragments.
//!
//! The evaluation mirrors what the upstream manifests assume: a rule that
//! does not match contributes the *opposite* of its action, and a single
//! Deny contribution denies the whole list.

use crate::utils::platform::{current_arch, current_os_version, normalize_arch, OsType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    #[serde(alias = "deny")]
    Disallow,
}

impl RuleAction {
    fn negate(self) -> Self {
        match self {
            RuleAction::Allow => RuleAction::Disallow,
            RuleAction::Disallow => RuleAction::Allow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OsRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
}

/// Everything a rule can be matched against.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEnvironment {
    pub os: OsType,
    /// Normalized arch (`x86_64`, `x86`, `arm64`).
    pub arch: String,
    pub os_version: String,
    pub features: HashSet<String>,
}

impl RuleEnvironment {
    /// Snapshot of the host with the given active features.
    pub fn current<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            os: OsType::current(),
            arch: current_arch(),
            os_version: current_os_version(),
            features: features.into_iter().map(Into::into).collect(),
        }
    }
}

/// Decides allow/deny for rule lists. Built once per session.
#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    env: RuleEnvironment,
}

impl RuleEvaluator {
    pub fn new<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_environment(RuleEnvironment::current(features))
    }

    pub fn with_environment(env: RuleEnvironment) -> Self {
        Self { env }
    }

    pub fn environment(&self) -> &RuleEnvironment {
        &self.env
    }

    pub fn evaluate(&self, rules: &[Rule]) -> RuleAction {
        let denied = rules.iter().any(|rule| {
            let contribution = if self.matches(rule) {
                rule.action
            } else {
                rule.action.negate()
            };
            contribution == RuleAction::Disallow
        });

        if denied {
            RuleAction::Disallow
        } else {
            RuleAction::Allow
        }
    }

    pub fn allows(&self, rules: &[Rule]) -> bool {
        self.evaluate(rules) == RuleAction::Allow
    }

    /// A rule matches when every predicate it carries holds.
    fn matches(&self, rule: &Rule) -> bool {
        if let Some(os) = &rule.os {
            if let Some(name) = &os.name {
                if !name.eq_ignore_ascii_case(self.env.os.as_str()) {
                    return false;
                }
            }
            if let Some(arch) = &os.arch {
                if normalize_arch(arch) != self.env.arch {
                    return false;
                }
            }
            if let Some(pattern) = &os.version {
                if !self.os_version_matches(pattern) {
                    return false;
                }
            }
        }

        if let Some(features) = &rule.features {
            for (feature, expected) in features {
                if *expected != self.env.features.contains(feature) {
                    return false;
                }
            }
        }

        true
    }

    fn os_version_matches(&self, pattern: &str) -> bool {
        match Regex::new(pattern) {
            Ok(re) => re.is_match(&self.env.os_version),
            Err(e) => {
                log::debug!("Invalid os.version pattern {:?} ({}), comparing literally", pattern, e);
                pattern == self.env.os_version
            }
        }
    }
}
