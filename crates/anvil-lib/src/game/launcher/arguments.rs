use crate::config::LauncherSettings;
use crate::game::launcher::types::LaunchRequest;
use crate::game::launcher::version_parser::ResolvedVersion;
use crate::game::layout::DataLayout;
use crate::game::rules::RuleEvaluator;
use crate::models::version::Argument;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Replace `${key}` placeholders in a single left-to-right pass. Substituted
/// values are not rescanned and unknown keys are left untouched.
pub fn substitute_variables(text: &str, variables: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match variables.get(key) {
                    Some(value) => result.push_str(value),
                    None => result.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    result.push_str(rest);
    result
}

/// Expand an argument list: literals pass through, conditional entries are
/// kept only when their rules allow. Order is preserved.
pub fn expand_arguments(
    arguments: &[Argument],
    rules: &RuleEvaluator,
    variables: &HashMap<String, String>,
) -> Vec<String> {
    let mut out = Vec::with_capacity(arguments.len());
    for argument in arguments {
        match argument {
            Argument::Literal(value) => out.push(substitute_variables(value, variables)),
            Argument::Conditional { rules: conditions, value } => {
                if !rules.allows(conditions) {
                    continue;
                }
                out.extend(
                    value
                        .values()
                        .iter()
                        .map(|v| substitute_variables(v, variables)),
                );
            }
        }
    }
    out
}

/// `${clientid}` is the launcher client id, base64 encoded.
pub fn client_id_variable(client_id: &str) -> String {
    STANDARD.encode(client_id.as_bytes())
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn canonical_or_raw(path: PathBuf) -> PathBuf {
    dunce::canonicalize(&path).unwrap_or(path)
}

/// The variable table for one launch.
pub fn build_variables(
    layout: &DataLayout,
    settings: &LauncherSettings,
    request: &LaunchRequest<'_>,
    version: &ResolvedVersion,
    classpath: &str,
) -> HashMap<String, String> {
    let profile = request.profile;
    let identity = request.identity;
    let assets_root = display_path(&canonical_or_raw(layout.assets_dir()));

    let mut vars = HashMap::new();
    vars.insert("classpath".to_string(), classpath.to_string());
    vars.insert(
        "natives_directory".to_string(),
        display_path(&canonical_or_raw(layout.natives_dir(&profile.version_id))),
    );
    vars.insert("launcher_name".to_string(), settings.launcher_name.clone());
    vars.insert("launcher_version".to_string(), settings.launcher_version.clone());

    vars.insert("version_name".to_string(), profile.version_id.clone());
    vars.insert(
        "version_type".to_string(),
        version
            .spec
            .version_type
            .clone()
            .unwrap_or_else(|| "release".to_string()),
    );
    vars.insert(
        "game_directory".to_string(),
        display_path(&canonical_or_raw(profile.directory.clone())),
    );
    vars.insert("assets_root".to_string(), assets_root.clone());
    vars.insert("game_assets".to_string(), assets_root);
    vars.insert(
        "assets_index_name".to_string(),
        version.spec.assets_name().unwrap_or_default().to_string(),
    );

    vars.insert("auth_player_name".to_string(), identity.username.clone());
    vars.insert("auth_uuid".to_string(), identity.uuid.clone());
    vars.insert("auth_access_token".to_string(), request.access_token.to_string());
    vars.insert("auth_session".to_string(), request.access_token.to_string());
    vars.insert(
        "auth_xuid".to_string(),
        identity.xuid.clone().unwrap_or_default(),
    );
    vars.insert("clientid".to_string(), client_id_variable(&settings.client_id));
    vars.insert("user_type".to_string(), "msa".to_string());
    vars.insert("user_properties".to_string(), "{}".to_string());

    vars.insert(
        "resolution_width".to_string(),
        settings.resolution.width.to_string(),
    );
    vars.insert(
        "resolution_height".to_string(),
        settings.resolution.height.to_string(),
    );

    if let Some(quick_play) = request.quick_play {
        vars.insert(
            quick_play.kind.variable().to_string(),
            quick_play.target.clone(),
        );
    }

    vars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CLIENT_ID;
    use crate::game::launcher::types::{QuickPlay, QuickPlayKind};
    use crate::game::rules::{Rule, RuleAction, RuleEnvironment};
    use crate::models::version::{ArgumentValue, VersionSpec};
    use crate::models::{JavaRuntime, PlayerIdentity, Profile};
    use crate::utils::platform::OsType;
    use std::collections::BTreeMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn evaluator(features: &[&str]) -> RuleEvaluator {
        RuleEvaluator::with_environment(RuleEnvironment {
            os: OsType::Linux,
            arch: "x86_64".into(),
            os_version: "6.1".into(),
            features: features.iter().map(|f| f.to_string()).collect(),
        })
    }

    fn feature_rule(name: &str) -> Rule {
        Rule {
            action: RuleAction::Allow,
            os: None,
            features: Some(BTreeMap::from([(name.to_string(), true)])),
        }
    }

    #[test]
    fn substitutes_known_and_keeps_unknown() {
        let v = vars(&[("a", "1"), ("b", "${a}")]);
        assert_eq!(substitute_variables("x=${a} y=${zzz}", &v), "x=1 y=${zzz}");
        assert_eq!(substitute_variables("${b}", &v), "${a}");
        assert_eq!(substitute_variables("tail ${a", &v), "tail ${a");
        assert_eq!(substitute_variables("${a}${a}", &v), "11");
    }

    #[test]
    fn conditional_arguments_follow_features() {
        let args = vec![
            Argument::Literal("--username".into()),
            Argument::Literal("${auth_player_name}".into()),
            Argument::Conditional {
                rules: vec![feature_rule("is_demo_user")],
                value: ArgumentValue::Single("--demo".into()),
            },
            Argument::Conditional {
                rules: vec![feature_rule("has_custom_resolution")],
                value: ArgumentValue::Multiple(vec![
                    "--width".into(),
                    "${resolution_width}".into(),
                ]),
            },
        ];
        let v = vars(&[("auth_player_name", "Steve"), ("resolution_width", "854")]);

        assert_eq!(
            expand_arguments(&args, &evaluator(&[]), &v),
            ["--username", "Steve"]
        );
        assert_eq!(
            expand_arguments(&args, &evaluator(&["has_custom_resolution"]), &v),
            ["--username", "Steve", "--width", "854"]
        );
    }

    #[test]
    fn default_client_id_encoding() {
        assert_eq!(
            client_id_variable(CLIENT_ID),
            "MTMwQUU2ODYwQUE1NDUwNkIyNUZCMzZBNjFCNjc3M0Q="
        );
    }

    #[test]
    fn variable_table_covers_identity_and_quick_play() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let mut profile = Profile::new("survival", dir.path().join("profiles/survival")).unwrap();
        profile.version_id = "1.20.1".into();
        let identity = PlayerIdentity::new("Steve", "aceb326f-da15-45bc-bf2f-11940c21780c").unwrap();
        let java = JavaRuntime {
            name: "17".into(),
            path: "/usr/bin/java".into(),
            major_version: 17,
        };
        let quick_play = QuickPlay {
            kind: QuickPlayKind::Multiplayer,
            target: "mc.example.net:25565".into(),
        };
        let request = LaunchRequest {
            profile: &profile,
            access_token: "token",
            identity: &identity,
            java: &java,
            quick_play: Some(&quick_play),
        };
        let version = ResolvedVersion {
            spec: VersionSpec {
                id: "1.20.1".into(),
                assets: Some("5".into()),
                ..Default::default()
            },
            jar_id: "1.20.1".into(),
            chain: vec!["1.20.1".into()],
        };

        let vars = build_variables(&layout, &LauncherSettings::default(), &request, &version, "cp");

        assert_eq!(vars["auth_uuid"], "aceb326fda1545bcbf2f11940c21780c");
        assert_eq!(vars["auth_session"], "token");
        assert_eq!(vars["auth_xuid"], "");
        assert_eq!(vars["version_type"], "release");
        assert_eq!(vars["assets_index_name"], "5");
        assert_eq!(vars["resolution_width"], "1920");
        assert_eq!(vars["quickPlayMultiplayer"], "mc.example.net:25565");
        assert!(vars["natives_directory"].ends_with("natives"));
        assert_eq!(vars["assets_root"], vars["game_assets"]);
    }
}
