//! Turns an installed version plus a session into an argv, and runs it.

pub mod arguments;
pub mod classpath;
pub mod process;
pub mod session;
pub mod types;
pub mod version_parser;

pub use arguments::{build_variables, expand_arguments, substitute_variables};
pub use classpath::build_classpath;
pub use process::{run, LaunchedProcess};
pub use session::{AccountSource, JavaRuntimeSource, LaunchOptions, LaunchSession, ProfileSource};
pub use types::{ComposedLaunch, LaunchRequest, QuickPlay, QuickPlayKind};
pub use version_parser::{resolve_version_chain, ResolvedVersion};

use crate::config::LauncherSettings;
use crate::error::{LauncherError, LauncherResult};
use crate::game::layout::DataLayout;
use crate::game::rules::{RuleEnvironment, RuleEvaluator};
use std::collections::HashMap;

pub struct LaunchComposer {
    layout: DataLayout,
    settings: LauncherSettings,
    base_env: RuleEnvironment,
}

impl LaunchComposer {
    /// Composer matching rules against the host.
    pub fn new(layout: DataLayout, settings: LauncherSettings) -> Self {
        Self::with_environment(layout, settings, RuleEnvironment::current(Vec::<String>::new()))
    }

    pub fn with_environment(
        layout: DataLayout,
        settings: LauncherSettings,
        base_env: RuleEnvironment,
    ) -> Self {
        Self {
            layout,
            settings,
            base_env,
        }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Evaluator for one session: the base environment plus the quick play
    /// feature, if any.
    pub fn session_rules(&self, quick_play: Option<&QuickPlay>) -> RuleEvaluator {
        let mut env = self.base_env.clone();
        if let Some(quick_play) = quick_play {
            env.features.insert(quick_play.kind.feature().to_string());
        }
        RuleEvaluator::with_environment(env)
    }

    /// Build the full command line for an installed profile.
    ///
    /// argv is the JVM segment, the main class, then the game segment, in
    /// spec order with nothing reordered or removed.
    pub async fn compose(
        &self,
        request: &LaunchRequest<'_>,
        rules: &RuleEvaluator,
    ) -> LauncherResult<ComposedLaunch> {
        let version_id = &request.profile.version_id;
        log::info!("Composing launch of {} for {}", version_id, request.profile.name);

        let version = resolve_version_chain(&self.layout, version_id).await?;
        log::debug!("Version chain: {}", version.chain.join(" -> "));

        if let Some(required) = &version.spec.java_version {
            if !request.java.satisfies(required.major_version) {
                log::warn!(
                    "{} asks for java {} but {} is {}",
                    version_id,
                    required.major_version,
                    request.java.path.display(),
                    request.java.major_version
                );
            }
        }

        let classpath = build_classpath(&self.layout, &version, rules)?;
        let variables =
            build_variables(&self.layout, &self.settings, request, &version, &classpath);

        let mut argv = expand_arguments(&version.spec.jvm_arguments(), rules, &variables);
        if let Some(argument) = self.logging_argument(&version) {
            argv.push(argument);
        }

        let main_class = version.spec.main_class.clone().ok_or_else(|| {
            LauncherError::decode(
                format!("version spec {}", version_id),
                <serde_json::Error as serde::de::Error>::missing_field("mainClass"),
            )
        })?;
        argv.push(main_class);

        argv.extend(expand_arguments(
            &version.spec.game_arguments(),
            rules,
            &variables,
        ));

        let launch = ComposedLaunch {
            executable: request.java.path.clone(),
            argv,
            work_dir: request.profile.directory.clone(),
        };
        log::debug!("Launch command: {}", launch.display_redacted(request.access_token));
        Ok(launch)
    }

    /// The `logging.client.argument` with `${path}` pointing at the installed
    /// config, when that config is on disk.
    fn logging_argument(&self, version: &ResolvedVersion) -> Option<String> {
        let logging = version.spec.client_logging()?;
        let path = self.layout.log_config_path(&logging.file.id);
        if !path.exists() {
            log::warn!("Log config {:?} is missing, launching without it", path);
            return None;
        }
        let vars = HashMap::from([(
            "path".to_string(),
            path.to_string_lossy().into_owned(),
        )]);
        Some(substitute_variables(&logging.argument, &vars))
    }
}
