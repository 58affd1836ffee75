use crate::error::{LauncherError, LauncherResult, MissingKind};
use crate::game::launcher::process::{run, LaunchedProcess};
use crate::game::launcher::types::{ComposedLaunch, LaunchRequest, QuickPlay};
use crate::game::launcher::LaunchComposer;
use crate::models::{Account, JavaRuntime, Profile};
use futures::future::BoxFuture;
use std::sync::Arc;

/// Installed profiles, owned by the embedding application.
pub trait ProfileSource: Send + Sync {
    fn profile(&self, name: &str) -> Option<Profile>;
    fn default_profile(&self) -> Option<Profile>;
}

/// Signed-in accounts. Token refresh lives outside this crate.
pub trait AccountSource: Send + Sync {
    /// Look an account up by username or uuid.
    fn account(&self, reference: &str) -> Option<Account>;
    fn default_account(&self) -> Option<Account>;
    fn fresh_access_token<'a>(&'a self, account: &'a Account) -> BoxFuture<'a, LauncherResult<String>>;
}

pub trait JavaRuntimeSource: Send + Sync {
    fn java_runtime(&self, name: &str) -> Option<JavaRuntime>;
    fn default_runtime(&self) -> Option<JavaRuntime>;
}

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Account reference, the default account when `None`.
    pub account: Option<String>,
    /// Java runtime name, overriding the profile's choice.
    pub java: Option<String>,
    pub quick_play: Option<QuickPlay>,
    /// Wait for the game and inherit its output.
    pub attach: bool,
}

/// Resolves every collaborator for a launch, then composes and runs it.
pub struct LaunchSession {
    composer: LaunchComposer,
    profiles: Arc<dyn ProfileSource>,
    accounts: Arc<dyn AccountSource>,
    javas: Arc<dyn JavaRuntimeSource>,
}

impl LaunchSession {
    pub fn new(
        composer: LaunchComposer,
        profiles: Arc<dyn ProfileSource>,
        accounts: Arc<dyn AccountSource>,
        javas: Arc<dyn JavaRuntimeSource>,
    ) -> Self {
        Self {
            composer,
            profiles,
            accounts,
            javas,
        }
    }

    fn resolve_profile(&self, name: Option<&str>) -> LauncherResult<Profile> {
        let found = match name {
            Some(name) => self.profiles.profile(name),
            None => self.profiles.default_profile(),
        };
        found.ok_or_else(|| {
            LauncherError::not_found(MissingKind::Profile, name.unwrap_or("<default>"))
        })
    }

    /// Explicit option first, then the profile's preference, then the default.
    fn resolve_java(&self, profile: &Profile, options: &LaunchOptions) -> LauncherResult<JavaRuntime> {
        match options.java.as_deref().or(profile.java.as_deref()) {
            Some(name) => self
                .javas
                .java_runtime(name)
                .ok_or_else(|| LauncherError::not_found(MissingKind::JavaRuntime, name)),
            None => self
                .javas
                .default_runtime()
                .ok_or_else(|| LauncherError::not_found(MissingKind::JavaRuntime, "<default>")),
        }
    }

    fn resolve_account(&self, options: &LaunchOptions) -> LauncherResult<Account> {
        match options.account.as_deref() {
            Some(reference) => self
                .accounts
                .account(reference)
                .ok_or_else(|| LauncherError::not_found(MissingKind::Account, reference)),
            None => self
                .accounts
                .default_account()
                .ok_or_else(|| LauncherError::not_found(MissingKind::Account, "<default>")),
        }
    }

    /// Resolve collaborators and compose, without spawning anything.
    pub async fn prepare(
        &self,
        profile_name: Option<&str>,
        options: &LaunchOptions,
    ) -> LauncherResult<ComposedLaunch> {
        let profile = self.resolve_profile(profile_name)?;
        let java = self.resolve_java(&profile, options)?;
        let account = self.resolve_account(options)?;
        let identity = account.identity()?;
        let access_token = self.accounts.fresh_access_token(&account).await?;

        let rules = self.composer.session_rules(options.quick_play.as_ref());
        let request = LaunchRequest {
            profile: &profile,
            access_token: &access_token,
            identity: &identity,
            java: &java,
            quick_play: options.quick_play.as_ref(),
        };
        self.composer.compose(&request, &rules).await
    }

    pub async fn launch(
        &self,
        profile_name: Option<&str>,
        options: LaunchOptions,
    ) -> LauncherResult<LaunchedProcess> {
        let launch = self.prepare(profile_name, &options).await?;
        run(&launch.executable, &launch.argv, &launch.work_dir, options.attach).await
    }
}
