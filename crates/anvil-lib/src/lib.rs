//! Install and launch core for a Java game launcher: rule evaluation,
//! version resolution, installation, argv composition and process spawning.

pub mod config;
pub mod error;
pub mod game;
pub mod models;
pub mod utils;

pub use config::LauncherSettings;
pub use error::{ErrorKind, LauncherError, LauncherResult, MissingKind};
pub use game::{
    ComposedLaunch, DataLayout, Installer, LaunchComposer, LaunchRequest, LaunchSession,
    RetryBudget, RuleEvaluator, VersionDescriptor, VersionResolver,
};
