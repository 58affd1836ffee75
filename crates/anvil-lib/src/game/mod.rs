pub mod installer;
pub mod launcher;
pub mod layout;
pub mod metadata;
pub mod rules;

// Re-export commonly used types
pub use installer::Installer;
pub use launcher::{ComposedLaunch, LaunchComposer, LaunchRequest, LaunchSession};
pub use layout::DataLayout;
pub use metadata::{RetryBudget, VersionDescriptor, VersionResolver};
pub use rules::{RuleEnvironment, RuleEvaluator};
