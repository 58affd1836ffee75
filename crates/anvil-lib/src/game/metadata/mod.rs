//! Version resolution: the cached manifest of base and loader versions.

pub mod cache;
pub mod fetcher;
pub mod resolver;
pub mod types;

pub use resolver::{RetryBudget, VersionResolver};
pub use types::{expand_template, VersionDescriptor, VersionManifestCache};
