pub mod account;
pub mod java;
pub mod profile;
pub mod version;

pub use account::{Account, Credential, PlayerIdentity};
pub use java::JavaRuntime;
pub use profile::{Profile, ProfileType};
pub use version::VersionSpec;
