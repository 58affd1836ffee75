pub mod platform;
pub mod process;
pub mod uuid;
