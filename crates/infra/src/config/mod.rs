//! Configuration loading
//!
//! Builds a [`wecom_domain::WecomConfig`] from environment variables or
//! config files.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
