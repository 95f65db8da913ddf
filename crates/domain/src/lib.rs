//! # WeCom Domain
//!
//! Data types shared by the WeCom directory client.
//!
//! This crate contains:
//! - Directory models (users, departments, tags)
//! - Bulk import/export job models
//! - Callback event models
//! - Client configuration and the domain error type
//!
//! ## Architecture
//! - No dependencies on other WeCom crates
//! - Only serde-level external dependencies
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
