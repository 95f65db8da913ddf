//! # WeCom Infrastructure
//!
//! All I/O of the WeCom directory client.
//!
//! This crate contains:
//! - HTTP transport with retry
//! - Authenticated API client, response envelope and token service
//! - Member, department and tag commands
//! - Bulk import/export jobs with verified, decrypted downloads
//! - OAuth login URL and code exchange
//! - Callback XML parsing
//! - Configuration loading
//!
//! ## Architecture
//! - Models come from `wecom-domain`
//! - Crypto and token bookkeeping come from `wecom-common`
//! - [`Wecom`] wires everything together for one corp application

pub mod api;
pub mod batch;
pub mod callback;
pub mod config;
pub mod contact;
pub mod errors;
pub mod http;
pub mod oauth;
pub mod wecom;

// Re-export commonly used items
pub use api::{AccessTokenProvider, ApiClient, ApiClientConfig, ApiError, CorpTokenService};
pub use batch::{ExportCommands, ImportCommands};
pub use callback::{parse_batch_jobs, parse_event};
pub use contact::{DepartmentCommands, InviteTargets, TagCommands, UserCommands};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use oauth::{authorize_url, OAuthCommands};
pub use wecom::Wecom;
