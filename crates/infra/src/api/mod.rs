//! Server API plumbing
//!
//! Token acquisition, authenticated request execution and response envelope
//! handling shared by every endpoint group.
//!
//! # Architecture
//!
//! - All traffic goes through [`crate::http::HttpClient`] (no direct reqwest)
//! - The access token travels as the `access_token` query parameter
//! - A stale token is refreshed and the call retried once

pub mod auth;
pub mod client;
pub mod envelope;
pub mod errors;

pub use auth::{AccessTokenProvider, CorpTokenService};
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig, Query};
pub use envelope::{parse_response_body, ResponseBody};
pub use errors::{ApiError, ApiErrorCategory};
