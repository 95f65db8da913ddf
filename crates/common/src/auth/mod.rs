//! Access-token bookkeeping
//!
//! The corp access token is a short-lived bearer string obtained by trading
//! the corp id and secret. This module only tracks its value and lifetime;
//! fetching it is the job of the client crate.

pub mod token;

pub use token::{AccessToken, TokenCheck};
