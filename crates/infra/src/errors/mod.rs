//! Conversions from third-party errors into the domain error.

pub mod conversions;

pub use conversions::InfraError;
