//! Asynchronous bulk jobs: CSV imports and encrypted exports.

pub mod export;
pub mod import;

pub use export::{decode_departments, decode_tag_members, decode_users, ExportCommands};
pub use import::ImportCommands;
