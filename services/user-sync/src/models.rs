//! Data models for the sync core

pub mod user;

// Re-export for convenience
pub use user::{ListResponse, RemoteUser, UserDraft, UserRecord};
