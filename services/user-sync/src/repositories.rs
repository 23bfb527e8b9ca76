//! Repositories for local store operations

pub mod user;

pub use user::{UserFilter, UserRepository};
