//! Custom error types for the sync core

use common::error::DatabaseError;
use thiserror::Error;

/// Message surfaced whenever the server cannot be reached
pub const NO_CONNECTION_MESSAGE: &str = "No internet connection.";

/// Failure of a single request against the user API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// No route to the server
    #[error("{}", NO_CONNECTION_MESSAGE)]
    Connectivity,

    /// Non-2xx response, or a transport failure after the connection was made
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The body did not match the response envelope
    #[error("{message}")]
    Decode { status: u16, message: String },
}

impl RemoteError {
    /// HTTP status carried by the error, 0 when no response was received
    pub fn status(&self) -> u16 {
        match self {
            RemoteError::Connectivity => 0,
            RemoteError::Server { status, .. } | RemoteError::Decode { status, .. } => *status,
        }
    }
}

/// Type alias for remote call results
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Error returned by coordinator operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// The reachability check failed before a request that needs the network
    #[error("{}", NO_CONNECTION_MESSAGE)]
    Unreachable,

    /// Local edits need a server `id` to address the cached record
    #[error("User has no server id")]
    MissingId,

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Persistence(#[from] DatabaseError),
}

/// Type alias for coordinator results
pub type SyncResult<T> = Result<T, SyncError>;
