//! Synchronization core for the Userbook application
//!
//! The crate keeps an on-device cache of user records in step with the remote
//! user API. Presentation code talks to [`SyncCoordinator`], which decides
//! between the network and the cache on every call.

pub mod coordinator;
pub mod error;
pub mod models;
pub mod reachability;
pub mod remote;
pub mod repositories;
pub mod search;
pub mod settings;

pub use coordinator::{RefreshOutcome, SubmitOutcome, SyncCoordinator};
pub use error::{NO_CONNECTION_MESSAGE, RemoteError, RemoteResult, SyncError, SyncResult};
pub use models::{ListResponse, RemoteUser, UserDraft, UserRecord};
pub use reachability::{Reachability, StaticReachability, TcpProbe};
pub use remote::{HttpUserClient, UserApi};
pub use repositories::{UserFilter, UserRepository};
pub use settings::Settings;
