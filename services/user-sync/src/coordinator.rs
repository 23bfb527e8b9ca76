//! Sync coordinator
//!
//! Decides, per operation, between the remote API and the local cache:
//!
//! - reachable: fetch remotely, upsert every returned user by `id`, then
//!   re-read the cache as the source of truth;
//! - unreachable: serve the cache and report the no-connection warning.
//!
//! The coordinator also keeps the list it loaded last, which is the domain of
//! [`SyncCoordinator::search`].

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::{NO_CONNECTION_MESSAGE, SyncError, SyncResult};
use crate::models::{UserDraft, UserRecord};
use crate::reachability::Reachability;
use crate::remote::UserApi;
use crate::repositories::{UserFilter, UserRepository};
use crate::search::filter_by_name;

/// Result of a successful [`SyncCoordinator::refresh_list`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The server returned users and `fetched` of them were written to the cache
    Synced {
        records: Vec<UserRecord>,
        fetched: usize,
    },
    /// The server answered with no cacheable users; the cache is untouched
    Empty { records: Vec<UserRecord> },
    /// The network was unreachable; records come straight from the cache
    Offline { records: Vec<UserRecord> },
}

impl RefreshOutcome {
    /// Cached users after the refresh
    pub fn records(&self) -> &[UserRecord] {
        match self {
            RefreshOutcome::Synced { records, .. }
            | RefreshOutcome::Empty { records }
            | RefreshOutcome::Offline { records } => records,
        }
    }

    pub fn into_records(self) -> Vec<UserRecord> {
        match self {
            RefreshOutcome::Synced { records, .. }
            | RefreshOutcome::Empty { records }
            | RefreshOutcome::Offline { records } => records,
        }
    }

    /// Warning to show next to the records, if any
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            RefreshOutcome::Offline { .. } => Some(NO_CONNECTION_MESSAGE),
            _ => None,
        }
    }
}

/// Result of a successful [`SyncCoordinator::submit_user`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Users from the create response that were written to the cache
    pub cached: Vec<UserRecord>,
}

/// Coordinates the remote user API with the local cache
pub struct SyncCoordinator<A, R> {
    store: UserRepository,
    api: A,
    reachability: R,
    loaded: RwLock<Vec<UserRecord>>,
}

impl<A, R> SyncCoordinator<A, R>
where
    A: UserApi,
    R: Reachability,
{
    pub fn new(store: UserRepository, api: A, reachability: R) -> Self {
        Self {
            store,
            api,
            reachability,
            loaded: RwLock::new(Vec::new()),
        }
    }

    /// The local store this coordinator writes to
    pub fn store(&self) -> &UserRepository {
        &self.store
    }

    /// Refresh the user list
    ///
    /// A remote failure leaves the cache untouched and is returned as
    /// [`SyncError::Remote`].
    pub async fn refresh_list(&self) -> SyncResult<RefreshOutcome> {
        if !self.reachability.is_reachable().await {
            warn!("Network unreachable, serving cached users");
            let records = self.load_local().await?;
            return Ok(RefreshOutcome::Offline { records });
        }

        let response = self.api.list_users().await?;
        if !response.status {
            warn!("User list response reported status=false");
        }

        let remote = response.into_records();
        if remote.is_empty() {
            info!("User list response carried no users");
            let records = self.load_local().await?;
            return Ok(RefreshOutcome::Empty { records });
        }

        let mut fetched = 0;
        for record in &remote {
            if record.id.is_none() {
                warn!("Skipping user without id: {}", record.full_name);
                continue;
            }
            self.store.upsert(record).await?;
            fetched += 1;
        }

        if fetched == 0 {
            info!("User list response carried no users with an id");
            let records = self.load_local().await?;
            return Ok(RefreshOutcome::Empty { records });
        }
        info!("Cached {} users from the server", fetched);

        let records = self.load_local().await?;
        Ok(RefreshOutcome::Synced { records, fetched })
    }

    /// Submit a new user to the server
    ///
    /// Users echoed back by the server are cached right away, so the new user
    /// shows up before the next refresh.
    pub async fn submit_user(&self, draft: &UserDraft) -> SyncResult<SubmitOutcome> {
        if !self.reachability.is_reachable().await {
            warn!("Network unreachable, not submitting {}", draft.full_name);
            return Err(SyncError::Unreachable);
        }

        let response = self.api.create_user(draft).await?;

        let mut cached = Vec::new();
        for record in response.into_records() {
            if record.id.is_some() {
                self.store.upsert(&record).await?;
                cached.push(record);
            }
        }

        if cached.is_empty() {
            info!("User {} created; it will be cached on next refresh", draft.full_name);
        } else {
            info!("User {} created and cached", draft.full_name);
            self.load_local().await?;
        }

        Ok(SubmitOutcome { cached })
    }

    /// Read the whole cache without touching the network
    pub async fn load_local(&self) -> SyncResult<Vec<UserRecord>> {
        let records = self.store.fetch_all().await?;
        *self.loaded.write().await = records.clone();
        Ok(records)
    }

    /// Users from the last load
    pub async fn loaded(&self) -> Vec<UserRecord> {
        self.loaded.read().await.clone()
    }

    /// Filter the last loaded users by name, ignoring case
    ///
    /// The cache is not queried again. An empty query yields every loaded user.
    pub async fn search(&self, query: &str) -> Vec<UserRecord> {
        filter_by_name(&self.loaded.read().await, query)
    }

    /// Find a cached user by id
    pub async fn find_user(&self, id: i64) -> SyncResult<Option<UserRecord>> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Save local edits to a cached user
    ///
    /// Only users keyed by a server `id` can be edited; new users go through
    /// [`SyncCoordinator::submit_user`].
    pub async fn save_local(&self, record: &UserRecord) -> SyncResult<()> {
        if record.id.is_none() {
            warn!("Refusing to save user without id: {}", record.full_name);
            return Err(SyncError::MissingId);
        }
        self.store.upsert(record).await?;
        Ok(())
    }

    /// Remove a user from the cache and reload the list
    pub async fn delete_user(&self, id: i64) -> SyncResult<Vec<UserRecord>> {
        self.store.delete(&UserFilter::Id(id)).await?;
        self.load_local().await
    }
}
