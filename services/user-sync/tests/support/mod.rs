// tests/support/mod.rs
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use axum::Router;
use common::database::{DatabaseConfig, init_pool};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use user_sync::{
    ListResponse, RemoteError, RemoteResult, RemoteUser, UserApi, UserDraft, UserRepository,
};

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn spawn_api(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/public/api", addr)
}

/// Base URL of a port nothing listens on
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/public/api", addr)
}

/// Fresh in-memory store with its pool, so tests can close it
pub async fn memory_store() -> (UserRepository, SqlitePool) {
    let pool = init_pool(&DatabaseConfig::in_memory()).await.unwrap();
    let store = UserRepository::new(pool.clone());
    store.init_schema().await.unwrap();
    (store, pool)
}

pub fn remote_user(id: i64, full_name: &str, salary: i64) -> RemoteUser {
    RemoteUser {
        id: Some(id),
        full_name: Some(full_name.to_string()),
        email: Some(format!("{}@example.com", full_name.to_lowercase())),
        salary: Some(salary),
        ..Default::default()
    }
}

pub fn envelope(users: Vec<RemoteUser>) -> ListResponse {
    ListResponse {
        status: true,
        data: Some(users),
    }
}

pub fn envelope_json(users: Vec<Value>) -> Value {
    json!({ "status": true, "data": users })
}

/// Scripted user API that counts the calls it receives
#[derive(Clone, Default)]
pub struct FakeApi {
    list_responses: Arc<Mutex<VecDeque<RemoteResult<ListResponse>>>>,
    create_responses: Arc<Mutex<VecDeque<RemoteResult<ListResponse>>>>,
    drafts: Arc<Mutex<Vec<UserDraft>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_list(&self, response: RemoteResult<ListResponse>) -> &Self {
        self.list_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn push_create(&self, response: RemoteResult<ListResponse>) -> &Self {
        self.create_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn drafts(&self) -> Vec<UserDraft> {
        self.drafts.lock().unwrap().clone()
    }
}

impl UserApi for FakeApi {
    async fn list_users(&self) -> RemoteResult<ListResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.list_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RemoteError::Connectivity))
    }

    async fn create_user(&self, draft: &UserDraft) -> RemoteResult<ListResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.drafts.lock().unwrap().push(draft.clone());
        self.create_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RemoteError::Connectivity))
    }
}
