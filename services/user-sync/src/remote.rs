//! HTTP client for the remote user API
//!
//! Both endpoints live at `{base_url}/user` and answer with the same
//! `{status, data}` envelope. Failed calls are never retried; the caller
//! decides whether to try again.

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{RemoteError, RemoteResult};
use crate::models::{ListResponse, UserDraft};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Operations the coordinator needs from the user API
pub trait UserApi {
    /// Fetch every user known to the server
    fn list_users(&self) -> impl Future<Output = RemoteResult<ListResponse>> + Send;

    /// Create a user from a draft
    fn create_user(
        &self,
        draft: &UserDraft,
    ) -> impl Future<Output = RemoteResult<ListResponse>> + Send;
}

/// Error body sent with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `reqwest`-backed user API client
#[derive(Clone)]
pub struct HttpUserClient {
    base_url: String,
    client: Client,
}

impl HttpUserClient {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// URL of the user collection endpoint
    pub fn users_url(&self) -> String {
        format!("{}/user", self.base_url)
    }

    /// Send a request and decode the envelope, reading the body exactly once
    async fn execute(&self, request: RequestBuilder) -> RemoteResult<ListResponse> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        debug!("Response {}: {}", status, body);

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            warn!("User API answered {}: {}", status, message);
            return Err(RemoteError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!("Could not decode user API response: {}", e);
            RemoteError::Decode {
                status: status.as_u16(),
                message: e.to_string(),
            }
        })
    }
}

impl UserApi for HttpUserClient {
    async fn list_users(&self) -> RemoteResult<ListResponse> {
        let url = self.users_url();
        info!("Fetching user list from {}", url);
        self.execute(self.client.get(url)).await
    }

    async fn create_user(&self, draft: &UserDraft) -> RemoteResult<ListResponse> {
        let url = self.users_url();
        info!("Creating user {} at {}", draft.full_name, url);
        self.execute(self.client.post(url).json(draft)).await
    }
}

/// Map a transport failure onto the remote error taxonomy
fn transport_error(err: reqwest::Error) -> RemoteError {
    if err.is_connect() {
        warn!("User API unreachable: {}", err);
        return RemoteError::Connectivity;
    }

    warn!("User API request failed: {}", err);
    RemoteError::Server {
        status: err.status().map(|s| s.as_u16()).unwrap_or(0),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_url_ignores_trailing_slash() {
        let client =
            HttpUserClient::new("http://localhost:8000/public/api/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.users_url(), "http://localhost:8000/public/api/user");

        let client =
            HttpUserClient::new("http://localhost:8000/public/api", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.users_url(), "http://localhost:8000/public/api/user");
    }
}
