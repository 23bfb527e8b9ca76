//! Network reachability heuristics
//!
//! The coordinator asks once, at the start of every operation, whether the
//! API is worth calling at all.

use anyhow::{Context, Result};
use reqwest::Url;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Estimate of whether the remote API can be reached right now
pub trait Reachability {
    fn is_reachable(&self) -> impl Future<Output = bool> + Send;
}

/// Reachability driven by an explicit flag
///
/// Clones share the flag, so a host can flip it from its own network
/// notifications while the coordinator holds another clone.
#[derive(Debug, Clone)]
pub struct StaticReachability {
    online: Arc<AtomicBool>,
}

impl StaticReachability {
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Reachability for StaticReachability {
    async fn is_reachable(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

/// Reachability probed by opening a TCP connection to the API host
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.to_string(),
            port,
            timeout,
        }
    }

    /// Probe the host and port the API base URL points at
    pub fn from_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(base_url).with_context(|| format!("Invalid API URL: {}", base_url))?;
        let host = url
            .host_str()
            .with_context(|| format!("API URL has no host: {}", base_url))?;
        let port = url
            .port_or_known_default()
            .with_context(|| format!("API URL has no port: {}", base_url))?;

        Ok(Self::new(host, port, timeout))
    }
}

impl Reachability for TcpProbe {
    async fn is_reachable(&self) -> bool {
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        let reachable = matches!(tokio::time::timeout(self.timeout, connect).await, Ok(Ok(_)));
        debug!("Probe {}:{} reachable: {}", self.host, self.port, reachable);
        reachable
    }
}
