// src/gateway/transport.rs

//! HTTP transport for the MCP gateway.
//!
//! Owns the logical link to the downstream service: a liveness-probed
//! session and one JSON-RPC round trip per call. Retry policy, caching and
//! rate limiting all live above this layer.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::gateway::protocol::{RpcRequest, RpcResponse};

/// HTTP transport for the MCP gateway.
pub struct HttpTransport {
    http: Client,
    base_url: Url,
    ready: AtomicBool,
    /// Opaque session token, generated locally on a successful probe.
    /// There is no cryptographic handshake with the gateway.
    session: RwLock<Option<String>>,
    request_counter: AtomicU64,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            // Per-request deadlines are imposed by the gateway client, not
            // by reqwest itself.
            http: Client::new(),
            base_url: config.base_url.clone(),
            ready: AtomicBool::new(false),
            session: RwLock::new(None),
            request_counter: AtomicU64::new(0),
            retry_attempts: config.connect_retry_attempts,
            retry_delay: config.connect_retry_delay,
        }
    }

    /// Generate a unique request ID
    fn next_request_id(&self) -> String {
        let id = self.request_counter.fetch_add(1, Ordering::Relaxed);
        format!("req-{}", id)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::connection(format!("invalid gateway URL: {}", e)))
    }

    /// Probe the gateway's health endpoint and establish a session.
    ///
    /// Retries the probe up to the configured attempt count with the
    /// configured delay in between. On success the transport is marked
    /// ready and the session token is returned; on exhaustion the state is
    /// left unready and the last cause is reported.
    pub async fn connect(&self) -> Result<String> {
        let health_url = self.endpoint("health")?;
        let attempts = self.retry_attempts.max(1);
        let mut last_failure = String::new();

        for attempt in 1..=attempts {
            debug!(url = %health_url, attempt, "probing gateway health");

            match self.http.get(health_url.clone()).send().await {
                Ok(response) if response.status().is_success() => {
                    let token = uuid::Uuid::new_v4().to_string();
                    *self.session.write() = Some(token.clone());
                    self.ready.store(true, Ordering::SeqCst);
                    debug!(session = %token, "gateway transport connected");
                    return Ok(token);
                }
                Ok(response) => {
                    last_failure = format!("health check returned status {}", response.status());
                    warn!(status = %response.status(), attempt, "gateway health check failed");
                }
                Err(e) => {
                    last_failure = format!("health check failed: {}", e);
                    warn!(error = %e, attempt, "gateway unreachable");
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        self.ready.store(false, Ordering::SeqCst);
        Err(Error::connection(last_failure))
    }

    /// Perform one JSON-RPC round trip. Requires a prior successful
    /// [`connect`](Self::connect).
    ///
    /// Returns the `result` field of the response body verbatim; typing it
    /// is the gateway client's responsibility.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value> {
        if !self.is_connected() {
            return Err(Error::connection("transport is not connected"));
        }

        let request_id = self.next_request_id();
        let rpc_url = self.endpoint("rpc")?;
        let envelope = RpcRequest::new(request_id.clone(), method, params);

        debug!(url = %rpc_url, request_id = %request_id, method, "dispatching gateway request");

        let response = self
            .http
            .post(rpc_url)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(Duration::from_secs(30))
                } else {
                    Error::request(format!("request failed to send: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                format!("gateway returned status {}", status)
            } else {
                body
            };
            return Err(Error::request_with_status(message, status.as_u16()));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| Error::request(format!("invalid gateway response: {}", e)))?;

        if let Some(err) = body.error {
            return Err(Error::request(err.message));
        }

        body.result
            .ok_or_else(|| Error::request("gateway response carried neither result nor error"))
    }

    /// Release the session and mark the transport not ready. Idempotent.
    pub fn close(&self) {
        self.ready.store(false, Ordering::SeqCst);
        *self.session.write() = None;
    }

    pub fn is_connected(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// The current session token, if connected.
    pub fn session(&self) -> Option<String> {
        self.session.read().clone()
    }
}
