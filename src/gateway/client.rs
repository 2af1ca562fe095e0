// src/gateway/client.rs

//! The gateway client: sole entry point for MCP domain operations.
//!
//! Composes the transport, response cache and rate limiter, translating
//! every failure into the typed taxonomy in [`crate::error`]. Callers never
//! manage connection state directly; any operation may be invoked in any
//! state and connects lazily.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::gateway::cache::ResponseCache;
use crate::gateway::models::{
    Balance, ChainInfo, GasEstimate, NftMetadata, TokenInfo, Transaction, TransactionReceipt,
    TransactionResponse,
};
use crate::gateway::rate_limit::RateLimiter;
use crate::gateway::transport::HttpTransport;

/// Identifier used for rate limiting when the caller has not supplied one.
const GLOBAL_IDENTIFIER: &str = "global";

/// State of the logical connection to the MCP gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

type SharedConnect = Shared<BoxFuture<'static, Result<()>>>;

/// Client for the Sei MCP gateway.
///
/// Cheap to clone; all clones share the same connection, cache and rate
/// windows.
#[derive(Clone)]
pub struct GatewayClient {
    config: Arc<ClientConfig>,
    transport: Arc<HttpTransport>,
    cache: Arc<ResponseCache>,
    limiter: Arc<RateLimiter>,
    state: Arc<RwLock<ConnectionState>>,
    /// Connection attempt currently in flight, joined by every caller that
    /// needs the transport while it is pending.
    inflight: Arc<Mutex<Option<SharedConnect>>>,
}

impl GatewayClient {
    pub fn new(config: ClientConfig) -> Self {
        let transport = Arc::new(HttpTransport::new(&config));
        let cache = Arc::new(ResponseCache::new(config.cache_ttl));
        let limiter = Arc::new(RateLimiter::new(
            config.rate_limit_per_minute,
            config.rate_limit_window,
        ));
        Self {
            config: Arc::new(config),
            transport,
            cache,
            limiter,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            inflight: Arc::new(Mutex::new(None)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Establish the gateway connection now instead of on first use.
    pub async fn connect(&self) -> Result<()> {
        self.ensure_connected().await
    }

    /// Make sure the transport is connected, performing at most one
    /// underlying handshake no matter how many callers arrive concurrently.
    ///
    /// A caller that finds an attempt already pending awaits that same
    /// attempt and observes its outcome. The slot is cleared once the
    /// attempt resolves, so a later call after a failure retries the
    /// handshake from scratch.
    async fn ensure_connected(&self) -> Result<()> {
        if self.state() == ConnectionState::Connected {
            return Ok(());
        }

        let (attempt, initiated) = {
            let mut inflight = self.inflight.lock().await;
            // A racing caller may have finished connecting while we waited
            // for the registration lock.
            if self.state() == ConnectionState::Connected {
                return Ok(());
            }
            match inflight.as_ref() {
                Some(pending) => (pending.clone(), false),
                None => {
                    *self.state.write() = ConnectionState::Connecting;
                    let transport = Arc::clone(&self.transport);
                    let state = Arc::clone(&self.state);
                    let attempt: SharedConnect = async move {
                        match transport.connect().await {
                            Ok(session) => {
                                *state.write() = ConnectionState::Connected;
                                info!(session = %session, "connected to MCP gateway");
                                Ok(())
                            }
                            Err(e) => {
                                *state.write() = ConnectionState::Disconnected;
                                warn!(error = %e, "gateway connection failed");
                                Err(e)
                            }
                        }
                    }
                    .boxed()
                    .shared();
                    *inflight = Some(attempt.clone());
                    (attempt, true)
                }
            }
        };

        let outcome = attempt.await;
        if initiated {
            self.inflight.lock().await.take();
        }
        outcome
    }

    /// Dispatch one named operation against the gateway.
    ///
    /// Cacheable calls are served from the response cache when fresh; a hit
    /// consumes no rate-limit slot and never touches the transport. On a
    /// miss the call must pass rate-limit admission before the transport is
    /// involved, and the whole round trip runs under the configured
    /// per-request deadline.
    pub async fn call(&self, method: &str, params: Value, cacheable: bool) -> Result<Value> {
        let key = cache_key(method, &params);

        if cacheable {
            if let Some(value) = self.cache.get(&key) {
                debug!(method, "gateway result served from cache");
                return Ok(value);
            }
        }

        if !self.limiter.can_admit(GLOBAL_IDENTIFIER) {
            warn!(method, "request rejected by rate limiter");
            return Err(Error::rate_limited());
        }

        self.ensure_connected().await?;
        self.limiter.record(GLOBAL_IDENTIFIER);

        let request = self.transport.request(method, params);
        let result = match tokio::time::timeout(self.config.request_timeout, request).await {
            Ok(result) => result?,
            Err(_) => return Err(Error::Timeout(self.config.request_timeout)),
        };

        if cacheable {
            self.cache.set(key, result.clone());
        }
        Ok(result)
    }

    fn network<'a>(&'a self, network: Option<&'a str>) -> &'a str {
        network.unwrap_or(&self.config.default_network)
    }

    // --- Read operations (cacheable) ---

    /// Native balance of an address.
    pub async fn get_balance(&self, address: &str, network: Option<&str>) -> Result<Balance> {
        let params = json!({ "address": address, "network": self.network(network) });
        let raw = self.call("get_balance", params, true).await?;
        decode("get_balance", raw)
    }

    /// ERC20 balance of an owner for a given token contract.
    pub async fn get_erc20_balance(
        &self,
        contract_address: &str,
        owner: &str,
        network: Option<&str>,
    ) -> Result<Balance> {
        let params = json!({
            "contract_address": contract_address,
            "owner": owner,
            "network": self.network(network),
        });
        let raw = self.call("get_erc20_balance", params, true).await?;
        decode("get_erc20_balance", raw)
    }

    pub async fn get_transaction(&self, hash: &str, network: Option<&str>) -> Result<Transaction> {
        let params = json!({ "hash": hash, "network": self.network(network) });
        let raw = self.call("get_transaction", params, true).await?;
        decode("get_transaction", raw)
    }

    pub async fn get_transaction_receipt(
        &self,
        hash: &str,
        network: Option<&str>,
    ) -> Result<TransactionReceipt> {
        let params = json!({ "hash": hash, "network": self.network(network) });
        let raw = self.call("get_transaction_receipt", params, true).await?;
        decode("get_transaction_receipt", raw)
    }

    pub async fn get_erc20_token_info(
        &self,
        contract_address: &str,
        network: Option<&str>,
    ) -> Result<TokenInfo> {
        let params = json!({
            "contract_address": contract_address,
            "network": self.network(network),
        });
        let raw = self.call("get_erc20_token_info", params, true).await?;
        decode("get_erc20_token_info", raw)
    }

    pub async fn get_erc721_token_metadata(
        &self,
        contract_address: &str,
        token_id: &str,
        network: Option<&str>,
    ) -> Result<NftMetadata> {
        let params = json!({
            "contract_address": contract_address,
            "token_id": token_id,
            "network": self.network(network),
        });
        let raw = self.call("get_erc721_token_metadata", params, true).await?;
        decode("get_erc721_token_metadata", raw)
    }

    /// Whether the address carries contract code.
    pub async fn is_contract(&self, address: &str, network: Option<&str>) -> Result<bool> {
        let params = json!({ "address": address, "network": self.network(network) });
        let raw = self.call("is_contract", params, true).await?;
        decode("is_contract", raw)
    }

    /// Call a read-only contract method. The decoded return value stays
    /// untyped; its shape depends on the contract.
    pub async fn read_contract(
        &self,
        contract_address: &str,
        method: &str,
        args: Value,
        network: Option<&str>,
    ) -> Result<Value> {
        let params = json!({
            "contract_address": contract_address,
            "method": method,
            "args": args,
            "network": self.network(network),
        });
        self.call("read_contract", params, true).await
    }

    pub async fn get_chain_info(&self, network: Option<&str>) -> Result<ChainInfo> {
        let params = json!({ "network": self.network(network) });
        let raw = self.call("get_chain_info", params, true).await?;
        decode("get_chain_info", raw)
    }

    // --- Volatile reads ---

    /// Estimate gas for a transfer. Estimates track pending chain state, so
    /// they are never served from cache.
    pub async fn estimate_gas(
        &self,
        from: &str,
        to: &str,
        amount: &str,
        network: Option<&str>,
    ) -> Result<GasEstimate> {
        let params = json!({
            "from": from,
            "to": to,
            "amount": amount,
            "network": self.network(network),
        });
        let raw = self.call("estimate_gas", params, false).await?;
        decode("estimate_gas", raw)
    }

    // --- Mutations (never cached, never deduplicated) ---

    pub async fn transfer_native(
        &self,
        to: &str,
        amount: &str,
        network: Option<&str>,
    ) -> Result<TransactionResponse> {
        let params = json!({ "to": to, "amount": amount, "network": self.network(network) });
        let raw = self.call("transfer_native", params, false).await?;
        decode("transfer_native", raw)
    }

    pub async fn transfer_erc20(
        &self,
        contract_address: &str,
        to: &str,
        amount: &str,
        network: Option<&str>,
    ) -> Result<TransactionResponse> {
        let params = json!({
            "contract_address": contract_address,
            "to": to,
            "amount": amount,
            "network": self.network(network),
        });
        let raw = self.call("transfer_erc20", params, false).await?;
        decode("transfer_erc20", raw)
    }

    pub async fn transfer_nft(
        &self,
        contract_address: &str,
        to: &str,
        token_id: &str,
        network: Option<&str>,
    ) -> Result<TransactionResponse> {
        let params = json!({
            "contract_address": contract_address,
            "to": to,
            "token_id": token_id,
            "network": self.network(network),
        });
        let raw = self.call("transfer_nft", params, false).await?;
        decode("transfer_nft", raw)
    }

    pub async fn approve_erc20(
        &self,
        contract_address: &str,
        spender: &str,
        amount: &str,
        network: Option<&str>,
    ) -> Result<TransactionResponse> {
        let params = json!({
            "contract_address": contract_address,
            "spender": spender,
            "amount": amount,
            "network": self.network(network),
        });
        let raw = self.call("approve_erc20", params, false).await?;
        decode("approve_erc20", raw)
    }

    pub async fn write_contract(
        &self,
        contract_address: &str,
        method: &str,
        args: Value,
        network: Option<&str>,
    ) -> Result<TransactionResponse> {
        let params = json!({
            "contract_address": contract_address,
            "method": method,
            "args": args,
            "network": self.network(network),
        });
        let raw = self.call("write_contract", params, false).await?;
        decode("write_contract", raw)
    }

    // --- Operations the gateway does not provide ---
    //
    // These fail before any dispatch so callers get an immediate, clear
    // signal instead of a method-not-found from the server.

    /// Full wallet transaction history is not exposed by the gateway.
    pub async fn get_transaction_history(
        &self,
        _address: &str,
        _limit: u64,
        _network: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        Err(Error::unsupported("get_transaction_history"))
    }

    /// Aggregate token-flow analytics are not exposed by the gateway.
    pub async fn get_token_flows(
        &self,
        _address: &str,
        _network: Option<&str>,
    ) -> Result<Value> {
        Err(Error::unsupported("get_token_flows"))
    }

    /// Full NFT provenance is not exposed by the gateway.
    pub async fn get_nft_provenance(
        &self,
        _contract_address: &str,
        _token_id: &str,
        _network: Option<&str>,
    ) -> Result<Value> {
        Err(Error::unsupported("get_nft_provenance"))
    }

    /// Drop any in-flight connection attempt, close the transport and clear
    /// the cache.
    pub async fn close(&self) {
        self.inflight.lock().await.take();
        self.transport.close();
        self.cache.clear();
        *self.state.write() = ConnectionState::Disconnected;
        debug!("gateway client closed");
    }
}

/// Deterministic cache key: operation name plus the canonical rendering of
/// its parameters. `serde_json` objects serialize with sorted keys, so
/// semantically identical calls collide as required.
fn cache_key(method: &str, params: &Value) -> String {
    format!("{}:{}", method, params)
}

fn decode<T: DeserializeOwned>(operation: &str, raw: Value) -> Result<T> {
    serde_json::from_value(raw)
        .map_err(|e| Error::request(format!("invalid {} result from gateway: {}", operation, e)))
}
