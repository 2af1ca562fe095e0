// src/gateway/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Typed views over the gateway's raw `result` payloads. Each is freshly
// constructed from one response; a payload that does not decode fully is a
// request error, never a partially populated "success".

// --- Balance Models ---

/// Balance of an address, in the chain's smallest denomination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Balance {
    pub amount: String,
    pub denom: String,
}

// --- Transaction Models ---

/// A single transaction as reported by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    pub value: String,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Execution receipt for a mined transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub tx_hash: String,
    #[serde(default)]
    pub block_number: Option<u64>,
    pub gas_used: String,
    /// `true` when the transaction succeeded on chain.
    pub status: bool,
    #[serde(default)]
    pub logs: Vec<Value>,
}

/// Acknowledgement of a submitted transfer or contract write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub tx_hash: String,
}

// --- Token Models ---

/// ERC20 token metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u64,
    pub contract_address: String,
    #[serde(default)]
    pub total_supply: Option<String>,
}

/// ERC721 token metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftMetadata {
    pub contract_address: String,
    pub token_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

// --- Fee Estimation Models ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasEstimate {
    pub estimated_gas: String,
    pub gas_price: String,
    #[serde(default)]
    pub total_fee: Option<String>,
    #[serde(default)]
    pub denom: Option<String>,
}

// --- Chain Models ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainInfo {
    pub network: String,
    pub chain_id: String,
    #[serde(default)]
    pub latest_block: Option<u64>,
}
