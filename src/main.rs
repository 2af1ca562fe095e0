// src/main.rs

//! One-shot CLI: parse a free-text query, route it to the matching gateway
//! operation and print the JSON result.

use std::env;
use std::process::ExitCode;

use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sei_mcp_client::query::{
    classify_intent, extract_token_symbol, extract_transaction_hash, extract_wallet_address,
    QueryIntent,
};
use sei_mcp_client::{ClientConfig, Error, GatewayClient};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let query: String = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.is_empty() {
        eprintln!("usage: sei_mcp_client <free-text query>");
        return ExitCode::FAILURE;
    }

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let client = GatewayClient::new(config);
    let outcome = run_query(&client, &query).await;
    client.close().await;

    match outcome {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
            ExitCode::SUCCESS
        }
        Err(e) => {
            let retry_hint = if e.is_recoverable() { " (worth retrying)" } else { "" };
            eprintln!("{e}{retry_hint}");
            ExitCode::FAILURE
        }
    }
}

async fn run_query(client: &GatewayClient, query: &str) -> Result<serde_json::Value, Error> {
    let intent = classify_intent(query);
    debug!(?intent, query, "routing query");

    match intent {
        QueryIntent::Wallet => {
            let Some(address) = extract_wallet_address(query) else {
                return Err(Error::request(
                    "no wallet address found in query; expected 0x... or sei1...",
                ));
            };
            let balance = client.get_balance(&address, None).await?;
            Ok(json!({ "address": address, "balance": balance }))
        }
        QueryIntent::Transaction => {
            let Some(hash) = extract_transaction_hash(query) else {
                return Err(Error::request("no transaction hash found in query"));
            };
            let tx = client.get_transaction(&hash, None).await?;
            Ok(json!({ "transaction": tx }))
        }
        QueryIntent::Nft | QueryIntent::TokenFlow | QueryIntent::General => {
            // Without a tool match the chat layer would fall through to the
            // language model; here we can at least report chain state and
            // what the parser saw.
            let info = client.get_chain_info(None).await?;
            Ok(json!({
                "chain": info,
                "parsed": {
                    "intent": format!("{:?}", intent),
                    "symbol": extract_token_symbol(query),
                }
            }))
        }
    }
}
