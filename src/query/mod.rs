// src/query/mod.rs

//! Free-text query parsing: extract structured parameters and classify
//! intent. Pure functions, no state, no I/O — every extractor returns an
//! explicit not-found value instead of erroring, so callers can prompt for
//! the missing piece.

pub mod address;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEX_ADDRESS: Regex = Regex::new(r"0x[a-fA-F0-9]{40}\b").expect("static regex");
    static ref BECH32_ADDRESS: Regex =
        Regex::new(r"\bsei1[02-9ac-hj-np-z]{38,58}\b").expect("static regex");
    static ref PREFIXED_TX_HASH: Regex = Regex::new(r"0x[a-fA-F0-9]{64}\b").expect("static regex");
    static ref BARE_TX_HASH: Regex = Regex::new(r"\b[a-fA-F0-9]{64}\b").expect("static regex");
    static ref SYMBOL_MARKER: Regex = Regex::new(r"\$([A-Za-z0-9]{1,12})\b").expect("static regex");
    static ref UPPERCASE_WORD: Regex = Regex::new(r"\b[A-Z]{2,6}\b").expect("static regex");
    // Symbols the Sei ecosystem uses most; matched before the generic
    // uppercase-word fallback.
    static ref KNOWN_SYMBOL: Regex =
        Regex::new(r"\b(SEI|USDC|USDT|WSEI|WETH|WBTC|ATOM|OSMO)\b").expect("static regex");
}

/// Uppercase words that read like symbols but never are.
const SYMBOL_STOPLIST: &[&str] = &["NFT", "DEX", "APY", "TVL", "ERC", "MCP", "RPC", "TX"];

/// DEX names recognised in free text.
const KNOWN_DEXES: &[&str] = &["dragonswap", "astroport", "fuzio", "jellyverse", "yaka"];

/// Time window a query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

/// Coarse intent of a free-text query, used to pick the matching gateway
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryIntent {
    Wallet,
    TokenFlow,
    Nft,
    Transaction,
    #[default]
    General,
}

/// Extract a wallet address: a 0x-prefixed 40-hex-digit address first, a
/// `sei1` bech32-shaped address second. First match wins.
pub fn extract_wallet_address(text: &str) -> Option<String> {
    if let Some(m) = HEX_ADDRESS.find(text) {
        return Some(m.as_str().to_string());
    }
    BECH32_ADDRESS
        .find(&text.to_ascii_lowercase())
        .map(|m| m.as_str().to_string())
}

/// Extract a transaction hash: 0x-prefixed 64 hex digits, or a bare
/// 64-character hex word.
pub fn extract_transaction_hash(text: &str) -> Option<String> {
    if let Some(m) = PREFIXED_TX_HASH.find(text) {
        return Some(m.as_str().to_string());
    }
    BARE_TX_HASH.find(text).map(|m| m.as_str().to_string())
}

/// Extract a token symbol. An explicit `$SYMBOL` marker wins, then the
/// known-symbol allow-list, then any uppercase word not on the stop-list.
pub fn extract_token_symbol(text: &str) -> Option<String> {
    if let Some(caps) = SYMBOL_MARKER.captures(text) {
        return Some(caps[1].to_ascii_uppercase());
    }

    let upper = text.to_ascii_uppercase();
    if let Some(m) = KNOWN_SYMBOL.find(&upper) {
        return Some(m.as_str().to_string());
    }

    UPPERCASE_WORD
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|word| !SYMBOL_STOPLIST.contains(word))
        .map(|word| word.to_string())
}

/// Map a timeframe keyword to its window, defaulting to [`Timeframe::Day`].
pub fn extract_timeframe(text: &str) -> Timeframe {
    let lower = text.to_ascii_lowercase();
    if lower.contains("hour") {
        Timeframe::Hour
    } else if lower.contains("week") || lower.contains("7d") {
        Timeframe::Week
    } else if lower.contains("month") || lower.contains("30d") {
        Timeframe::Month
    } else {
        Timeframe::Day
    }
}

/// Extract a known DEX name.
pub fn extract_dex_name(text: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    KNOWN_DEXES
        .iter()
        .find(|dex| lower.contains(*dex))
        .map(|dex| (*dex).to_string())
}

/// Classify the query by keyword groups, in fixed priority order:
/// wallet > token-flow > NFT > transaction > general.
pub fn classify_intent(text: &str) -> QueryIntent {
    const WALLET: &[&str] = &["balance", "wallet", "holdings", "portfolio", "funds"];
    const TOKEN_FLOW: &[&str] = &["flow", "flows", "volume", "liquidity", "swap", "swaps"];
    const NFT: &[&str] = &["nft", "nfts", "erc721", "collectible", "collectibles"];
    const TRANSACTION: &[&str] = &[
        "transaction",
        "transactions",
        "tx",
        "hash",
        "receipt",
        "transfer",
        "transfers",
    ];

    let lower = text.to_ascii_lowercase();
    let words: Vec<&str> = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .collect();
    let mentions = |group: &[&str]| group.iter().any(|k| words.contains(k));

    if mentions(WALLET) {
        QueryIntent::Wallet
    } else if mentions(TOKEN_FLOW) {
        QueryIntent::TokenFlow
    } else if mentions(NFT) {
        QueryIntent::Nft
    } else if mentions(TRANSACTION) {
        QueryIntent::Transaction
    } else {
        QueryIntent::General
    }
}
