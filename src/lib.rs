// src/lib.rs

//! Client for the Sei MCP gateway.
//!
//! [`GatewayClient`] is the single entry point: it connects lazily (sharing
//! one in-flight handshake across concurrent callers), serves fresh reads
//! from a TTL cache, admits requests through a sliding-window rate limiter
//! and surfaces every failure as a typed [`Error`]. The [`query`] module
//! extracts addresses, hashes, symbols and intent from free-text queries.

pub mod config;
pub mod error;
pub mod gateway;
pub mod query;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use gateway::{ConnectionState, GatewayClient};
