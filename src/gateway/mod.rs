// src/gateway/mod.rs

pub mod cache;
pub mod client;
pub mod models;
pub mod protocol;
pub mod rate_limit;
pub mod transport;

pub use client::{ConnectionState, GatewayClient};
