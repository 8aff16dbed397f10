//! Chainproof core library.
//!
//! Session client and typed bindings for the supply-chain registry
//! canister on the Internet Computer:
//!
//! - `client`: `SessionClient`, the single entry point used by front ends
//! - `api`: Candid actor, call transport over `ic-agent`, error types
//! - `auth`: authenticator seam, keychain-backed identity, session record
//! - `models`: registry records as declared by the canister interface
//! - `config`: network selection and per-user settings

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod models;
pub mod utils;

#[cfg(test)]
mod testing;

pub use api::{ClientError, SupplyChainActor, TransportError};
pub use client::{SessionClient, SessionState};
pub use config::{Config, NetworkConfig, NetworkMode};
