//! Authentication module for identity sessions.
//!
//! This module provides:
//! - `Authenticator` / `AuthenticatorFactory`: the seam the session client
//!   drives for sign-in, sign-out and identity lookup
//! - `KeyringAuthenticator`: PEM identity kept in the OS keychain
//! - `Session`: on-disk session record with an expiry (7 days by default)
//! - `CredentialStore`: keychain access via keyring

pub mod authenticator;
pub mod credentials;
pub mod session;

pub use authenticator::{
    identity_from_pem, Authenticator, AuthenticatorFactory, KeyringAuthenticator,
    KeyringAuthenticatorFactory, LoginOptions,
};
pub use credentials::CredentialStore;
pub use session::{Session, SessionData, DEFAULT_MAX_TIME_TO_LIVE_NS};
