//! Identity authenticator seam and its keychain-backed implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ic_agent::identity::{BasicIdentity, Secp256k1Identity};
use ic_agent::Identity;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::session::{Session, SessionData, DEFAULT_MAX_TIME_TO_LIVE_NS};
use super::CredentialStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOptions {
    pub identity_provider: String,
    pub max_time_to_live_ns: u64,
}

impl LoginOptions {
    pub fn new(identity_provider: impl Into<String>) -> Self {
        Self {
            identity_provider: identity_provider.into(),
            max_time_to_live_ns: DEFAULT_MAX_TIME_TO_LIVE_NS,
        }
    }
}

/// External identity authenticator. The session client treats it as an
/// opaque authority: it only asks whether a session exists, for the
/// identity behind it, and to sign in or out.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn is_authenticated(&self) -> Result<bool>;

    /// Current identity, `None` when signed out
    async fn identity(&self) -> Result<Option<Arc<dyn Identity>>>;

    async fn login(&self, options: &LoginOptions) -> Result<()>;

    async fn logout(&self) -> Result<()>;
}

#[async_trait]
pub trait AuthenticatorFactory: Send + Sync {
    async fn create(&self) -> Result<Arc<dyn Authenticator>>;
}

/// Parse a PEM identity key. dfx exports Ed25519 or secp256k1 keys.
pub fn identity_from_pem(pem: &str) -> Result<Arc<dyn Identity>> {
    if let Ok(identity) = BasicIdentity::from_pem(pem.as_bytes()) {
        return Ok(Arc::new(identity));
    }
    let identity = Secp256k1Identity::from_pem(pem.as_bytes())
        .context("Identity PEM is neither an Ed25519 nor a secp256k1 key")?;
    Ok(Arc::new(identity))
}

/// Authenticator for native processes.
///
/// Login imports the PEM key at `pem_path` into the OS keychain and
/// writes a session record with an expiry to the cache directory. Later
/// processes pick the identity back up from the keychain (or the PEM file
/// if the keychain is unavailable) for as long as the session is valid.
pub struct KeyringAuthenticator {
    pem_path: Option<PathBuf>,
    credentials: CredentialStore,
    session: Mutex<Session>,
    identity: Mutex<Option<Arc<dyn Identity>>>,
}

impl KeyringAuthenticator {
    pub fn new(cache_dir: PathBuf, pem_path: Option<PathBuf>, account: impl Into<String>) -> Self {
        Self {
            pem_path,
            credentials: CredentialStore::new(account),
            session: Mutex::new(Session::new(cache_dir)),
            identity: Mutex::new(None),
        }
    }

    fn read_pem_file(&self) -> Result<String> {
        let path = self.pem_path.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "No identity PEM configured - set identity_pem in the config file or CHAINPROOF_IDENTITY_PEM"
            )
        })?;
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read identity PEM {}", path.display()))
    }

    /// The in-memory session wins while it is valid; otherwise fall back to
    /// the record on disk, which another process may have written
    async fn session_valid(&self) -> Result<bool> {
        let mut session = self.session.lock().await;
        if session.is_valid() {
            return Ok(true);
        }
        session.load()
    }

    /// Resolve the stored identity: memory, then keychain, then PEM file
    async fn load_identity(&self) -> Result<Option<Arc<dyn Identity>>> {
        let mut cached = self.identity.lock().await;
        if let Some(ref identity) = *cached {
            return Ok(Some(Arc::clone(identity)));
        }

        let pem = match self.credentials.get_pem() {
            Ok(pem) => pem,
            Err(e) => {
                debug!(error = %e, "No identity in keychain, trying PEM file");
                match self.read_pem_file() {
                    Ok(pem) => pem,
                    Err(_) => return Ok(None),
                }
            }
        };

        let identity = identity_from_pem(&pem)?;
        *cached = Some(Arc::clone(&identity));
        Ok(Some(identity))
    }
}

#[async_trait]
impl Authenticator for KeyringAuthenticator {
    async fn is_authenticated(&self) -> Result<bool> {
        if !self.session_valid().await? {
            return Ok(false);
        }
        Ok(self.load_identity().await?.is_some())
    }

    async fn identity(&self) -> Result<Option<Arc<dyn Identity>>> {
        if !self.session_valid().await? {
            return Ok(None);
        }
        self.load_identity().await
    }

    async fn login(&self, options: &LoginOptions) -> Result<()> {
        info!(provider = %options.identity_provider, "Signing in with identity key");
        let pem = self.read_pem_file()?;
        let identity = identity_from_pem(&pem)?;
        let principal = identity
            .sender()
            .map_err(|e| anyhow::anyhow!("Failed to derive principal: {}", e))?;

        if let Err(e) = self.credentials.store_pem(&pem) {
            warn!(error = %e, "Failed to store identity in keychain");
        }

        {
            let mut session = self.session.lock().await;
            session.update(SessionData::new(
                principal.to_text(),
                options.identity_provider.clone(),
                options.max_time_to_live_ns,
            ));
            if let Err(e) = session.save() {
                warn!(error = %e, "Failed to save session");
            }
        }

        *self.identity.lock().await = Some(identity);
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        *self.identity.lock().await = None;
        self.session.lock().await.clear()?;
        if self.credentials.has_identity() {
            self.credentials.delete()?;
        }
        Ok(())
    }
}

/// Builds a `KeyringAuthenticator` scoped to one network's cache dir.
pub struct KeyringAuthenticatorFactory {
    pub cache_dir: PathBuf,
    pub pem_path: Option<PathBuf>,
    pub account: String,
}

#[async_trait]
impl AuthenticatorFactory for KeyringAuthenticatorFactory {
    async fn create(&self) -> Result<Arc<dyn Authenticator>> {
        std::fs::create_dir_all(&self.cache_dir).context("Failed to create cache directory")?;
        Ok(Arc::new(KeyringAuthenticator::new(
            self.cache_dir.clone(),
            self.pem_path.clone(),
            self.account.clone(),
        )))
    }
}
