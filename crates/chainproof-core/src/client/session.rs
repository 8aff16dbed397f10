//! Session client for the supply-chain canister.
//!
//! `SessionClient` owns the one authentication session of the process and
//! the actor bound to it. Every business call checks for the actor first
//! and fails with `ClientError::NotAuthenticated` without touching the
//! network when there is none.
//!
//! Each call takes a snapshot of the actor before awaiting, so a `logout`
//! racing an in-flight call lets that call finish against the old actor;
//! calls issued after `logout` returns see no actor.

use std::fmt;
use std::sync::Arc;

use candid::Principal;
use ic_agent::Identity;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, error, info, warn};

use crate::api::{
    probe_client, probe_identity_provider, ClientError, Connector, IcAgentConnector,
    SupplyChainActor,
};
use crate::auth::{Authenticator, AuthenticatorFactory, LoginOptions};
use crate::config::NetworkConfig;
use crate::models::{
    AnalyticsData, CanisterStatus, Product, ProductRegistration, ProductSearchQuery,
    ProductWithHistory, User, UserRegistration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Unauthenticated,
    Authenticated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Uninitialized => write!(f, "uninitialized"),
            SessionState::Initializing => write!(f, "initializing"),
            SessionState::Unauthenticated => write!(f, "unauthenticated"),
            SessionState::Authenticated => write!(f, "authenticated"),
        }
    }
}

struct SessionInner {
    state: SessionState,
    actor: Option<SupplyChainActor>,
}

pub struct SessionClient {
    network: NetworkConfig,
    factory: Arc<dyn AuthenticatorFactory>,
    connector: Arc<dyn Connector>,
    http: reqwest::Client,
    probe_provider: bool,
    login_options: LoginOptions,
    authenticator: OnceCell<Arc<dyn Authenticator>>,
    restored: OnceCell<()>,
    inner: RwLock<SessionInner>,
}

pub struct SessionClientBuilder {
    network: NetworkConfig,
    factory: Arc<dyn AuthenticatorFactory>,
    connector: Arc<dyn Connector>,
    probe_provider: bool,
    max_time_to_live_ns: Option<u64>,
}

impl SessionClientBuilder {
    pub fn connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    /// Check the identity provider answers before signing in (on by default)
    pub fn probe_identity_provider(mut self, probe: bool) -> Self {
        self.probe_provider = probe;
        self
    }

    pub fn max_time_to_live_ns(mut self, ttl: u64) -> Self {
        self.max_time_to_live_ns = Some(ttl);
        self
    }

    pub fn build(self) -> Result<SessionClient, ClientError> {
        let mut login_options = LoginOptions::new(self.network.identity_provider.clone());
        if let Some(ttl) = self.max_time_to_live_ns {
            login_options.max_time_to_live_ns = ttl;
        }

        Ok(SessionClient {
            http: probe_client()?,
            network: self.network,
            factory: self.factory,
            connector: self.connector,
            probe_provider: self.probe_provider,
            login_options,
            authenticator: OnceCell::new(),
            restored: OnceCell::new(),
            inner: RwLock::new(SessionInner {
                state: SessionState::Uninitialized,
                actor: None,
            }),
        })
    }
}

impl SessionClient {
    pub fn builder(
        network: NetworkConfig,
        factory: Arc<dyn AuthenticatorFactory>,
    ) -> SessionClientBuilder {
        SessionClientBuilder {
            network,
            factory,
            connector: Arc::new(IcAgentConnector),
            probe_provider: true,
            max_time_to_live_ns: None,
        }
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub async fn state(&self) -> SessionState {
        self.inner.read().await.state
    }

    async fn set_state(&self, state: SessionState) {
        self.inner.write().await.state = state;
    }

    // ===== Session lifecycle =====

    /// Construct the authenticator (once) and restore an existing session.
    /// Safe to call any number of times. A failed restore keeps the
    /// authenticator and is retried on the next call.
    pub async fn initialize(&self) -> Result<(), ClientError> {
        let auth = self.authenticator().await?;
        self.restored
            .get_or_try_init(|| self.restore(auth.as_ref()))
            .await?;
        Ok(())
    }

    async fn authenticator(&self) -> Result<Arc<dyn Authenticator>, ClientError> {
        let auth = self
            .authenticator
            .get_or_try_init(|| self.create_authenticator())
            .await?;
        Ok(Arc::clone(auth))
    }

    async fn create_authenticator(&self) -> Result<Arc<dyn Authenticator>, ClientError> {
        info!("Initializing session client");
        self.set_state(SessionState::Initializing).await;

        match self.factory.create().await {
            Ok(auth) => {
                debug!("Authenticator created");
                self.set_state(SessionState::Unauthenticated).await;
                Ok(auth)
            }
            Err(e) => {
                error!(error = %e, "Failed to create authenticator");
                self.set_state(SessionState::Uninitialized).await;
                Err(e.into())
            }
        }
    }

    async fn restore(&self, auth: &dyn Authenticator) -> Result<(), ClientError> {
        let authenticated = auth.is_authenticated().await.inspect_err(|e| {
            error!(error = %e, "Failed to check existing session");
        })?;
        debug!(authenticated, "Authentication status");

        if authenticated {
            info!("Existing session found, setting up actor");
            let actor = self.build_actor(auth).await.inspect_err(|e| {
                error!(error = %e, "Failed to restore session");
            })?;
            let mut inner = self.inner.write().await;
            inner.actor = Some(actor);
            inner.state = SessionState::Authenticated;
        }
        info!(state = %self.state().await, "Session client initialized");
        Ok(())
    }

    async fn build_actor(&self, auth: &dyn Authenticator) -> Result<SupplyChainActor, ClientError> {
        let identity = auth
            .identity()
            .await?
            .ok_or_else(|| ClientError::Identity("No identity available".to_string()))?;

        let transport = self.connector.connect(identity, &self.network.host)?;

        if self.network.requires_root_key() {
            debug!("Fetching root key for local replica");
            if let Err(e) = transport.fetch_root_key().await {
                warn!(error = %e, "Failed to fetch root key, continuing without it");
            }
        }

        let actor = SupplyChainActor::new(transport, self.network.supply_chain_canister_id);
        info!(canister = %actor.canister_id(), "Actor created");
        Ok(actor)
    }

    /// Sign in through the identity provider and bind a fresh actor.
    ///
    /// Returns true only if every step succeeded. Failures are logged and
    /// reported as false. Concurrent calls are not serialized here.
    pub async fn login(&self) -> bool {
        match self.try_login().await {
            Ok(()) => {
                info!("Login successful");
                true
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                false
            }
        }
    }

    async fn try_login(&self) -> Result<(), ClientError> {
        let auth = self.authenticator().await?;

        if self.probe_provider {
            probe_identity_provider(&self.http, &self.network.identity_provider).await?;
        }

        info!(provider = %self.login_options.identity_provider, "Starting identity provider login");
        auth.login(&self.login_options).await?;

        let actor = self.build_actor(auth.as_ref()).await?;
        let mut inner = self.inner.write().await;
        inner.actor = Some(actor);
        inner.state = SessionState::Authenticated;
        Ok(())
    }

    /// Sign out. The actor is dropped whether or not sign-out succeeded.
    pub async fn logout(&self) {
        info!("Logging out");
        if let Some(auth) = self.authenticator.get() {
            if let Err(e) = auth.logout().await {
                warn!(error = %e, "Logout failed");
            }
        }

        let mut inner = self.inner.write().await;
        inner.actor = None;
        if inner.state != SessionState::Uninitialized {
            inner.state = SessionState::Unauthenticated;
        }
    }

    /// Ask the authenticator. Unreachable authenticator means false.
    pub async fn is_authenticated(&self) -> bool {
        let auth = match self.authenticator().await {
            Ok(auth) => auth,
            Err(e) => {
                warn!(error = %e, "Failed to check authentication");
                return false;
            }
        };
        match auth.is_authenticated().await {
            Ok(authenticated) => {
                debug!(authenticated, "Current authentication status");
                authenticated
            }
            Err(e) => {
                warn!(error = %e, "Failed to check authentication");
                false
            }
        }
    }

    pub async fn identity(&self) -> Result<Option<Arc<dyn Identity>>, ClientError> {
        let auth = self.authenticator().await?;
        Ok(auth.identity().await?)
    }

    pub async fn principal(&self) -> Option<Principal> {
        let identity = match self.identity().await {
            Ok(Some(identity)) => identity,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to get identity");
                return None;
            }
        };
        match identity.sender() {
            Ok(principal) => {
                debug!(principal = %principal, "User principal");
                Some(principal)
            }
            Err(e) => {
                warn!(error = %e, "Failed to get principal");
                None
            }
        }
    }

    // ===== Supply chain calls =====

    async fn actor(&self) -> Result<SupplyChainActor, ClientError> {
        self.inner
            .read()
            .await
            .actor
            .clone()
            .ok_or(ClientError::NotAuthenticated)
    }

    /// Health check against `get_canister_status`; never fails.
    pub async fn test_connection(&self) -> bool {
        let actor = match self.actor().await {
            Ok(actor) => actor,
            Err(_) => {
                warn!("No actor available for testing");
                return false;
            }
        };
        match actor.get_canister_status().await {
            Ok(status) => {
                info!(version = %status.version, "Canister connection test successful");
                true
            }
            Err(e) => {
                error!(error = %e, "Canister connection test failed");
                false
            }
        }
    }

    pub async fn register_user(&self, registration: &UserRegistration) -> Result<User, ClientError> {
        let actor = self.actor().await?;
        debug!(email = %registration.email, role = %registration.role, "Registering user");
        actor.register_user(registration).await
    }

    /// Re-checks the session right before the update and fails with
    /// `AuthenticationExpired` if it lapsed.
    pub async fn register_product(
        &self,
        registration: &ProductRegistration,
    ) -> Result<String, ClientError> {
        let actor = self.actor().await?;
        debug!(name = %registration.name, "Registering product");

        if !self.is_authenticated().await {
            error!("Product registration aborted, authentication expired");
            return Err(ClientError::AuthenticationExpired);
        }

        match actor.register_product(registration).await {
            Ok(id) => {
                info!(product_id = %id, "Product registered");
                Ok(id)
            }
            Err(e) => {
                error!(error = %e, "Product registration error");
                Err(e)
            }
        }
    }

    pub async fn get_product(&self, product_id: &str) -> Result<ProductWithHistory, ClientError> {
        let actor = self.actor().await?;
        debug!(product_id, "Getting product");
        actor.get_product(product_id).await.inspect_err(|e| {
            error!(product_id, error = %e, "Get product error");
        })
    }

    pub async fn get_analytics(&self) -> Result<AnalyticsData, ClientError> {
        let actor = self.actor().await?;
        debug!("Getting analytics");
        actor.get_analytics().await
    }

    pub async fn get_canister_status(&self) -> Result<CanisterStatus, ClientError> {
        let actor = self.actor().await?;
        debug!("Getting canister status");
        actor.get_canister_status().await
    }

    pub async fn get_user(&self) -> Result<User, ClientError> {
        let actor = self.actor().await?;
        debug!("Getting user");
        actor.get_user().await
    }

    pub async fn get_user_products(&self) -> Result<Vec<Product>, ClientError> {
        let actor = self.actor().await?;
        debug!("Getting user products");
        actor.get_user_products().await
    }

    pub async fn get_all_products(&self) -> Result<Vec<Product>, ClientError> {
        let actor = self.actor().await?;
        debug!("Getting all products");
        actor.get_all_products().await
    }

    pub async fn search_products(
        &self,
        query: &ProductSearchQuery,
    ) -> Result<Vec<Product>, ClientError> {
        let actor = self.actor().await?;
        debug!(?query, "Searching products");
        let products = actor.search_products(query).await.inspect_err(|e| {
            error!(error = %e, "Search products error");
        })?;
        debug!(count = products.len(), "Search results");
        Ok(products)
    }
}
