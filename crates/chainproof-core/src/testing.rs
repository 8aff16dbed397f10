//! In-memory fakes for the transport and authenticator seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use candid::Principal;
use ic_agent::identity::AnonymousIdentity;
use ic_agent::Identity;

use crate::api::{CallTransport, Connector, TransportError};
use crate::auth::{Authenticator, AuthenticatorFactory, LoginOptions};
use crate::models::{CanisterStatus, Product, ProductRegistration, ProductStatus};

type Reply = Result<Vec<u8>, TransportError>;

/// Transport that serves canned replies per method and records calls.
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<(&'static str, String)>>,
    pub root_key_calls: AtomicUsize,
    pub fail_root_key: AtomicBool,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, method: &str, bytes: Vec<u8>) {
        self.replies.lock().unwrap().insert(method.to_string(), Ok(bytes));
    }

    pub fn fail(&self, method: &str, err: TransportError) {
        self.replies.lock().unwrap().insert(method.to_string(), Err(err));
    }

    pub fn calls(&self) -> Vec<(&'static str, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn respond(&self, kind: &'static str, method: &str) -> Reply {
        self.calls.lock().unwrap().push((kind, method.to_string()));
        self.replies
            .lock()
            .unwrap()
            .get(method)
            .cloned()
            .unwrap_or_else(|| Err(TransportError::Agent(format!("no reply for {}", method))))
    }
}

#[async_trait]
impl CallTransport for FakeTransport {
    async fn fetch_root_key(&self) -> Result<(), TransportError> {
        self.root_key_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_root_key.load(Ordering::SeqCst) {
            Err(TransportError::Agent("root key unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    async fn query(&self, _canister_id: &Principal, method: &str, _arg: Vec<u8>) -> Reply {
        self.respond("query", method)
    }

    async fn update(&self, _canister_id: &Principal, method: &str, _arg: Vec<u8>) -> Reply {
        self.respond("update", method)
    }
}

/// Connector handing out one shared `FakeTransport`.
pub struct FakeConnector {
    pub transport: Arc<FakeTransport>,
    pub connects: AtomicUsize,
    pub fail: AtomicBool,
}

impl FakeConnector {
    pub fn new(transport: Arc<FakeTransport>) -> Self {
        Self {
            transport,
            connects: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }
}

impl Connector for FakeConnector {
    fn connect(
        &self,
        _identity: Arc<dyn Identity>,
        _host: &str,
    ) -> Result<Arc<dyn CallTransport>, TransportError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::Agent("invalid replica url".to_string()));
        }
        Ok(self.transport.clone())
    }
}

/// Authenticator whose answers are flipped by the test.
#[derive(Default)]
pub struct FakeAuthenticator {
    pub authenticated: AtomicBool,
    pub fail_login: AtomicBool,
    pub fail_logout: AtomicBool,
    pub fail_status: AtomicBool,
    pub login_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
}

#[async_trait]
impl Authenticator for FakeAuthenticator {
    async fn is_authenticated(&self) -> Result<bool> {
        if self.fail_status.load(Ordering::SeqCst) {
            anyhow::bail!("authenticator unreachable");
        }
        Ok(self.authenticated.load(Ordering::SeqCst))
    }

    async fn identity(&self) -> Result<Option<Arc<dyn Identity>>> {
        if self.authenticated.load(Ordering::SeqCst) {
            Ok(Some(Arc::new(AnonymousIdentity)))
        } else {
            Ok(None)
        }
    }

    async fn login(&self, _options: &LoginOptions) -> Result<()> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_login.load(Ordering::SeqCst) {
            anyhow::bail!("user closed the login window");
        }
        self.authenticated.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_logout.load(Ordering::SeqCst) {
            anyhow::bail!("sign-out failed");
        }
        self.authenticated.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Factory that counts constructions and always returns the same fake.
pub struct FakeFactory {
    pub auth: Arc<FakeAuthenticator>,
    pub created: AtomicUsize,
    pub fail: AtomicBool,
}

impl FakeFactory {
    pub fn new(auth: Arc<FakeAuthenticator>) -> Self {
        Self {
            auth,
            created: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl AuthenticatorFactory for FakeFactory {
    async fn create(&self) -> Result<Arc<dyn Authenticator>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("authenticator storage unavailable");
        }
        Ok(self.auth.clone())
    }
}

pub fn sample_registration() -> ProductRegistration {
    ProductRegistration {
        name: "Organic Coffee Beans".to_string(),
        category: "Food & Beverage".to_string(),
        description: Some("Single origin, shade grown".to_string()),
        batch_number: Some("B-2024-17".to_string()),
        production_date: 1_709_510_400_000_000_000,
        manufacturing_location: "Huila, Colombia".to_string(),
        raw_materials: vec!["Arabica beans".to_string()],
        certifications: vec!["Fair Trade".to_string(), "USDA Organic".to_string()],
        sustainability_score: Some(92.5),
        estimated_value: Some(18.0),
    }
}

pub fn sample_product(id: &str) -> Product {
    Product {
        id: id.to_string(),
        name: "Organic Coffee Beans".to_string(),
        category: "Food & Beverage".to_string(),
        description: None,
        manufacturer: "Andes Growers".to_string(),
        manufacturer_id: Principal::anonymous(),
        batch_number: Some("B-2024-17".to_string()),
        production_date: 1_709_510_400_000_000_000,
        raw_materials: vec!["Arabica beans".to_string()],
        certifications: vec![],
        sustainability_score: None,
        estimated_value: Some(18.0),
        current_status: ProductStatus::InTransit,
        current_location: "Cartagena".to_string(),
        created_at: 1_709_510_400_000_000_000,
        updated_at: 1_709_510_400_000_000_000,
    }
}

pub fn sample_status() -> CanisterStatus {
    CanisterStatus {
        version: "1.0.0".to_string(),
        total_products: 3,
        total_users: 2,
        total_events: 7,
        uptime: 86_400_000_000_000,
    }
}
