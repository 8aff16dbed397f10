//! Typed handle on the supply-chain canister.
//!
//! Each method encodes its arguments with Candid, makes exactly one round
//! trip through the bound `CallTransport` and decodes the reply into the
//! matching model. A canister-side `Err(text)` becomes
//! `ClientError::Rejected(text)` with the text untouched.

use std::sync::Arc;

use candid::utils::ArgumentEncoder;
use candid::{CandidType, Principal};
use serde::de::DeserializeOwned;

use crate::models::{
    AnalyticsData, CanisterStatus, Product, ProductRegistration, ProductSearchQuery,
    ProductWithHistory, User, UserRegistration,
};

use super::{CallTransport, ClientError, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallKind {
    Query,
    Update,
}

#[derive(Clone)]
pub struct SupplyChainActor {
    transport: Arc<dyn CallTransport>,
    canister_id: Principal,
}

impl SupplyChainActor {
    pub fn new(transport: Arc<dyn CallTransport>, canister_id: Principal) -> Self {
        Self {
            transport,
            canister_id,
        }
    }

    pub fn canister_id(&self) -> &Principal {
        &self.canister_id
    }

    async fn call<A, R>(&self, kind: CallKind, method: &str, args: A) -> Result<R, TransportError>
    where
        A: ArgumentEncoder,
        R: CandidType + DeserializeOwned,
    {
        let arg = candid::encode_args(args).map_err(|e| TransportError::Encode {
            method: method.to_string(),
            message: e.to_string(),
        })?;

        let reply = match kind {
            CallKind::Query => self.transport.query(&self.canister_id, method, arg).await?,
            CallKind::Update => self.transport.update(&self.canister_id, method, arg).await?,
        };

        candid::decode_one(&reply).map_err(|e| TransportError::Decode {
            method: method.to_string(),
            message: e.to_string(),
        })
    }

    fn flatten<T>(reply: Result<T, String>) -> Result<T, ClientError> {
        reply.map_err(ClientError::Rejected)
    }

    pub async fn register_user(&self, registration: &UserRegistration) -> Result<User, ClientError> {
        let reply: Result<User, String> = self
            .call(CallKind::Update, "register_user", (registration,))
            .await?;
        Self::flatten(reply)
    }

    pub async fn get_user(&self) -> Result<User, ClientError> {
        let reply: Result<User, String> = self.call(CallKind::Query, "get_user", ()).await?;
        Self::flatten(reply)
    }

    /// Returns the new product's identifier
    pub async fn register_product(
        &self,
        registration: &ProductRegistration,
    ) -> Result<String, ClientError> {
        let reply: Result<String, String> = self
            .call(CallKind::Update, "register_product", (registration,))
            .await?;
        Self::flatten(reply)
    }

    pub async fn get_product(&self, product_id: &str) -> Result<ProductWithHistory, ClientError> {
        let reply: Result<ProductWithHistory, String> = self
            .call(CallKind::Query, "get_product", (product_id,))
            .await?;
        Self::flatten(reply)
    }

    pub async fn get_analytics(&self) -> Result<AnalyticsData, ClientError> {
        Ok(self.call(CallKind::Query, "get_analytics", ()).await?)
    }

    pub async fn get_canister_status(&self) -> Result<CanisterStatus, ClientError> {
        Ok(self.call(CallKind::Query, "get_canister_status", ()).await?)
    }

    pub async fn search_products(
        &self,
        query: &ProductSearchQuery,
    ) -> Result<Vec<Product>, ClientError> {
        Ok(self.call(CallKind::Query, "search_products", (query,)).await?)
    }

    pub async fn get_user_products(&self) -> Result<Vec<Product>, ClientError> {
        Ok(self.call(CallKind::Query, "get_user_products", ()).await?)
    }

    pub async fn get_all_products(&self) -> Result<Vec<Product>, ClientError> {
        Ok(self.call(CallKind::Query, "get_all_products", ()).await?)
    }
}
