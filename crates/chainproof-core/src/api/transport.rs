//! Call transport seam over the Internet Computer agent.
//!
//! `CallTransport` moves raw Candid bytes to and from a canister;
//! `Connector` builds one bound to an identity and a replica host.
//! Production code uses `IcAgentConnector`, tests substitute fakes.

use std::sync::Arc;

use async_trait::async_trait;
use candid::Principal;
use ic_agent::{Agent, Identity};
use tracing::debug;

use super::TransportError;

#[async_trait]
pub trait CallTransport: Send + Sync {
    /// Fetch the replica's root key. Only needed against local replicas.
    async fn fetch_root_key(&self) -> Result<(), TransportError>;

    /// Read-only call, no state change on the canister
    async fn query(
        &self,
        canister_id: &Principal,
        method: &str,
        arg: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError>;

    /// State-changing call, waits for the certified reply
    async fn update(
        &self,
        canister_id: &Principal,
        method: &str,
        arg: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError>;
}

pub trait Connector: Send + Sync {
    fn connect(
        &self,
        identity: Arc<dyn Identity>,
        host: &str,
    ) -> Result<Arc<dyn CallTransport>, TransportError>;
}

/// `CallTransport` backed by `ic_agent::Agent`.
pub struct IcAgentTransport {
    agent: Agent,
}

impl IcAgentTransport {
    pub fn new(identity: Arc<dyn Identity>, host: &str) -> Result<Self, TransportError> {
        let agent = Agent::builder()
            .with_url(host)
            .with_arc_identity(identity)
            .build()?;
        Ok(Self { agent })
    }
}

#[async_trait]
impl CallTransport for IcAgentTransport {
    async fn fetch_root_key(&self) -> Result<(), TransportError> {
        self.agent.fetch_root_key().await?;
        Ok(())
    }

    async fn query(
        &self,
        canister_id: &Principal,
        method: &str,
        arg: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        debug!(canister = %canister_id, method, "query");
        let reply = self
            .agent
            .query(canister_id, method)
            .with_arg(arg)
            .call()
            .await?;
        Ok(reply)
    }

    async fn update(
        &self,
        canister_id: &Principal,
        method: &str,
        arg: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        debug!(canister = %canister_id, method, "update");
        let reply = self
            .agent
            .update(canister_id, method)
            .with_arg(arg)
            .call_and_wait()
            .await?;
        Ok(reply)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IcAgentConnector;

impl Connector for IcAgentConnector {
    fn connect(
        &self,
        identity: Arc<dyn Identity>,
        host: &str,
    ) -> Result<Arc<dyn CallTransport>, TransportError> {
        Ok(Arc::new(IcAgentTransport::new(identity, host)?))
    }
}
