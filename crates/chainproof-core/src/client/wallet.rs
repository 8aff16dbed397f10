//! Simulated ICP wallet operations.
//!
//! Neither call touches the ledger canister: the balance is a fixed demo
//! value and transfers only wait before reporting success.

use std::time::Duration;

use tracing::info;

use super::SessionClient;

/// Balance reported for any signed-in principal
pub const MOCK_ICP_BALANCE: f64 = 10.5;

/// Artificial latency of a mock transfer
pub const MOCK_TRANSFER_DELAY: Duration = Duration::from_secs(2);

impl SessionClient {
    /// Mock balance: `MOCK_ICP_BALANCE` when a principal exists, else 0.
    pub async fn icp_balance(&self) -> f64 {
        match self.principal().await {
            Some(principal) => {
                info!(principal = %principal, "Getting ICP balance (simulated)");
                MOCK_ICP_BALANCE
            }
            None => 0.0,
        }
    }

    /// Mock transfer: waits `MOCK_TRANSFER_DELAY`, then reports success.
    pub async fn transfer_icp(&self, to: &str, amount: f64) -> bool {
        info!(to, amount, "Mock transfer started");
        tokio::time::sleep(MOCK_TRANSFER_DELAY).await;
        info!("Mock transfer completed");
        true
    }
}
