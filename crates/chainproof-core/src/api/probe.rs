use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error};

use super::ClientError;

/// Probe request timeout in seconds.
/// The provider is either up or dfx is not running; long waits add nothing.
pub const PROBE_TIMEOUT_SECS: u64 = 10;

pub fn probe_client() -> Result<Client, ClientError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
        .build()?)
}

/// Check that the identity provider answers at all. Any HTTP response,
/// whatever its status, counts as reachable.
pub async fn probe_identity_provider(client: &Client, url: &str) -> Result<(), ClientError> {
    match client.get(url).send().await {
        Ok(response) => {
            debug!(url, status = %response.status(), "Identity provider reachable");
            Ok(())
        }
        Err(e) => {
            error!(url, error = %e, "Identity provider not accessible");
            Err(ClientError::ProviderUnreachable {
                url: url.to_string(),
                reason: e.to_string(),
            })
        }
    }
}
