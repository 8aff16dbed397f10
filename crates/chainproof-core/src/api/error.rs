use thiserror::Error;

/// Failures raised by the call transport itself: the agent, or Candid
/// encoding and decoding around it. Messages are kept verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Failed to encode arguments for {method}: {message}")]
    Encode { method: String, message: String },

    #[error("Failed to decode reply from {method}: {message}")]
    Decode { method: String, message: String },
}

impl From<ic_agent::AgentError> for TransportError {
    fn from(err: ic_agent::AgentError) -> Self {
        TransportError::Agent(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    /// No actor is bound; nothing was sent.
    #[error("Not authenticated - please connect your wallet first")]
    NotAuthenticated,

    #[error("Authentication expired - please reconnect your wallet")]
    AuthenticationExpired,

    #[error("Internet Identity not accessible at {url}. Make sure dfx is running and Internet Identity is deployed. ({reason})")]
    ProviderUnreachable { url: String, reason: String },

    /// The canister answered with its `Err` variant.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Identity error: {0}")]
    Identity(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Auth(#[from] anyhow::Error),
}

impl ClientError {
    /// True when the call never reached the network because no session was bound
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, ClientError::NotAuthenticated)
    }
}
