//! Remote interface of the supply-chain canister.
//!
//! - `SupplyChainActor`: typed handle with one method per canister method
//! - `CallTransport` / `Connector`: the seam over `ic_agent::Agent`
//! - `probe_identity_provider`: reachability check run before login
//!
//! Query methods (`get_*`, `search_products`) are read-only; the two
//! `register_*` methods are updates.

pub mod actor;
pub mod error;
pub mod probe;
pub mod transport;

pub use actor::SupplyChainActor;
pub use error::{ClientError, TransportError};
pub use probe::{probe_client, probe_identity_provider};
pub use transport::{CallTransport, Connector, IcAgentConnector, IcAgentTransport};
