//! Session client: authentication lifecycle plus typed calls to the
//! supply-chain canister, and the simulated wallet helpers.

pub mod session;
pub mod wallet;

pub use session::{SessionClient, SessionClientBuilder, SessionState};
pub use wallet::{MOCK_ICP_BALANCE, MOCK_TRANSFER_DELAY};
