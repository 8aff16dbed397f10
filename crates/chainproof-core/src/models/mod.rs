//! Data models for supply-chain registry records.
//!
//! These mirror the Candid interface of the supply-chain canister and are
//! decoded once at the client boundary:
//!
//! - `User`, `UserRegistration`, `UserRole`, `UserPermissions`
//! - `Product`, `ProductRegistration`, `ProductWithHistory`, `ProductSearchQuery`
//! - `SupplyChainEvent` with its `SupplyChainStage` and `EventStatus` tags
//! - `AnalyticsData`, `CanisterStatus`
//!
//! Timestamps are `u64` nanoseconds since the Unix epoch.

pub mod analytics;
pub mod product;
pub mod user;

pub use analytics::{AnalyticsData, CanisterStatus};
pub use product::{
    EventStatus, Product, ProductRegistration, ProductSearchQuery, ProductStatus,
    ProductWithHistory, SupplyChainEvent, SupplyChainStage,
};
pub use user::{User, UserPermissions, UserRegistration, UserRole};
