use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};

use crate::utils::format_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, CandidType, Serialize, Deserialize)]
pub enum UserRole {
    Manufacturer,
    LogisticsProvider,
    Retailer,
    QualityAssurance,
    SupplyChainManager,
    Admin,
    Consumer,
}

impl UserRole {
    /// Parse a role name, case-insensitive, with or without separators
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "manufacturer" => Some(UserRole::Manufacturer),
            "logisticsprovider" | "logistics" => Some(UserRole::LogisticsProvider),
            "retailer" => Some(UserRole::Retailer),
            "qualityassurance" | "qa" => Some(UserRole::QualityAssurance),
            "supplychainmanager" => Some(UserRole::SupplyChainManager),
            "admin" => Some(UserRole::Admin),
            "consumer" => Some(UserRole::Consumer),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Manufacturer => write!(f, "Manufacturer"),
            UserRole::LogisticsProvider => write!(f, "Logistics Provider"),
            UserRole::Retailer => write!(f, "Retailer"),
            UserRole::QualityAssurance => write!(f, "Quality Assurance"),
            UserRole::SupplyChainManager => write!(f, "Supply Chain Manager"),
            UserRole::Admin => write!(f, "Admin"),
            UserRole::Consumer => write!(f, "Consumer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, CandidType, Serialize, Deserialize)]
pub struct UserPermissions {
    pub can_register_products: bool,
    pub can_update_supply_chain: bool,
    pub can_manage_partners: bool,
    pub can_view_analytics: bool,
    pub can_verify_users: bool,
}

#[derive(Debug, Clone, PartialEq, CandidType, Serialize, Deserialize)]
pub struct User {
    pub id: Principal,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub role: UserRole,
    pub created_at: u64,
    pub is_verified: bool,
    pub permissions: UserPermissions,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn member_since(&self) -> String {
        format_timestamp(self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, CandidType, Serialize, Deserialize)]
pub struct UserRegistration {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub role: UserRole,
}
