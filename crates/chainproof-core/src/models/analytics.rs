use candid::CandidType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, CandidType, Serialize, Deserialize)]
pub struct AnalyticsData {
    pub total_products: u64,
    pub active_shipments: u64,
    pub completed_deliveries: u64,
    pub average_ethical_score: f64,
    pub total_partners: u64,
    pub total_users: u64,
}

impl AnalyticsData {
    /// Share of products that have reached delivery, 0.0 when empty
    pub fn delivery_rate(&self) -> f64 {
        if self.total_products == 0 {
            0.0
        } else {
            self.completed_deliveries as f64 / self.total_products as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, CandidType, Serialize, Deserialize)]
pub struct CanisterStatus {
    pub version: String,
    pub total_products: u64,
    pub total_users: u64,
    pub total_events: u64,
    pub uptime: u64,
}
