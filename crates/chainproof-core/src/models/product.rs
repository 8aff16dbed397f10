use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};

use crate::utils::{format_score, format_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, CandidType, Serialize, Deserialize)]
pub enum ProductStatus {
    Manufacturing,
    InTransit,
    Delivered,
    Recalled,
}

impl ProductStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "manufacturing" => Some(ProductStatus::Manufacturing),
            "intransit" => Some(ProductStatus::InTransit),
            "delivered" => Some(ProductStatus::Delivered),
            "recalled" => Some(ProductStatus::Recalled),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Manufacturing => write!(f, "Manufacturing"),
            ProductStatus::InTransit => write!(f, "In Transit"),
            ProductStatus::Delivered => write!(f, "Delivered"),
            ProductStatus::Recalled => write!(f, "Recalled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, CandidType, Serialize, Deserialize)]
pub enum SupplyChainStage {
    RawMaterialSourcing,
    Manufacturing,
    QualityControl,
    Packaging,
    Shipping,
    Distribution,
    Retail,
}

impl std::fmt::Display for SupplyChainStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupplyChainStage::RawMaterialSourcing => write!(f, "Raw Material Sourcing"),
            SupplyChainStage::Manufacturing => write!(f, "Manufacturing"),
            SupplyChainStage::QualityControl => write!(f, "Quality Control"),
            SupplyChainStage::Packaging => write!(f, "Packaging"),
            SupplyChainStage::Shipping => write!(f, "Shipping"),
            SupplyChainStage::Distribution => write!(f, "Distribution"),
            SupplyChainStage::Retail => write!(f, "Retail"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, CandidType, Serialize, Deserialize)]
pub enum EventStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Pending => write!(f, "Pending"),
            EventStatus::InProgress => write!(f, "In Progress"),
            EventStatus::Completed => write!(f, "Completed"),
            EventStatus::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, CandidType, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub manufacturer: String,
    pub manufacturer_id: Principal,
    pub batch_number: Option<String>,
    pub production_date: u64,
    pub raw_materials: Vec<String>,
    pub certifications: Vec<String>,
    pub sustainability_score: Option<f64>,
    pub estimated_value: Option<f64>,
    pub current_status: ProductStatus,
    pub current_location: String,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Product {
    pub fn produced_on(&self) -> String {
        format_timestamp(self.production_date)
    }

    pub fn sustainability_display(&self) -> String {
        format_score(self.sustainability_score)
    }
}

#[derive(Debug, Clone, PartialEq, CandidType, Serialize, Deserialize)]
pub struct ProductRegistration {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub batch_number: Option<String>,
    pub production_date: u64,
    pub manufacturing_location: String,
    pub raw_materials: Vec<String>,
    pub certifications: Vec<String>,
    pub sustainability_score: Option<f64>,
    pub estimated_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, CandidType, Serialize, Deserialize)]
pub struct SupplyChainEvent {
    pub id: String,
    pub product_id: String,
    pub stage: SupplyChainStage,
    pub location: String,
    pub timestamp: u64,
    pub actor: String,
    pub actor_id: Principal,
    pub status: EventStatus,
    pub details: String,
    pub certifications: Vec<String>,
    pub estimated_arrival: Option<u64>,
    pub metadata: Vec<(String, String)>,
}

impl SupplyChainEvent {
    /// Look up a metadata value by key
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, CandidType, Serialize, Deserialize)]
pub struct ProductWithHistory {
    pub product: Product,
    pub supply_chain_events: Vec<SupplyChainEvent>,
    pub ethical_score: f64,
}

impl ProductWithHistory {
    /// Most recent event by timestamp
    pub fn latest_event(&self) -> Option<&SupplyChainEvent> {
        self.supply_chain_events.iter().max_by_key(|e| e.timestamp)
    }
}

/// Search filter; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, CandidType, Serialize, Deserialize)]
pub struct ProductSearchQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    pub status: Option<ProductStatus>,
    pub limit: Option<u32>,
}

impl ProductSearchQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, timestamp: u64) -> SupplyChainEvent {
        SupplyChainEvent {
            id: id.to_string(),
            product_id: "P-1".to_string(),
            stage: SupplyChainStage::Shipping,
            location: "Rotterdam".to_string(),
            timestamp,
            actor: "Acme Logistics".to_string(),
            actor_id: Principal::anonymous(),
            status: EventStatus::Completed,
            details: String::new(),
            certifications: vec![],
            estimated_arrival: None,
            metadata: vec![("carrier".to_string(), "MSC".to_string())],
        }
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(ProductStatus::parse("in-transit"), Some(ProductStatus::InTransit));
        assert_eq!(ProductStatus::parse("InTransit"), Some(ProductStatus::InTransit));
        assert_eq!(ProductStatus::parse("recalled"), Some(ProductStatus::Recalled));
        assert_eq!(ProductStatus::parse("lost"), None);
    }

    #[test]
    fn test_metadata_value() {
        let e = event("E-1", 1);
        assert_eq!(e.metadata_value("carrier"), Some("MSC"));
        assert_eq!(e.metadata_value("vessel"), None);
    }

    #[test]
    fn test_search_query_by_name() {
        let q = ProductSearchQuery::by_name("coffee");
        assert_eq!(q.name.as_deref(), Some("coffee"));
        assert!(q.category.is_none());
        assert!(q.limit.is_none());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(SupplyChainStage::RawMaterialSourcing.to_string(), "Raw Material Sourcing");
        assert_eq!(EventStatus::InProgress.to_string(), "In Progress");
    }
}
