use serde::{Deserialize, Serialize};
use crate::models::domain::{AddressItem, AddressRecord};

/// Response for the polygon query endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonQueryResponse {
    pub count: usize,
    pub items: Vec<AddressItem>,
}

impl From<Vec<AddressItem>> for PolygonQueryResponse {
    fn from(items: Vec<AddressItem>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

/// Response for the region listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionListResponse {
    pub count: usize,
    pub items: Vec<AddressRecord>,
}

impl From<Vec<AddressRecord>> for RegionListResponse {
    fn from(items: Vec<AddressRecord>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

/// Coordinate update response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCoordsResponse {
    pub mgt_no: String,
    pub lat: f64,
    pub lng: f64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
        }
    }
}
