//! Response DTOs for the profile API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::cached_store::ReadStatsSnapshot;
use crate::models::profile::LinkedProfile;
use crate::pagination::PageLinks;

/// One page of the profile listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePage {
    pub records: Vec<LinkedProfile>,
    pub total_count: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
    pub links: PageLinks,
}

/// Response body for DELETE
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: i64,
}

impl DeleteResponse {
    pub fn new(id: i64) -> Self {
        Self {
            message: format!("Profile {} deleted successfully", id),
            id,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Counters kept by the cached store
    pub reads: ReadStatsSnapshot,
    /// Counters kept by the cache backend, when it has any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendStats>,
}

/// Backend counters plus the derived hit rate.
#[derive(Debug, Clone, Serialize)]
pub struct BackendStats {
    #[serde(flatten)]
    pub counters: CacheStats,
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(reads: ReadStatsSnapshot, backend: Option<CacheStats>) -> Self {
        Self {
            reads,
            backend: backend.map(|counters| BackendStats {
                hit_rate: counters.hit_rate(),
                counters,
            }),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_response_serialize() {
        let json = serde_json::to_string(&DeleteResponse::new(5)).unwrap();
        assert!(json.contains("\"id\":5"));
        assert!(json.contains("deleted"));
    }

    #[test]
    fn test_stats_response_without_backend() {
        let resp = StatsResponse::new(ReadStatsSnapshot::default(), None);
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("backend").is_none());
        assert_eq!(json["reads"]["hits"], 0);
    }

    #[test]
    fn test_stats_response_backend_hit_rate() {
        let counters = CacheStats {
            hits: 8,
            misses: 2,
            ..CacheStats::default()
        };
        let resp = StatsResponse::new(ReadStatsSnapshot::default(), Some(counters));
        let backend = resp.backend.unwrap();
        assert!((backend.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let json = serde_json::to_string(&ErrorResponse::new("Something went wrong")).unwrap();
        assert!(json.contains("Something went wrong"));
    }
}
