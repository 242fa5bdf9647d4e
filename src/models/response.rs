//! Payloads returned by the search interface.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::JobPosting;
use crate::pipeline::Page;

/// Service name reported by the health payload.
pub const SERVICE_NAME: &str = "ats-search";

/// Successful search page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSuccess {
    pub ok: bool,
    pub count: usize,
    pub page: usize,
    pub page_size: usize,
    /// Capped total, never the raw number of matches
    pub total: usize,
    pub jobs: Vec<JobPosting>,
}

/// Failed search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFailure {
    pub ok: bool,
    pub error: String,
}

/// Response body for the search operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Success(SearchSuccess),
    Failure(SearchFailure),
}

impl SearchResponse {
    pub fn success(page: Page<JobPosting>) -> Self {
        Self::Success(SearchSuccess {
            ok: true,
            count: page.count,
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            jobs: page.items,
        })
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure(SearchFailure {
            ok: false,
            error: error.into(),
        })
    }

    /// Convert a pipeline result into an HTTP status and body.
    ///
    /// Client errors keep their message (4xx); anything else is logged and
    /// reported generically (5xx).
    pub fn from_result(result: Result<Page<JobPosting>>) -> (u16, Self) {
        match result {
            Ok(page) => (200, Self::success(page)),
            Err(e) if e.is_client_error() => {
                log::info!("Rejected search request: {}", e);
                (e.status_code(), Self::failure(e.public_message()))
            }
            Err(e) => {
                log::error!("Search failed: {}", e);
                (e.status_code(), Self::failure(e.public_message()))
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Liveness payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub time: String,
}

impl HealthResponse {
    pub fn now() -> Self {
        Self {
            ok: true,
            service: SERVICE_NAME.to_string(),
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_success_payload_shape() {
        let page = Page {
            items: Vec::new(),
            count: 0,
            page: 2,
            page_size: 10,
            total: 0,
        };
        let (status, body) = SearchResponse::from_result(Ok(page));
        assert_eq!(status, 200);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["pageSize"], 10);
        assert_eq!(value["page"], 2);
        assert!(value["jobs"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_validation_failure_is_400() {
        let (status, body) =
            SearchResponse::from_result(Err(AppError::validation("No sources provided")));
        assert_eq!(status, 400);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"], "No sources provided");
    }

    #[test]
    fn test_internal_failure_is_generic_500() {
        let (status, body) =
            SearchResponse::from_result(Err(AppError::internal("scorer exploded")));
        assert_eq!(status, 500);
        assert!(!body.is_ok());
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["error"], "Internal error");
    }

    #[test]
    fn test_health_payload() {
        let health = HealthResponse::now();
        assert!(health.ok);
        assert_eq!(health.service, SERVICE_NAME);
        assert!(health.time.ends_with('Z'));
    }
}
