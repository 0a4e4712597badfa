//! Shapes orchestrator results into HTTP-style replies
//!
//! A partial failure is still a 200: the `errors` array and the reduced
//! `count`/`confidence` tell the client what is missing. Non-2xx statuses are
//! reserved for bad input and for requests that needed data and got none.

use serde::Serialize;

use crate::data_fetcher::cache::Cached;
use crate::data_fetcher::models::{AggregateResponse, DataSource};
use crate::error::AppError;

pub const NO_STORE: &str = "no-store";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataBody<T> {
    pub data: Vec<T>,
    pub count: usize,
    pub sources: Vec<DataSource>,
    pub errors: Vec<String>,
    pub confidence: f64,
}

impl<T> From<AggregateResponse<T>> for DataBody<T> {
    fn from(result: AggregateResponse<T>) -> Self {
        Self {
            count: result.data.len(),
            data: result.data,
            sources: result.sources,
            errors: result.errors,
            confidence: result.aggregated_confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody<T> {
    Data(DataBody<T>),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub cache_control: String,
    pub body: ResponseBody<T>,
}

impl<T> ApiResponse<T> {
    /// Builds the reply for an aggregated result.
    ///
    /// `ttl_seconds` is the freshness reported by the cache layer and becomes
    /// `max-age`. With `require_data`, an empty result is an error status:
    /// 503 when no source is configured, 502 when every source failed.
    pub fn from_aggregate(
        result: AggregateResponse<T>,
        ttl_seconds: u64,
        require_data: bool,
    ) -> Self {
        let status = if !require_data || !result.data.is_empty() {
            200
        } else if result.sources.is_empty() && result.errors.is_empty() {
            503
        } else if result.is_total_failure() {
            502
        } else {
            200
        };

        let cache_control = if status == 200 && ttl_seconds > 0 {
            format!("public, max-age={ttl_seconds}")
        } else {
            NO_STORE.to_string()
        };

        Self {
            status,
            cache_control,
            body: ResponseBody::Data(result.into()),
        }
    }

    pub fn from_cached(cached: Cached<AggregateResponse<T>>, require_data: bool) -> Self {
        Self::from_aggregate(cached.value, cached.ttl_seconds, require_data)
    }

    /// 400 for validation errors, 500 for anything else
    pub fn from_error(error: &AppError) -> Self {
        let (status, field) = match error {
            AppError::Validation { field, .. } => (400, Some(field.clone())),
            _ => (500, None),
        };
        Self {
            status,
            cache_control: NO_STORE.to_string(),
            body: ResponseBody::Error(ErrorBody {
                error: error.to_string(),
                field,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::models::Team;

    fn teams() -> Vec<Team> {
        vec![Team::new("112", "Chicago Cubs", "CHC", "Chicago")]
    }

    #[test]
    fn test_partial_failure_is_ok_with_errors() {
        let mut result = AggregateResponse::single(teams(), DataSource::new("MLB Stats", 1.0));
        result.push_error("ESPN NBA", "request timeout");

        let reply = ApiResponse::from_aggregate(result, 3600, true);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.cache_control, "public, max-age=3600");

        let json = serde_json::to_value(&reply.body).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["confidence"], 1.0);
        assert_eq!(json["errors"][0], "ESPN NBA: request timeout");
    }

    #[test]
    fn test_total_failure_requiring_data_is_bad_gateway() {
        let mut result: AggregateResponse<Team> = AggregateResponse::default();
        result.push_error("MLB Stats", "Service Unavailable (HTTP 503)");

        let reply = ApiResponse::from_aggregate(result.clone(), 0, true);
        assert_eq!(reply.status, 502);
        assert_eq!(reply.cache_control, NO_STORE);

        // Callers that accept an empty list still get 200
        assert_eq!(ApiResponse::from_aggregate(result, 0, false).status, 200);
    }

    #[test]
    fn test_no_sources_is_unavailable() {
        let reply = ApiResponse::<Team>::from_aggregate(AggregateResponse::default(), 300, true);
        assert_eq!(reply.status, 503);
        assert!(!reply.is_success());
    }

    #[test]
    fn test_empty_success_is_ok() {
        let result: AggregateResponse<Team> =
            AggregateResponse::single(vec![], DataSource::new("ESPN NFL", 0.9));
        let reply = ApiResponse::from_aggregate(result, 300, true);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.cache_control, "public, max-age=300");
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let error = AppError::validation("season", "1700 is outside 1871..=2100");
        let reply = ApiResponse::<Team>::from_error(&error);
        assert_eq!(reply.status, 400);
        assert_eq!(reply.cache_control, NO_STORE);

        let json = serde_json::to_value(&reply.body).unwrap();
        assert_eq!(json["field"], "season");
        assert!(json["error"].as_str().unwrap().contains("1700"));
    }

    #[test]
    fn test_other_errors_are_internal() {
        let reply = ApiResponse::<Team>::from_error(&AppError::config_error("bad"));
        assert_eq!(reply.status, 500);
    }
}
