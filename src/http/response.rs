//! Health endpoint response body.
//!
//! # Design Decisions
//! - Field names match the existing clients: `GIT_SHA`, `healthCheckResult`
//! - The body is the same shape for 200 and 503; failure detail lives in
//!   `healthCheckResult.error`

use serde::{Deserialize, Serialize};

use crate::health::HealthCheckResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    #[serde(rename = "GIT_SHA")]
    pub git_sha: String,

    #[serde(rename = "healthCheckResult")]
    pub health_check_result: HealthCheckResult,
}

impl HealthCheckResponse {
    pub fn new(git_sha: impl Into<String>, health_check_result: HealthCheckResult) -> Self {
        Self {
            git_sha: git_sha.into(),
            health_check_result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::IndicatorResult;
    use serde_json::json;

    #[test]
    fn test_serialized_field_names() {
        let body = HealthCheckResponse::new(
            "df08eb357dd7f432c3dcbe0ef4b3212a38b4aeff",
            HealthCheckResult::from_results(vec![IndicatorResult::up("database")]),
        );

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["GIT_SHA"], "df08eb357dd7f432c3dcbe0ef4b3212a38b4aeff");
        assert_eq!(value["healthCheckResult"]["status"], "ok");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_git_sha_rejected() {
        let body = json!({
            "healthCheckResult": { "status": "ok", "info": {}, "error": {}, "details": {} }
        });
        let err = serde_json::from_value::<HealthCheckResponse>(body).unwrap_err();
        assert!(err.to_string().contains("GIT_SHA"));
    }

    #[test]
    fn test_non_string_git_sha_rejected() {
        let body = json!({
            "GIT_SHA": 42,
            "healthCheckResult": { "status": "ok", "info": {}, "error": {}, "details": {} }
        });
        assert!(serde_json::from_value::<HealthCheckResponse>(body).is_err());
    }
}
