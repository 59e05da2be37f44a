//! Response types for the payroll sheets API.
//!
//! This module defines the success body of the `/process` endpoint and the
//! error response structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{
    ExtractionStrategy, NormalizedRecord, OperatorReport, PeriodInfo, ProcessedPayroll, RowIssue,
};

/// Response body for the `/process` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// The period the export was processed for.
    pub period: PeriodInfo,
    /// Folder name the renderer stores the period's documents under.
    pub folder_name: String,
    /// One record per operator/company row.
    pub records: Vec<NormalizedRecord>,
    /// One report per operator, in first-seen order.
    pub reports: Vec<OperatorReport>,
    /// Rows skipped during processing.
    pub issues: Vec<RowIssue>,
    /// The extraction strategy that produced the records.
    pub strategy: Option<ExtractionStrategy>,
}

impl ProcessResponse {
    /// Builds the response from a processed payroll and its reports.
    pub fn new(payroll: ProcessedPayroll, reports: Vec<OperatorReport>) -> Self {
        Self {
            folder_name: payroll.period.folder_name(),
            period: payroll.period,
            records: payroll.records,
            reports,
            issues: payroll.issues,
            strategy: payroll.strategy,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
            EngineError::EmptyTable => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "EMPTY_TABLE",
                    message,
                    "The export must have at least one header column",
                ),
            },
            EngineError::NoOperatorColumn { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "NO_OPERATOR_COLUMN",
                    message,
                    "No header contains an operator keyword and the fixed operator column is empty",
                ),
            },
            EngineError::InvalidPeriod { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_PERIOD", message),
            },
            EngineError::InputParseError { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INPUT_PARSE_ERROR", message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_structural_errors_are_unprocessable() {
        let api_error: ApiErrorResponse = EngineError::EmptyTable.into();
        assert_eq!(api_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api_error.error.code, "EMPTY_TABLE");

        let api_error: ApiErrorResponse = EngineError::NoOperatorColumn { rows: 3 }.into();
        assert_eq!(api_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(api_error.error.message.contains("3 data rows"));
    }

    #[test]
    fn test_invalid_period_is_bad_request() {
        let api_error: ApiErrorResponse = EngineError::InvalidPeriod {
            year: 2024,
            month: 0,
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_PERIOD");
    }

    #[test]
    fn test_config_errors_are_internal() {
        let api_error: ApiErrorResponse = EngineError::InvalidConfig {
            message: "bad".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }
}
