//! HTTP request handlers for the payroll sheets API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::processing::{group_by_operator, normalize_and_resolve};

use super::request::ProcessRequest;
use super::response::{ApiError, ApiErrorResponse, ProcessResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/process", post(process_handler))
        .with_state(state)
}

/// Handler for POST /process endpoint.
///
/// Accepts an export as headers plus rows and returns the normalized records,
/// the per-operator reports and the skipped rows.
async fn process_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll export");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let start_time = Instant::now();
    match process_export(request, state.config()) {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                period = %response.period.label,
                records = response.records.len(),
                operators = response.reports.len(),
                skipped = response.issues.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Export processed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(response),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Processing failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Runs the pipeline for one request and groups the records per operator.
fn process_export(request: ProcessRequest, config: &EngineConfig) -> EngineResult<ProcessResponse> {
    let (table, period) = request.into_parts();
    let period = period
        .map(|period| period.to_period(config.locale()))
        .transpose()?;

    let payroll = normalize_and_resolve(&table, period, config)?;
    let reports = group_by_operator(&payroll.records, config.currency());
    Ok(ProcessResponse::new(payroll, reports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    async fn post_process(body: String) -> (StatusCode, Vec<u8>) {
        let router = create_router(AppState::default());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/process")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_valid_request_returns_200() {
        let body = json!({
            "headers": ["N.", "Operatore", "Codice", "Ragione sociale", "Consegna"],
            "rows": [
                [1, "Mario Rossi", "A001", "Alfa Srl", "20"],
                [2, "Anna Bianchi", "B001", "Beta Spa", null]
            ],
            "period": { "year": 2024, "month": 6 }
        });

        let (status, bytes) = post_process(body.to_string()).await;
        assert_eq!(status, StatusCode::OK);

        let response: ProcessResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(response.period.label, "Giugno 2024");
        assert_eq!(response.folder_name, "Fogli_paghe_giugno");
        assert_eq!(response.records.len(), 2);
        assert_eq!(response.records[0].delivery_date, "20/06/2024");
        assert_eq!(response.records[1].delivery_date, "01/01/1900");
        assert_eq!(response.reports.len(), 2);
        assert_eq!(response.reports[0].file_name, "Report_Mario_Rossi.pdf");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let (status, bytes) = post_process("{invalid json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_headers_returns_400() {
        let (status, bytes) = post_process(r#"{"rows": []}"#.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert!(
            error.message.contains("missing field"),
            "Expected error message to mention missing field, got: {}",
            error.message
        );
    }

    #[tokio::test]
    async fn test_empty_table_returns_422() {
        let body = json!({ "headers": [], "rows": [] });
        let (status, bytes) = post_process(body.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let error: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.code, "EMPTY_TABLE");
    }

    #[tokio::test]
    async fn test_invalid_month_returns_400() {
        let body = json!({
            "headers": ["Operatore"],
            "rows": [["Mario"]],
            "period": { "year": 2024, "month": 13 }
        });
        let (status, bytes) = post_process(body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.code, "INVALID_PERIOD");
    }
}
