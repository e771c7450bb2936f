//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::PayrollInput;
use crate::models::{AttendanceRecord, Deal, Employee, PayMonth};
use crate::store::{PayrollKey, UpsertOutcome, run_payroll};

use super::request::{CalculationRequest, RunPayrollRequest};
use super::response::{ApiError, ApiErrorResponse, PayrollResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/payroll/run", post(run_payroll_handler))
        .route("/payroll/:employee_id/:year/:month", get(get_payroll_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
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
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Handler for POST /calculate.
///
/// Computes a payroll from the snapshots in the request body without
/// touching the repository.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let period = match PayMonth::new(request.month, request.year) {
        Ok(period) => period,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid period");
            return error_response(err.into());
        }
    };

    let employee: Employee = request.employee.into();
    let attendance: Vec<AttendanceRecord> =
        request.attendance.into_iter().map(Into::into).collect();
    let deals: Vec<Deal> = request
        .deals
        .into_iter()
        .map(|deal| deal.into_deal(&employee.id))
        .collect();

    let start_time = Instant::now();
    let result = state.engine().calculate(&PayrollInput {
        employee: &employee,
        attendance: &attendance,
        deals: &deals,
        period,
        overrides: request.overrides,
    });

    match result {
        Ok(payroll) => {
            let duration_us = start_time.elapsed().as_micros() as u64;
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee.id,
                deals_count = deals.len(),
                net_pay = %payroll.total,
                total_ctc = %payroll.total_ctc,
                duration_us,
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, PayrollResponse::new(payroll, duration_us, None))
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for POST /payroll/run.
///
/// Loads the employee's snapshots from the repository, computes the payroll
/// and upserts it.
async fn run_payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<RunPayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = PayMonth::new(request.month, request.year).and_then(|period| {
        run_payroll(
            state.engine(),
            state.repository(),
            &request.employee_id,
            period,
            request.overrides,
        )
    });

    match result {
        Ok((payroll, outcome)) => {
            let duration_us = start_time.elapsed().as_micros() as u64;
            info!(
                correlation_id = %correlation_id,
                employee_id = %request.employee_id,
                outcome = ?outcome,
                net_pay = %payroll.total,
                duration_us,
                "Payroll run completed"
            );
            let status = match outcome {
                UpsertOutcome::Created => StatusCode::CREATED,
                UpsertOutcome::Updated => StatusCode::OK,
            };
            json_response(status, PayrollResponse::new(payroll, duration_us, Some(outcome)))
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %request.employee_id,
                error = %err,
                "Payroll run failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for GET /payroll/{employee_id}/{year}/{month}.
async fn get_payroll_handler(
    State(state): State<AppState>,
    Path((employee_id, year, month)): Path<(String, i32, u32)>,
) -> Response {
    let key = PayrollKey {
        employee_id,
        month,
        year,
    };

    match state.repository().payroll(&key) {
        Some(payroll) => json_response(StatusCode::OK, payroll),
        None => {
            info!(
                employee_id = %key.employee_id,
                year = key.year,
                month = key.month,
                "No stored payroll"
            );
            json_response(
                StatusCode::NOT_FOUND,
                ApiError::with_details(
                    "PAYROLL_NOT_FOUND",
                    format!(
                        "No payroll for employee '{}' in {}-{:02}",
                        key.employee_id, key.year, key.month
                    ),
                    "Run payroll for this month first",
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::{DealRequest, EmployeeRequest};
    use crate::config::ConfigLoader;
    use crate::models::{EmployeeCategory, Payroll};
    use crate::store::InMemoryRepository;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_state() -> (AppState, Arc<InMemoryRepository>) {
        let config = ConfigLoader::load("./config/default").expect("Failed to load config");
        let repo = Arc::new(InMemoryRepository::new());
        (AppState::new(config, repo.clone()), repo)
    }

    fn create_valid_request() -> CalculationRequest {
        CalculationRequest {
            employee: EmployeeRequest {
                id: "emp_001".to_string(),
                category: EmployeeCategory::Skilled,
                position: "Sales Executive".to_string(),
                monthly_ctc: dec("35000"),
            },
            attendance: vec![],
            deals: vec![DealRequest {
                id: "deal_001".to_string(),
                employee_id: None,
                date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                deal_value: dec("6000"),
                cv_count: dec("1000000"),
                deal_type: Default::default(),
                is_supportive: false,
                number_of_sales: 1,
                builder_payment_received: true,
            }],
            month: 3,
            year: 2025,
            overrides: Default::default(),
        }
    }

    fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_calculate_valid_request_returns_200() {
        let (state, _) = create_test_state();
        let body = serde_json::to_string(&create_valid_request()).unwrap();

        let response = create_router(state)
            .oneshot(post("/calculate", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let envelope: PayrollResponse = body_json(response).await;
        assert_eq!(envelope.engine_version, env!("CARGO_PKG_VERSION"));
        assert!(envelope.outcome.is_none());
        assert_eq!(envelope.payroll.employee_id, "emp_001");
        assert_eq!(envelope.payroll.earnings.gross_salary, dec("35000"));
        // The only deal is the latest, so it stays locked.
        assert_eq!(envelope.payroll.incentive_details.unlocked_amount, Decimal::ZERO);
        assert_eq!(envelope.payroll.total_ctc, dec("44957"));
    }

    #[tokio::test]
    async fn test_calculate_malformed_json_returns_400() {
        let (state, _) = create_test_state();

        let response = create_router(state)
            .oneshot(post("/calculate", "{invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_calculate_missing_employee_id_returns_400() {
        let (state, _) = create_test_state();
        let body = r#"{
            "employee": { "category": "skilled", "monthly_ctc": 35000 },
            "month": 3,
            "year": 2025
        }"#;

        let response = create_router(state)
            .oneshot(post("/calculate", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("id"));
    }

    #[tokio::test]
    async fn test_calculate_invalid_month_returns_400() {
        let (state, _) = create_test_state();
        let mut request = create_valid_request();
        request.month = 13;

        let response = create_router(state)
            .oneshot(post("/calculate", serde_json::to_string(&request).unwrap()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "INVALID_PERIOD");
    }

    #[tokio::test]
    async fn test_calculate_negative_ctc_returns_400() {
        let (state, _) = create_test_state();
        let mut request = create_valid_request();
        request.employee.monthly_ctc = dec("-100");

        let response = create_router(state)
            .oneshot(post("/calculate", serde_json::to_string(&request).unwrap()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_run_unknown_employee_returns_404() {
        let (state, _) = create_test_state();
        let body = r#"{ "employee_id": "emp_404", "month": 3, "year": 2025 }"#;

        let response = create_router(state)
            .oneshot(post("/payroll/run", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "EMPLOYEE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_run_then_fetch_payroll() {
        let (state, repo) = create_test_state();
        repo.insert_employee(Employee {
            id: "emp_001".to_string(),
            category: EmployeeCategory::Skilled,
            position: "Sales Manager".to_string(),
            monthly_ctc: dec("35000"),
        });
        let router = create_router(state);
        let body = r#"{ "employee_id": "emp_001", "month": 3, "year": 2025 }"#;

        let first = router
            .clone()
            .oneshot(post("/payroll/run", body))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = router
            .clone()
            .oneshot(post("/payroll/run", body))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        let envelope: PayrollResponse = body_json(second).await;
        assert_eq!(envelope.outcome, Some(UpsertOutcome::Updated));

        let fetched = router
            .oneshot(
                Request::builder()
                    .uri("/payroll/emp_001/2025/3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(fetched.status(), StatusCode::OK);
        let payroll: Payroll = body_json(fetched).await;
        assert_eq!(payroll, envelope.payroll);
        assert_eq!(repo.payroll_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_missing_payroll_returns_404() {
        let (state, _) = create_test_state();

        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .uri("/payroll/emp_001/2025/3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "PAYROLL_NOT_FOUND");
    }
}
