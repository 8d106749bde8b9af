//! HTTP request handlers for the advance engine API.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::AdvanceFilter;

use super::request::{AdvanceAmountRequest, TransitionRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employees/:employee_id/accrual", get(accrual_handler))
        .route("/employees/:employee_id/advances/quote", post(quote_handler))
        .route("/employees/:employee_id/advances", post(create_handler))
        .route("/advances", get(list_handler))
        .route("/advances/:request_id", get(get_handler))
        .route("/advances/:request_id/transitions", post(transition_handler))
        .with_state(state)
}

/// Maps a JSON body rejection to a 400 response.
fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("MISSING_FIELD", body_text)
            } else {
                ApiError::malformed(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

fn path_rejection(correlation_id: Uuid, rejection: PathRejection) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %rejection, "Invalid path parameter");
    ApiErrorResponse::bad_request(ApiError::malformed(rejection.body_text()))
}

fn query_rejection(correlation_id: Uuid, rejection: QueryRejection) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %rejection, "Invalid query string");
    ApiErrorResponse::bad_request(ApiError::malformed(rejection.body_text()))
}

/// Turns a service result into a JSON response.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    started: Instant,
    success: StatusCode,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                status = success.as_u16(),
                duration_us = started.elapsed().as_micros(),
                "Request completed"
            );
            (success, Json(body)).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Request failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /employees/:employee_id/accrual.
async fn accrual_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Calculating accrual");

    let result = state.service().calculate_accrual(&employee_id).await;
    respond(correlation_id, started, StatusCode::OK, result)
}

/// Handler for POST /employees/:employee_id/advances/quote.
///
/// Quotes the cost of an advance without persisting anything.
async fn quote_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<AdvanceAmountRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Quoting advance");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection).into_response(),
    };

    let result = state
        .service()
        .calculate_cost(request.requested_amount, request.reason_id, &employee_id)
        .await;
    respond(correlation_id, started, StatusCode::OK, result)
}

/// Handler for POST /employees/:employee_id/advances.
async fn create_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<AdvanceAmountRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Submitting advance");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection).into_response(),
    };

    let result = state
        .service()
        .create_advance_request(request.requested_amount, request.reason_id, &employee_id)
        .await;
    respond(correlation_id, started, StatusCode::CREATED, result)
}

/// Handler for GET /advances.
async fn list_handler(
    State(state): State<AppState>,
    query: Result<Query<AdvanceFilter>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let filter = match query {
        Ok(Query(filter)) => filter,
        Err(rejection) => return query_rejection(correlation_id, rejection).into_response(),
    };
    info!(correlation_id = %correlation_id, filter = ?filter, "Listing advances");

    let result = state.service().list_advance_requests(&filter).await;
    respond(correlation_id, started, StatusCode::OK, result)
}

/// Handler for GET /advances/:request_id.
async fn get_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let request_id = match path {
        Ok(Path(request_id)) => request_id,
        Err(rejection) => return path_rejection(correlation_id, rejection).into_response(),
    };
    info!(correlation_id = %correlation_id, request_id = %request_id, "Fetching advance");

    let result = state.service().get_advance_request(request_id).await;
    respond(correlation_id, started, StatusCode::OK, result)
}

/// Handler for POST /advances/:request_id/transitions.
async fn transition_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let request_id = match path {
        Ok(Path(request_id)) => request_id,
        Err(rejection) => return path_rejection(correlation_id, rejection).into_response(),
    };
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection).into_response(),
    };
    info!(
        correlation_id = %correlation_id,
        request_id = %request_id,
        to_status = %request.to_status,
        actor_id = %request.actor.id,
        "Changing advance status"
    );

    let result = state
        .service()
        .transition_advance_status(request_id, request.to_status, request.actor)
        .await;
    respond(correlation_id, started, StatusCode::OK, result)
}
