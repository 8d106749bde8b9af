//! Error responses for the HTTP API.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, TransitionConflict};

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
    /// Per-field messages for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, String>>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            field_errors: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a malformed request error response.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_REQUEST", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response for a body, path or query that could not be decoded.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("CONFIG_ERROR", message),
            ),
            EngineError::Ineligible(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details("ADVANCE_NOT_AVAILABLE", message, reason.to_string()),
            ),
            EngineError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError {
                    field_errors: Some(fields.as_map().clone()),
                    ..ApiError::new("VALIDATION_ERROR", message)
                },
            ),
            EngineError::StateConflict { conflict, .. } => {
                let code = match conflict {
                    TransitionConflict::ConcurrentModification => "CONCURRENT_MODIFICATION",
                    _ => "INVALID_TRANSITION",
                };
                (
                    StatusCode::CONFLICT,
                    ApiError::with_details(code, message, conflict.to_string()),
                )
            }
            EngineError::EmployeeNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("EMPLOYEE_NOT_FOUND", message),
            ),
            EngineError::CompanyNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("COMPANY_NOT_FOUND", message),
            ),
            EngineError::RequestNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("REQUEST_NOT_FOUND", message),
            ),
            EngineError::Persistence { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("PERSISTENCE_ERROR", message),
            ),
            EngineError::CalculationError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("CALCULATION_ERROR", message),
            ),
        };
        Self { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FieldErrors, Ineligibility};
    use crate::models::AdvanceStatus;
    use uuid::Uuid;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
        assert!(!json.contains("field_errors"));
    }

    #[test]
    fn test_validation_maps_field_errors() {
        let err = EngineError::requested_amount("must be greater than zero");
        let response: ApiErrorResponse = err.into();

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.error.code, "VALIDATION_ERROR");
        let fields = response.error.field_errors.unwrap();
        assert_eq!(fields["requested_amount"], "must be greater than zero");
    }

    #[test]
    fn test_ineligible_is_unprocessable() {
        let response: ApiErrorResponse =
            EngineError::Ineligible(Ineligibility::CompanyInactive).into();
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.error.details.as_deref(), Some("company inactive"));
    }

    #[test]
    fn test_state_conflicts_are_409() {
        let paid: ApiErrorResponse = EngineError::StateConflict {
            request_id: Uuid::new_v4(),
            conflict: TransitionConflict::AlreadyPaid,
        }
        .into();
        assert_eq!(paid.status, StatusCode::CONFLICT);
        assert_eq!(paid.error.code, "INVALID_TRANSITION");

        let same: ApiErrorResponse = EngineError::StateConflict {
            request_id: Uuid::new_v4(),
            conflict: TransitionConflict::AlreadyInState {
                status: AdvanceStatus::Approved,
            },
        }
        .into();
        assert!(same.error.details.unwrap().contains("APPROVED"));

        let raced: ApiErrorResponse = EngineError::StateConflict {
            request_id: Uuid::new_v4(),
            conflict: TransitionConflict::ConcurrentModification,
        }
        .into();
        assert_eq!(raced.error.code, "CONCURRENT_MODIFICATION");
    }

    #[test]
    fn test_persistence_is_generic() {
        let response: ApiErrorResponse = EngineError::Persistence {
            operation: "creation",
        }
        .into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.message, "An error occurred during creation");
    }

    #[test]
    fn test_empty_field_errors_still_serialize() {
        let response: ApiErrorResponse = EngineError::Validation(FieldErrors::default()).into();
        let json = serde_json::to_string(&response.error).unwrap();
        assert!(json.contains("\"field_errors\":{}"));
    }
}
