//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::models::booking::BookingStatus;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Store Errors**: Any sqlx::Error from the record store
/// - **Authentication Errors**: Invalid or missing agency API keys
/// - **Resource Errors**: Booking, driver, vehicle or agency not found
/// - **Validation Errors**: Invalid request data (fare, dates, identifiers)
/// - **State Errors**: Booking status changes the lifecycle does not allow
///
/// Notification failures are not represented here: they belong to
/// [`crate::services::notifier::NotifyError`] and never reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Record store operation failed (connection error, query error).
    ///
    /// Returns HTTP 500 with the details hidden from the client.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// API key is missing, malformed or unknown.
    #[error("Invalid API key")]
    Unauthorized,

    /// Booking does not exist or belongs to another agency.
    #[error("Booking not found")]
    BookingNotFound,

    /// Driver does not exist or is not on the agency's roster.
    #[error("Driver not found")]
    DriverNotFound,

    /// Vehicle does not exist or belongs to another agency.
    #[error("Vehicle not found")]
    VehicleNotFound,

    /// Agency does not exist.
    #[error("Agency not found")]
    AgencyNotFound,

    /// Request body or parameters are invalid.
    ///
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// The booking is not in a state that allows the requested change.
    #[error("Cannot move booking from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// A unique field is already taken (email, number plate, assigned vehicle).
    #[error("Conflict")]
    Conflict(String),

    /// A server-side invariant failed (e.g. an earnings sum out of range).
    ///
    /// Returns HTTP 500; the details are logged, not sent to the client.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidRequest(format!("Validation failed: {errors}"))
    }
}

impl AppError {
    /// Shorthand for validation failures.
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::InvalidRequest(message.into())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `Unauthorized` → 401
/// - `*NotFound` → 404
/// - `InvalidRequest` → 400
/// - `InvalidTransition`, `Conflict` → 409
/// - `Database` → 500 (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", self.to_string()),
            AppError::BookingNotFound => {
                (StatusCode::NOT_FOUND, "booking_not_found", self.to_string())
            }
            AppError::DriverNotFound => {
                (StatusCode::NOT_FOUND, "driver_not_found", self.to_string())
            }
            AppError::VehicleNotFound => {
                (StatusCode::NOT_FOUND, "vehicle_not_found", self.to_string())
            }
            AppError::AgencyNotFound => {
                (StatusCode::NOT_FOUND, "agency_not_found", self.to_string())
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, "invalid_transition", self.to_string())
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Internal(ref detail) => {
                tracing::error!("Internal failure: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref err) => {
                tracing::error!("Store failure: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
