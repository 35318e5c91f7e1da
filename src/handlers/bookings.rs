//! Booking HTTP handlers.
//!
//! - POST /api/v1/agencies/{agency_id}/bookings - Customer ride request (public)
//! - GET /api/v1/bookings/pending - Requests waiting for a decision
//! - GET /api/v1/bookings/approved - Approved, ongoing and completed rides
//! - POST /api/v1/bookings/{id}/approve - Approve with driver and fare
//! - POST /api/v1/bookings/{id}/reject - Reject
//! - POST /api/v1/bookings/{id}/status - Mark ongoing or completed

use crate::{
    error::AppError,
    middleware::auth::AgencyContext,
    models::booking::{
        ApproveBookingRequest, BookingResponse, CreateBookingRequest, UpdateBookingStatusRequest,
    },
    services::booking_service::{self, NotificationStatus},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use uuid::Uuid;

/// Response of `POST /api/v1/bookings/{id}/approve`.
///
/// ```json
/// {
///   "booking": { "id": "...", "status": "approved", "fare_cents": 45000, "...": "..." },
///   "notification": { "status": "sent", "recipient": "asha@example.com" }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ApproveBookingResponse {
    pub booking: BookingResponse,
    pub notification: NotificationStatus,
}

/// Create a ride request for an agency.
///
/// # Response
///
/// - **Success (201 Created)**: The `pending` booking
/// - **Error (400)**: Missing route or malformed date / email
/// - **Error (404)**: Unknown agency
pub async fn request_booking(
    State(state): State<AppState>,
    Path(agency_id): Path<Uuid>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking =
        booking_service::request_booking(state.store.as_ref(), agency_id, request).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// List pending bookings, newest first.
pub async fn list_pending(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = booking_service::list_pending(state.store.as_ref(), agency.agency_id).await?;

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// List accepted rides (approved, ongoing, completed), newest first.
pub async fn list_approved(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = booking_service::list_accepted(state.store.as_ref(), agency.agency_id).await?;

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// Approve a pending booking.
///
/// # Request Body
///
/// ```json
/// {
///   "driver_id": "660e8400-e29b-41d4-a716-446655440001",
///   "fare_cents": 45000
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: Updated booking and notification outcome. A
///   confirmation that could not be sent does not turn this into an error.
/// - **Error (400)**: Negative fare
/// - **Error (404)**: Booking or driver not found
/// - **Error (409)**: Booking is no longer pending
pub async fn approve_booking(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<ApproveBookingRequest>,
) -> Result<Json<ApproveBookingResponse>, AppError> {
    let outcome = booking_service::approve_booking(
        state.store.as_ref(),
        state.notifier.as_ref(),
        agency.agency_id,
        booking_id,
        request.driver_id,
        request.fare_cents,
    )
    .await?;

    Ok(Json(ApproveBookingResponse {
        booking: outcome.booking.into(),
        notification: outcome.notification,
    }))
}

/// Reject a pending booking.
pub async fn reject_booking(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking =
        booking_service::reject_booking(state.store.as_ref(), agency.agency_id, booking_id)
            .await?;

    Ok(Json(booking.into()))
}

/// Advance a ride to `ongoing` or `completed`.
///
/// # Request Body
///
/// ```json
/// { "status": "completed" }
/// ```
pub async fn update_status(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = booking_service::advance_booking(
        state.store.as_ref(),
        agency.agency_id,
        booking_id,
        request.status,
    )
    .await?;

    Ok(Json(booking.into()))
}
