//! Agency handlers.
//!
//! - POST /api/v1/agencies - Register an agency (public)
//! - GET /api/v1/agencies/me - The calling agency's profile
//! - PATCH /api/v1/agencies/me - Edit the calling agency's profile

use crate::{
    error::AppError,
    middleware::auth::AgencyContext,
    models::agency::{AgencyResponse, RegisterAgencyRequest, UpdateAgencyRequest},
    services::agency_service,
    state::AppState,
};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

/// Register a new agency.
///
/// # Endpoint
///
/// `POST /api/v1/agencies`
///
/// # Response
///
/// - **Success (201 Created)**: The agency, with its API key
/// - **Error (400)**: Blank name or malformed email
/// - **Error (409)**: Email, mobile, licence, GST or PAN already registered
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "agency_name": "Western Line Cabs",
///   "agency_email": "ops@westernline.example",
///   "api_key": "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
///   "created_at": "2025-11-01T10:00:00Z"
/// }
/// ```
///
/// # Security Note
///
/// The `api_key` is only ever returned here. Store it securely.
pub async fn register_agency(
    State(state): State<AppState>,
    Json(request): Json<RegisterAgencyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (agency, api_key) = agency_service::register_agency(state.store.as_ref(), request).await?;

    let response = AgencyResponse::from(agency).with_api_key(api_key);
    Ok((StatusCode::CREATED, Json(response)))
}

/// The calling agency's profile. The API key is never included.
pub async fn get_current_agency(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
) -> Result<Json<AgencyResponse>, AppError> {
    let agency = agency_service::get_agency(state.store.as_ref(), agency.agency_id).await?;

    Ok(Json(AgencyResponse::from(agency)))
}

/// Edit the calling agency's name, owner, station or mobile.
///
/// # Response
///
/// - **Success (200 OK)**: The updated agency
/// - **Error (400)**: Blank agency name
/// - **Error (409)**: Mobile already used by another agency
pub async fn update_current_agency(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
    Json(request): Json<UpdateAgencyRequest>,
) -> Result<Json<AgencyResponse>, AppError> {
    let agency =
        agency_service::update_agency(state.store.as_ref(), agency.agency_id, request).await?;

    Ok(Json(AgencyResponse::from(agency)))
}
