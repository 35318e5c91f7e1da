//! Driver roster handlers.
//!
//! - POST /api/v1/drivers - Add a driver
//! - GET /api/v1/drivers - List drivers with their vehicles
//! - PATCH /api/v1/drivers/{id} - Edit a driver's profile
//! - PUT /api/v1/drivers/{id}/vehicle - Change or clear a driver's vehicle
//! - DELETE /api/v1/drivers/{id} - Remove a driver

use crate::{
    error::AppError,
    middleware::auth::AgencyContext,
    models::driver::{
        AssignVehicleRequest, CreateDriverRequest, DriverResponse, UpdateDriverRequest,
    },
    services::fleet_service,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// Add a driver to the roster.
///
/// # Response
///
/// - **Success (201 Created)**: The driver, with its vehicle if one was given
/// - **Error (404)**: Vehicle not in this agency's fleet
/// - **Error (409)**: Duplicate contact details, or the vehicle is taken
pub async fn create_driver(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
    Json(request): Json<CreateDriverRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (driver, vehicle) =
        fleet_service::create_driver(state.store.as_ref(), agency.agency_id, request).await?;

    Ok((StatusCode::CREATED, Json(DriverResponse::new(driver, vehicle))))
}

/// List the agency's drivers ordered by name.
pub async fn list_drivers(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
) -> Result<Json<Vec<DriverResponse>>, AppError> {
    let drivers = fleet_service::list_drivers(state.store.as_ref(), agency.agency_id).await?;

    Ok(Json(
        drivers
            .into_iter()
            .map(|(driver, vehicle)| DriverResponse::new(driver, vehicle))
            .collect(),
    ))
}

/// Edit a driver's profile; omitted fields are kept.
///
/// # Response
///
/// - **Success (200 OK)**: The updated driver with its vehicle
/// - **Error (400)**: Blank name, malformed email or age out of range
/// - **Error (404)**: Driver not on this agency's roster
/// - **Error (409)**: Email, mobile or licence belongs to another driver
pub async fn update_driver(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
    Path(driver_id): Path<Uuid>,
    Json(request): Json<UpdateDriverRequest>,
) -> Result<Json<DriverResponse>, AppError> {
    let (driver, vehicle) =
        fleet_service::update_driver(state.store.as_ref(), agency.agency_id, driver_id, request)
            .await?;

    Ok(Json(DriverResponse::new(driver, vehicle)))
}

/// Point a driver at another vehicle, or at none with `{"vehicle_id": null}`.
pub async fn assign_vehicle(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
    Path(driver_id): Path<Uuid>,
    Json(request): Json<AssignVehicleRequest>,
) -> Result<Json<DriverResponse>, AppError> {
    let (driver, vehicle) = fleet_service::reassign_vehicle(
        state.store.as_ref(),
        agency.agency_id,
        driver_id,
        request.vehicle_id,
    )
    .await?;

    Ok(Json(DriverResponse::new(driver, vehicle)))
}

/// Remove a driver. Returns 204 No Content.
pub async fn delete_driver(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
    Path(driver_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    fleet_service::delete_driver(state.store.as_ref(), agency.agency_id, driver_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
