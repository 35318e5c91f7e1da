//! Fleet handlers.
//!
//! - POST /api/v1/vehicles - Add a vehicle
//! - GET /api/v1/vehicles - List vehicles with their drivers
//! - PATCH /api/v1/vehicles/{id} - Edit a vehicle
//! - DELETE /api/v1/vehicles/{id} - Remove a vehicle

use crate::{
    error::AppError,
    middleware::auth::AgencyContext,
    models::vehicle::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse},
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

/// Add a vehicle. The number plate is required and unique.
pub async fn create_vehicle(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle =
        fleet_service::create_vehicle(state.store.as_ref(), agency.agency_id, request).await?;

    Ok((StatusCode::CREATED, Json(VehicleResponse::new(vehicle, None))))
}

/// List vehicles, newest first.
///
/// # Response
///
/// ```json
/// [
///   {
///     "id": "660e8400-e29b-41d4-a716-446655440001",
///     "vehicle_name": "Dzire",
///     "number_plate": "MH02AB1234",
///     "assigned_driver_id": "770e8400-e29b-41d4-a716-446655440002",
///     "assigned_driver_name": "Imran Shaikh",
///     "available": false
///   }
/// ]
/// ```
pub async fn list_vehicles(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let vehicles = fleet_service::list_vehicles(state.store.as_ref(), agency.agency_id).await?;

    Ok(Json(
        vehicles
            .into_iter()
            .map(|(vehicle, driver)| VehicleResponse::new(vehicle, driver))
            .collect(),
    ))
}

/// Edit a vehicle's details; omitted fields are kept.
pub async fn update_vehicle(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
    Path(vehicle_id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<VehicleResponse>, AppError> {
    let (vehicle, driver) =
        fleet_service::update_vehicle(state.store.as_ref(), agency.agency_id, vehicle_id, request)
            .await?;

    Ok(Json(VehicleResponse::new(vehicle, driver)))
}

/// Remove a vehicle; its driver becomes unassigned. Returns 204 No Content.
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    fleet_service::delete_vehicle(state.store.as_ref(), agency.agency_id, vehicle_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
