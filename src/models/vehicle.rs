//! Vehicle data models and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::driver::Driver;

/// Represents a vehicle record from the database.
///
/// A vehicle does not store its driver. Who drives it is answered by
/// looking up the driver whose `assigned_vehicle_id` points here.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Vehicle {
    pub id: Uuid,

    pub agency_id: Uuid,

    pub vehicle_name: Option<String>,

    pub model: Option<String>,

    /// Registration plate, unique across all agencies
    pub number_plate: String,

    pub rc_number: Option<String>,

    pub insurance_number: Option<String>,

    pub owner_name: Option<String>,

    /// AC / non-AC, shown as "Vehicle Type" in ride confirmations
    pub ac_type: Option<String>,

    /// Body style (sedan, SUV, ...)
    pub vehicle_type: Option<String>,

    pub max_capacity: Option<i32>,

    pub rate_per_km_cents: Option<i64>,

    pub created_at: DateTime<Utc>,
}

/// Values needed to insert a new vehicle.
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub agency_id: Uuid,
    pub vehicle_name: Option<String>,
    pub model: Option<String>,
    pub number_plate: String,
    pub rc_number: Option<String>,
    pub insurance_number: Option<String>,
    pub owner_name: Option<String>,
    pub ac_type: Option<String>,
    pub vehicle_type: Option<String>,
    pub max_capacity: Option<i32>,
    pub rate_per_km_cents: Option<i64>,
}

/// Editable columns of a vehicle.
#[derive(Debug, Clone)]
pub struct VehicleDetails {
    pub vehicle_name: Option<String>,
    pub model: Option<String>,
    pub number_plate: String,
    pub rc_number: Option<String>,
    pub insurance_number: Option<String>,
    pub owner_name: Option<String>,
    pub ac_type: Option<String>,
    pub vehicle_type: Option<String>,
    pub max_capacity: Option<i32>,
    pub rate_per_km_cents: Option<i64>,
}

impl From<&Vehicle> for VehicleDetails {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            vehicle_name: vehicle.vehicle_name.clone(),
            model: vehicle.model.clone(),
            number_plate: vehicle.number_plate.clone(),
            rc_number: vehicle.rc_number.clone(),
            insurance_number: vehicle.insurance_number.clone(),
            owner_name: vehicle.owner_name.clone(),
            ac_type: vehicle.ac_type.clone(),
            vehicle_type: vehicle.vehicle_type.clone(),
            max_capacity: vehicle.max_capacity,
            rate_per_km_cents: vehicle.rate_per_km_cents,
        }
    }
}

/// Request to add a vehicle to the fleet.
///
/// # JSON Example
///
/// ```json
/// {
///   "vehicle_name": "Dzire",
///   "number_plate": "MH02AB1234",
///   "ac_type": "AC",
///   "vehicle_type": "Sedan",
///   "max_capacity": 4
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    pub vehicle_name: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub number_plate: String,
    pub rc_number: Option<String>,
    pub insurance_number: Option<String>,
    pub owner_name: Option<String>,
    pub ac_type: Option<String>,
    pub vehicle_type: Option<String>,
    #[validate(range(min = 0))]
    pub max_capacity: Option<i32>,
    #[validate(range(min = 0))]
    pub rate_per_km_cents: Option<i64>,
}

/// Partial update of a vehicle. Omitted fields stay as they are; a blank
/// string clears an optional text field. The number plate cannot be cleared.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    pub vehicle_name: Option<String>,
    pub model: Option<String>,
    pub number_plate: Option<String>,
    pub rc_number: Option<String>,
    pub insurance_number: Option<String>,
    pub owner_name: Option<String>,
    pub ac_type: Option<String>,
    pub vehicle_type: Option<String>,
    #[validate(range(min = 0))]
    pub max_capacity: Option<i32>,
    #[validate(range(min = 0))]
    pub rate_per_km_cents: Option<i64>,
}

/// Response body for vehicle endpoints.
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub vehicle_name: Option<String>,
    pub model: Option<String>,
    pub number_plate: String,
    pub ac_type: Option<String>,
    pub vehicle_type: Option<String>,
    pub max_capacity: Option<i32>,
    pub rate_per_km_cents: Option<i64>,
    pub assigned_driver_id: Option<Uuid>,
    pub assigned_driver_name: Option<String>,
    /// True when no driver is assigned
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl VehicleResponse {
    pub fn new(vehicle: Vehicle, driver: Option<Driver>) -> Self {
        Self {
            id: vehicle.id,
            vehicle_name: vehicle.vehicle_name,
            model: vehicle.model,
            number_plate: vehicle.number_plate,
            ac_type: vehicle.ac_type,
            vehicle_type: vehicle.vehicle_type,
            max_capacity: vehicle.max_capacity,
            rate_per_km_cents: vehicle.rate_per_km_cents,
            available: driver.is_none(),
            assigned_driver_id: driver.as_ref().map(|d| d.id),
            assigned_driver_name: driver.map(|d| d.full_name),
            created_at: vehicle.created_at,
        }
    }
}
