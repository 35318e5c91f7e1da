//! Driver data models and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::Vehicle;

/// Represents a driver record from the database.
///
/// # Database Table
///
/// Maps to the `drivers` table. `assigned_vehicle_id` is the only place the
/// driver/vehicle link is stored. It is UNIQUE, so a vehicle has at most
/// one driver, and the vehicle side is always derived by lookup.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Driver {
    pub id: Uuid,

    /// Agency whose roster this driver is on
    pub agency_id: Uuid,

    pub full_name: String,

    pub email: Option<String>,

    /// Contact number shown to customers in ride confirmations
    pub mobile: Option<String>,

    pub license_number: Option<String>,

    pub address: Option<String>,

    pub age: Option<i32>,

    pub gender: Option<String>,

    pub assigned_vehicle_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

/// Values needed to insert a new driver.
#[derive(Debug, Clone)]
pub struct NewDriver {
    pub agency_id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub license_number: Option<String>,
    pub address: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,

    /// Written in the same statement, so a taken vehicle leaves no driver behind
    pub assigned_vehicle_id: Option<Uuid>,
}

/// Editable profile columns of a driver.
#[derive(Debug, Clone)]
pub struct DriverProfile {
    pub full_name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub license_number: Option<String>,
    pub address: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl From<&Driver> for DriverProfile {
    fn from(driver: &Driver) -> Self {
        Self {
            full_name: driver.full_name.clone(),
            email: driver.email.clone(),
            mobile: driver.mobile.clone(),
            license_number: driver.license_number.clone(),
            address: driver.address.clone(),
            age: driver.age,
            gender: driver.gender.clone(),
        }
    }
}

/// Request to add a driver to the roster.
///
/// # JSON Example
///
/// ```json
/// {
///   "full_name": "Imran Shaikh",
///   "mobile": "9819000000",
///   "license_number": "MH01 20190012345",
///   "assigned_vehicle_id": "660e8400-e29b-41d4-a716-446655440001"
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    pub full_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub license_number: Option<String>,
    pub address: Option<String>,
    #[validate(range(min = 0, max = 120))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub assigned_vehicle_id: Option<Uuid>,
}

/// Partial update of a driver's profile.
///
/// Omitted fields stay as they are; a blank string clears an optional field.
/// The vehicle is changed through [`AssignVehicleRequest`].
///
/// # JSON Example
///
/// ```json
/// { "mobile": "9819111111", "address": "" }
/// ```
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub license_number: Option<String>,
    pub address: Option<String>,
    #[validate(range(min = 0, max = 120))]
    pub age: Option<i32>,
    pub gender: Option<String>,
}

/// Request to change (or clear, with `null`) a driver's vehicle.
#[derive(Debug, Deserialize)]
pub struct AssignVehicleRequest {
    pub vehicle_id: Option<Uuid>,
}

/// Short view of the vehicle a driver is driving.
#[derive(Debug, Serialize)]
pub struct AssignedVehicleSummary {
    pub id: Uuid,
    pub vehicle_name: Option<String>,
    pub number_plate: String,
}

impl From<Vehicle> for AssignedVehicleSummary {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            vehicle_name: vehicle.vehicle_name,
            number_plate: vehicle.number_plate,
        }
    }
}

/// Response body for driver endpoints.
#[derive(Debug, Serialize)]
pub struct DriverResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub license_number: Option<String>,
    pub address: Option<String>,
    pub assigned_vehicle: Option<AssignedVehicleSummary>,
    pub created_at: DateTime<Utc>,
}

impl DriverResponse {
    pub fn new(driver: Driver, vehicle: Option<Vehicle>) -> Self {
        Self {
            id: driver.id,
            full_name: driver.full_name,
            email: driver.email,
            mobile: driver.mobile,
            license_number: driver.license_number,
            address: driver.address,
            assigned_vehicle: vehicle.map(Into::into),
            created_at: driver.created_at,
        }
    }
}
