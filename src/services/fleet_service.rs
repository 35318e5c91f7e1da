//! Drivers, vehicles and the link between them.
//!
//! The link lives on the driver (`assigned_vehicle_id`). A vehicle's driver
//! is always looked up, so the two sides cannot disagree: reassigning,
//! deleting a driver or deleting a vehicle all clear it from both views.

use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{
    driver::{CreateDriverRequest, Driver, DriverProfile, NewDriver, UpdateDriverRequest},
    vehicle::{CreateVehicleRequest, NewVehicle, UpdateVehicleRequest, Vehicle, VehicleDetails},
};
use crate::services::agency_service::{patched, patched_required, trimmed};
use crate::store::RecordStore;

/// Add a driver to an agency's roster, optionally with a vehicle.
///
/// Driver and vehicle link are written in one insert.
///
/// # Errors
///
/// - `InvalidRequest`: blank name, malformed email or age outside 0..=120
/// - `VehicleNotFound`: the vehicle is not in the agency's fleet
/// - `Conflict`: duplicate email/mobile/licence, or the vehicle is taken
pub async fn create_driver(
    store: &dyn RecordStore,
    agency_id: Uuid,
    mut request: CreateDriverRequest,
) -> Result<(Driver, Option<Vehicle>), AppError> {
    let full_name = request.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(AppError::invalid("Driver name is required"));
    }

    request.email = trimmed(request.email).map(|e| e.to_lowercase());
    request.validate()?;

    let vehicle = match request.assigned_vehicle_id {
        Some(vehicle_id) => Some(free_vehicle(store, agency_id, vehicle_id).await?),
        None => None,
    };

    let driver = store
        .insert_driver(NewDriver {
            agency_id,
            full_name,
            email: request.email,
            mobile: trimmed(request.mobile),
            license_number: trimmed(request.license_number),
            address: trimmed(request.address),
            age: request.age,
            gender: trimmed(request.gender),
            assigned_vehicle_id: vehicle.as_ref().map(|v| v.id),
        })
        .await?;

    tracing::info!(driver_id = %driver.id, %agency_id, "Driver added");

    Ok((driver, vehicle))
}

/// Edit a driver's profile. The vehicle is changed with [`reassign_vehicle`].
///
/// Bookings keep the name they were approved with.
///
/// # Errors
///
/// - `DriverNotFound`: no such driver in the agency
/// - `InvalidRequest`: name set to blank, malformed email, age outside 0..=120
/// - `Conflict`: email, mobile or licence belongs to another driver
pub async fn update_driver(
    store: &dyn RecordStore,
    agency_id: Uuid,
    driver_id: Uuid,
    mut request: UpdateDriverRequest,
) -> Result<(Driver, Option<Vehicle>), AppError> {
    let driver = owned_driver(store, agency_id, driver_id).await?;

    // A blank email clears the column and is not validated
    let email = request.email.take().map(|e| e.trim().to_lowercase());
    request.email = email.clone().filter(|e| !e.is_empty());
    request.validate()?;

    let mut profile = DriverProfile::from(&driver);
    profile.full_name = patched_required(profile.full_name, request.full_name)
        .ok_or_else(|| AppError::invalid("Driver name is required"))?;
    profile.email = patched(profile.email, email);
    profile.mobile = patched(profile.mobile, request.mobile);
    profile.license_number = patched(profile.license_number, request.license_number);
    profile.address = patched(profile.address, request.address);
    profile.age = request.age.or(profile.age);
    profile.gender = patched(profile.gender, request.gender);

    let driver = store
        .update_driver(driver_id, &profile)
        .await?
        .ok_or(AppError::DriverNotFound)?;
    let vehicle = match driver.assigned_vehicle_id {
        Some(vehicle_id) => store.get_vehicle(vehicle_id).await?,
        None => None,
    };

    tracing::info!(%driver_id, "Driver profile updated");

    Ok((driver, vehicle))
}

/// The agency's drivers with the vehicle each one drives.
pub async fn list_drivers(
    store: &dyn RecordStore,
    agency_id: Uuid,
) -> Result<Vec<(Driver, Option<Vehicle>)>, AppError> {
    let drivers = store.list_drivers(agency_id).await?;
    let mut listed = Vec::with_capacity(drivers.len());
    for driver in drivers {
        let vehicle = match driver.assigned_vehicle_id {
            Some(vehicle_id) => store.get_vehicle(vehicle_id).await?,
            None => None,
        };
        listed.push((driver, vehicle));
    }
    Ok(listed)
}

/// Give a driver another vehicle, or none.
///
/// The driver's previous vehicle becomes available in the same write.
pub async fn reassign_vehicle(
    store: &dyn RecordStore,
    agency_id: Uuid,
    driver_id: Uuid,
    vehicle_id: Option<Uuid>,
) -> Result<(Driver, Option<Vehicle>), AppError> {
    let driver = owned_driver(store, agency_id, driver_id).await?;

    let vehicle = match vehicle_id {
        Some(vehicle_id) if driver.assigned_vehicle_id == Some(vehicle_id) => {
            owned_vehicle(store, agency_id, vehicle_id).await.map(Some)?
        }
        Some(vehicle_id) => Some(free_vehicle(store, agency_id, vehicle_id).await?),
        None => None,
    };

    let driver = store
        .assign_vehicle(driver_id, vehicle.as_ref().map(|v| v.id))
        .await?
        .ok_or(AppError::DriverNotFound)?;

    tracing::info!(
        %driver_id,
        vehicle_id = ?driver.assigned_vehicle_id,
        "Driver vehicle changed"
    );

    Ok((driver, vehicle))
}

/// Remove a driver; their vehicle becomes available.
///
/// Bookings keep the driver's id and name snapshot.
pub async fn delete_driver(
    store: &dyn RecordStore,
    agency_id: Uuid,
    driver_id: Uuid,
) -> Result<(), AppError> {
    owned_driver(store, agency_id, driver_id).await?;
    if !store.delete_driver(driver_id).await? {
        return Err(AppError::DriverNotFound);
    }
    tracing::info!(%driver_id, "Driver deleted");
    Ok(())
}

/// Add a vehicle to an agency's fleet.
///
/// # Errors
///
/// - `InvalidRequest`: blank number plate, negative capacity or rate
/// - `Conflict`: number plate already registered
pub async fn create_vehicle(
    store: &dyn RecordStore,
    agency_id: Uuid,
    request: CreateVehicleRequest,
) -> Result<Vehicle, AppError> {
    let number_plate = request.number_plate.trim().to_uppercase();
    if number_plate.is_empty() {
        return Err(AppError::invalid("Number plate is required"));
    }
    request.validate()?;

    let vehicle = store
        .insert_vehicle(NewVehicle {
            agency_id,
            vehicle_name: trimmed(request.vehicle_name),
            model: trimmed(request.model),
            number_plate,
            rc_number: trimmed(request.rc_number),
            insurance_number: trimmed(request.insurance_number),
            owner_name: trimmed(request.owner_name),
            ac_type: trimmed(request.ac_type),
            vehicle_type: trimmed(request.vehicle_type),
            max_capacity: request.max_capacity,
            rate_per_km_cents: request.rate_per_km_cents,
        })
        .await?;

    tracing::info!(vehicle_id = %vehicle.id, %agency_id, "Vehicle added");

    Ok(vehicle)
}

/// Edit a vehicle's details. Its driver, if any, stays assigned.
///
/// # Errors
///
/// - `VehicleNotFound`: no such vehicle in the agency
/// - `InvalidRequest`: plate set to blank, negative capacity or rate
/// - `Conflict`: the new plate belongs to another vehicle
pub async fn update_vehicle(
    store: &dyn RecordStore,
    agency_id: Uuid,
    vehicle_id: Uuid,
    request: UpdateVehicleRequest,
) -> Result<(Vehicle, Option<Driver>), AppError> {
    let vehicle = owned_vehicle(store, agency_id, vehicle_id).await?;
    request.validate()?;

    let mut details = VehicleDetails::from(&vehicle);
    details.number_plate = patched_required(
        details.number_plate,
        request.number_plate.map(|p| p.to_uppercase()),
    )
    .ok_or_else(|| AppError::invalid("Number plate is required"))?;
    details.vehicle_name = patched(details.vehicle_name, request.vehicle_name);
    details.model = patched(details.model, request.model);
    details.rc_number = patched(details.rc_number, request.rc_number);
    details.insurance_number = patched(details.insurance_number, request.insurance_number);
    details.owner_name = patched(details.owner_name, request.owner_name);
    details.ac_type = patched(details.ac_type, request.ac_type);
    details.vehicle_type = patched(details.vehicle_type, request.vehicle_type);
    details.max_capacity = request.max_capacity.or(details.max_capacity);
    details.rate_per_km_cents = request.rate_per_km_cents.or(details.rate_per_km_cents);

    let vehicle = store
        .update_vehicle(vehicle_id, &details)
        .await?
        .ok_or(AppError::VehicleNotFound)?;
    let driver = store.find_driver_by_vehicle(vehicle_id).await?;

    tracing::info!(%vehicle_id, "Vehicle details updated");

    Ok((vehicle, driver))
}

/// The agency's vehicles with the driver assigned to each.
pub async fn list_vehicles(
    store: &dyn RecordStore,
    agency_id: Uuid,
) -> Result<Vec<(Vehicle, Option<Driver>)>, AppError> {
    let vehicles = store.list_vehicles(agency_id).await?;
    let mut listed = Vec::with_capacity(vehicles.len());
    for vehicle in vehicles {
        let driver = store.find_driver_by_vehicle(vehicle.id).await?;
        listed.push((vehicle, driver));
    }
    Ok(listed)
}

/// Remove a vehicle; its driver is left without one.
pub async fn delete_vehicle(
    store: &dyn RecordStore,
    agency_id: Uuid,
    vehicle_id: Uuid,
) -> Result<(), AppError> {
    owned_vehicle(store, agency_id, vehicle_id).await?;
    if !store.delete_vehicle(vehicle_id).await? {
        return Err(AppError::VehicleNotFound);
    }
    tracing::info!(%vehicle_id, "Vehicle deleted");
    Ok(())
}

async fn owned_driver(
    store: &dyn RecordStore,
    agency_id: Uuid,
    driver_id: Uuid,
) -> Result<Driver, AppError> {
    store
        .get_driver(driver_id)
        .await?
        .filter(|d| d.agency_id == agency_id)
        .ok_or(AppError::DriverNotFound)
}

async fn owned_vehicle(
    store: &dyn RecordStore,
    agency_id: Uuid,
    vehicle_id: Uuid,
) -> Result<Vehicle, AppError> {
    store
        .get_vehicle(vehicle_id)
        .await?
        .filter(|v| v.agency_id == agency_id)
        .ok_or(AppError::VehicleNotFound)
}

/// An agency vehicle nobody is driving.
async fn free_vehicle(
    store: &dyn RecordStore,
    agency_id: Uuid,
    vehicle_id: Uuid,
) -> Result<Vehicle, AppError> {
    let vehicle = owned_vehicle(store, agency_id, vehicle_id).await?;
    if store.find_driver_by_vehicle(vehicle_id).await?.is_some() {
        return Err(AppError::Conflict(
            "Vehicle is already assigned to another driver".to_string(),
        ));
    }
    Ok(vehicle)
}
