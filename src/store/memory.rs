//! In-memory record store.
//!
//! Mirrors the PostgreSQL schema's constraints (unique fields, the
//! one-driver-per-vehicle rule, `ON DELETE SET NULL` on vehicles) without
//! any external dependencies. Used by tests and local experiments.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    agency::{Agency, AgencyProfile, NewAgency},
    booking::{Approval, BOOKING_DATE_FORMAT, Booking, BookingStatus, NewBooking},
    driver::{Driver, DriverProfile, NewDriver},
    vehicle::{NewVehicle, Vehicle, VehicleDetails},
};
use crate::store::{RecordStore, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    agencies: Vec<Agency>,
    bookings: Vec<Booking>,
    drivers: Vec<Driver>,
    vehicles: Vec<Vehicle>,
}

/// Record store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail like a lost database connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Insert a booking exactly as given, bypassing the pending-only insert.
    pub fn seed_booking(&self, booking: Booking) {
        self.tables().bookings.push(booking);
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn same(a: &Option<String>, b: &Option<String>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

const DRIVER_TAKEN: &str = "A driver with this email, mobile, or license already exists";
const VEHICLE_HELD: &str = "Vehicle is already assigned to another driver";

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check_available()
    }

    async fn insert_agency(&self, agency: NewAgency) -> StoreResult<Agency> {
        self.check_available()?;
        let mut tables = self.tables();

        let duplicate = tables.agencies.iter().any(|a| {
            a.agency_email == agency.agency_email
                || same(&a.agency_mobile, &agency.agency_mobile)
                || same(&a.agency_license, &agency.agency_license)
                || same(&a.gst_number, &agency.gst_number)
                || same(&a.pan_number, &agency.pan_number)
        });
        if duplicate {
            return Err(AppError::Conflict(
                "An agency with this email, mobile, licence, GST or PAN already exists".to_string(),
            ));
        }

        let record = Agency {
            id: Uuid::new_v4(),
            agency_name: agency.agency_name,
            owner_name: agency.owner_name,
            operate_station: agency.operate_station,
            agency_email: agency.agency_email,
            agency_mobile: agency.agency_mobile,
            agency_license: agency.agency_license,
            gst_number: agency.gst_number,
            pan_number: agency.pan_number,
            api_key_hash: agency.api_key_hash,
            created_at: Utc::now(),
        };
        tables.agencies.push(record.clone());
        Ok(record)
    }

    async fn get_agency(&self, id: Uuid) -> StoreResult<Option<Agency>> {
        self.check_available()?;
        Ok(self.tables().agencies.iter().find(|a| a.id == id).cloned())
    }

    async fn find_agency_by_key_hash(&self, key_hash: &str) -> StoreResult<Option<Agency>> {
        self.check_available()?;
        Ok(self
            .tables()
            .agencies
            .iter()
            .find(|a| a.api_key_hash == key_hash)
            .cloned())
    }

    async fn update_agency(
        &self,
        id: Uuid,
        profile: &AgencyProfile,
    ) -> StoreResult<Option<Agency>> {
        self.check_available()?;
        let mut tables = self.tables();

        if tables
            .agencies
            .iter()
            .any(|a| a.id != id && same(&a.agency_mobile, &profile.agency_mobile))
        {
            return Err(AppError::Conflict(
                "An agency with this mobile already exists".to_string(),
            ));
        }

        let Some(agency) = tables.agencies.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        agency.agency_name = profile.agency_name.clone();
        agency.owner_name = profile.owner_name.clone();
        agency.operate_station = profile.operate_station.clone();
        agency.agency_mobile = profile.agency_mobile.clone();
        Ok(Some(agency.clone()))
    }

    async fn insert_booking(&self, booking: NewBooking) -> StoreResult<Booking> {
        self.check_available()?;
        let now = Utc::now();
        let record = Booking {
            id: Uuid::new_v4(),
            agency_id: booking.agency_id,
            customer_name: booking.customer_name,
            customer_email: booking.customer_email,
            pickup_address: booking.pickup_address,
            origin: booking.origin,
            destination: booking.destination,
            date: booking.date.format(BOOKING_DATE_FORMAT).to_string(),
            time: booking.time,
            status: BookingStatus::Pending,
            assigned_driver_id: None,
            assigned_vehicle_id: None,
            fare_cents: None,
            driver_name: None,
            requested_at: now,
            updated_at: now,
        };
        self.tables().bookings.push(record.clone());
        Ok(record)
    }

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        self.check_available()?;
        Ok(self.tables().bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bookings(
        &self,
        agency_id: Uuid,
        statuses: &[BookingStatus],
    ) -> StoreResult<Vec<Booking>> {
        self.check_available()?;
        let mut bookings: Vec<Booking> = self
            .tables()
            .bookings
            .iter()
            .filter(|b| b.agency_id == agency_id && statuses.contains(&b.status))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(bookings)
    }

    async fn approve_booking(
        &self,
        id: Uuid,
        approval: &Approval,
    ) -> StoreResult<Option<Booking>> {
        self.check_available()?;
        let mut tables = self.tables();
        let Some(booking) = tables
            .bookings
            .iter_mut()
            .find(|b| b.id == id && b.status == BookingStatus::Pending)
        else {
            return Ok(None);
        };

        booking.status = BookingStatus::Approved;
        booking.assigned_driver_id = Some(approval.driver_id);
        booking.driver_name = Some(approval.driver_name.clone());
        booking.assigned_vehicle_id = approval.vehicle_id;
        booking.fare_cents = Some(approval.fare_cents);
        booking.updated_at = Utc::now();
        Ok(Some(booking.clone()))
    }

    async fn set_booking_status(
        &self,
        id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> StoreResult<Option<Booking>> {
        self.check_available()?;
        let mut tables = self.tables();
        let Some(booking) = tables
            .bookings
            .iter_mut()
            .find(|b| b.id == id && b.status == expected)
        else {
            return Ok(None);
        };

        booking.status = next;
        booking.updated_at = Utc::now();
        Ok(Some(booking.clone()))
    }

    async fn insert_driver(&self, driver: NewDriver) -> StoreResult<Driver> {
        self.check_available()?;
        let mut tables = self.tables();

        let duplicate = tables.drivers.iter().any(|d| {
            same(&d.email, &driver.email)
                || same(&d.mobile, &driver.mobile)
                || same(&d.license_number, &driver.license_number)
        });
        if duplicate {
            return Err(AppError::Conflict(DRIVER_TAKEN.to_string()));
        }
        if let Some(vehicle_id) = driver.assigned_vehicle_id {
            if tables
                .drivers
                .iter()
                .any(|d| d.assigned_vehicle_id == Some(vehicle_id))
            {
                return Err(AppError::Conflict(VEHICLE_HELD.to_string()));
            }
        }

        let record = Driver {
            id: Uuid::new_v4(),
            agency_id: driver.agency_id,
            full_name: driver.full_name,
            email: driver.email,
            mobile: driver.mobile,
            license_number: driver.license_number,
            address: driver.address,
            age: driver.age,
            gender: driver.gender,
            assigned_vehicle_id: driver.assigned_vehicle_id,
            created_at: Utc::now(),
        };
        tables.drivers.push(record.clone());
        Ok(record)
    }

    async fn update_driver(
        &self,
        id: Uuid,
        profile: &DriverProfile,
    ) -> StoreResult<Option<Driver>> {
        self.check_available()?;
        let mut tables = self.tables();

        let duplicate = tables.drivers.iter().any(|d| {
            d.id != id
                && (same(&d.email, &profile.email)
                    || same(&d.mobile, &profile.mobile)
                    || same(&d.license_number, &profile.license_number))
        });
        if duplicate {
            return Err(AppError::Conflict(DRIVER_TAKEN.to_string()));
        }

        let Some(driver) = tables.drivers.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        driver.full_name = profile.full_name.clone();
        driver.email = profile.email.clone();
        driver.mobile = profile.mobile.clone();
        driver.license_number = profile.license_number.clone();
        driver.address = profile.address.clone();
        driver.age = profile.age;
        driver.gender = profile.gender.clone();
        Ok(Some(driver.clone()))
    }

    async fn get_driver(&self, id: Uuid) -> StoreResult<Option<Driver>> {
        self.check_available()?;
        Ok(self.tables().drivers.iter().find(|d| d.id == id).cloned())
    }

    async fn list_drivers(&self, agency_id: Uuid) -> StoreResult<Vec<Driver>> {
        self.check_available()?;
        let mut drivers: Vec<Driver> = self
            .tables()
            .drivers
            .iter()
            .filter(|d| d.agency_id == agency_id)
            .cloned()
            .collect();
        drivers.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(drivers)
    }

    async fn find_driver_by_vehicle(&self, vehicle_id: Uuid) -> StoreResult<Option<Driver>> {
        self.check_available()?;
        Ok(self
            .tables()
            .drivers
            .iter()
            .find(|d| d.assigned_vehicle_id == Some(vehicle_id))
            .cloned())
    }

    async fn assign_vehicle(
        &self,
        driver_id: Uuid,
        vehicle_id: Option<Uuid>,
    ) -> StoreResult<Option<Driver>> {
        self.check_available()?;
        let mut tables = self.tables();

        if let Some(vehicle_id) = vehicle_id {
            let held_elsewhere = tables
                .drivers
                .iter()
                .any(|d| d.id != driver_id && d.assigned_vehicle_id == Some(vehicle_id));
            if held_elsewhere {
                return Err(AppError::Conflict(VEHICLE_HELD.to_string()));
            }
        }

        let Some(driver) = tables.drivers.iter_mut().find(|d| d.id == driver_id) else {
            return Ok(None);
        };
        driver.assigned_vehicle_id = vehicle_id;
        Ok(Some(driver.clone()))
    }

    async fn delete_driver(&self, id: Uuid) -> StoreResult<bool> {
        self.check_available()?;
        let mut tables = self.tables();
        let before = tables.drivers.len();
        tables.drivers.retain(|d| d.id != id);
        Ok(tables.drivers.len() < before)
    }

    async fn insert_vehicle(&self, vehicle: NewVehicle) -> StoreResult<Vehicle> {
        self.check_available()?;
        let mut tables = self.tables();

        if tables
            .vehicles
            .iter()
            .any(|v| v.number_plate == vehicle.number_plate)
        {
            return Err(AppError::Conflict(
                "Vehicle with this number plate already exists".to_string(),
            ));
        }

        let record = Vehicle {
            id: Uuid::new_v4(),
            agency_id: vehicle.agency_id,
            vehicle_name: vehicle.vehicle_name,
            model: vehicle.model,
            number_plate: vehicle.number_plate,
            rc_number: vehicle.rc_number,
            insurance_number: vehicle.insurance_number,
            owner_name: vehicle.owner_name,
            ac_type: vehicle.ac_type,
            vehicle_type: vehicle.vehicle_type,
            max_capacity: vehicle.max_capacity,
            rate_per_km_cents: vehicle.rate_per_km_cents,
            created_at: Utc::now(),
        };
        tables.vehicles.push(record.clone());
        Ok(record)
    }

    async fn get_vehicle(&self, id: Uuid) -> StoreResult<Option<Vehicle>> {
        self.check_available()?;
        Ok(self.tables().vehicles.iter().find(|v| v.id == id).cloned())
    }

    async fn update_vehicle(
        &self,
        id: Uuid,
        details: &VehicleDetails,
    ) -> StoreResult<Option<Vehicle>> {
        self.check_available()?;
        let mut tables = self.tables();

        if tables
            .vehicles
            .iter()
            .any(|v| v.id != id && v.number_plate == details.number_plate)
        {
            return Err(AppError::Conflict(
                "Vehicle with this number plate already exists".to_string(),
            ));
        }

        let Some(vehicle) = tables.vehicles.iter_mut().find(|v| v.id == id) else {
            return Ok(None);
        };
        vehicle.vehicle_name = details.vehicle_name.clone();
        vehicle.model = details.model.clone();
        vehicle.number_plate = details.number_plate.clone();
        vehicle.rc_number = details.rc_number.clone();
        vehicle.insurance_number = details.insurance_number.clone();
        vehicle.owner_name = details.owner_name.clone();
        vehicle.ac_type = details.ac_type.clone();
        vehicle.vehicle_type = details.vehicle_type.clone();
        vehicle.max_capacity = details.max_capacity;
        vehicle.rate_per_km_cents = details.rate_per_km_cents;
        Ok(Some(vehicle.clone()))
    }

    async fn list_vehicles(&self, agency_id: Uuid) -> StoreResult<Vec<Vehicle>> {
        self.check_available()?;
        let mut vehicles: Vec<Vehicle> = self
            .tables()
            .vehicles
            .iter()
            .filter(|v| v.agency_id == agency_id)
            .cloned()
            .collect();
        vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vehicles)
    }

    async fn delete_vehicle(&self, id: Uuid) -> StoreResult<bool> {
        self.check_available()?;
        let mut tables = self.tables();
        let before = tables.vehicles.len();
        tables.vehicles.retain(|v| v.id != id);
        if tables.vehicles.len() == before {
            return Ok(false);
        }

        for driver in tables
            .drivers
            .iter_mut()
            .filter(|d| d.assigned_vehicle_id == Some(id))
        {
            driver.assigned_vehicle_id = None;
        }
        Ok(true)
    }
}
