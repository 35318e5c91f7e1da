//! Record store abstraction.
//!
//! The services never talk to PostgreSQL directly. They go through
//! [`RecordStore`], which has two implementations:
//! - [`postgres::PgStore`]: the production store backed by a sqlx pool
//! - [`memory::MemoryStore`]: an in-process store used by tests
//!
//! Unique-field violations surface as `AppError::Conflict`; every other
//! backend failure surfaces as `AppError::Database`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    agency::{Agency, AgencyProfile, NewAgency},
    booking::{Approval, Booking, BookingStatus, NewBooking},
    driver::{Driver, DriverProfile, NewDriver},
    vehicle::{NewVehicle, Vehicle, VehicleDetails},
};

pub mod memory;
pub mod postgres;

/// Result type for store operations
pub type StoreResult<T> = Result<T, AppError>;

/// CRUD access to agencies, drivers, vehicles and bookings.
///
/// Lookups by id are not scoped to an agency; ownership checks belong to
/// the services.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Cheap round trip used by the health check.
    async fn ping(&self) -> StoreResult<()>;

    async fn insert_agency(&self, agency: NewAgency) -> StoreResult<Agency>;

    async fn get_agency(&self, id: Uuid) -> StoreResult<Option<Agency>>;

    async fn find_agency_by_key_hash(&self, key_hash: &str) -> StoreResult<Option<Agency>>;

    /// Overwrite the editable profile columns. `None` when no such agency.
    async fn update_agency(&self, id: Uuid, profile: &AgencyProfile)
    -> StoreResult<Option<Agency>>;

    /// Insert a booking in `pending` state.
    async fn insert_booking(&self, booking: NewBooking) -> StoreResult<Booking>;

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<Booking>>;

    /// Bookings of an agency in any of `statuses`, newest request first.
    async fn list_bookings(
        &self,
        agency_id: Uuid,
        statuses: &[BookingStatus],
    ) -> StoreResult<Vec<Booking>>;

    /// Write an approval, but only while the booking is still `pending`.
    ///
    /// Returns `None` when the booking is gone or was decided meanwhile.
    async fn approve_booking(&self, id: Uuid, approval: &Approval)
    -> StoreResult<Option<Booking>>;

    /// Change only the status, but only while it equals `expected`.
    async fn set_booking_status(
        &self,
        id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> StoreResult<Option<Booking>>;

    /// Insert a driver together with its vehicle link.
    ///
    /// A vehicle already held by another driver yields `AppError::Conflict`
    /// and nothing is written.
    async fn insert_driver(&self, driver: NewDriver) -> StoreResult<Driver>;

    /// Overwrite the profile columns; the vehicle link is left alone.
    async fn update_driver(&self, id: Uuid, profile: &DriverProfile)
    -> StoreResult<Option<Driver>>;

    async fn get_driver(&self, id: Uuid) -> StoreResult<Option<Driver>>;

    /// Drivers of an agency ordered by name.
    async fn list_drivers(&self, agency_id: Uuid) -> StoreResult<Vec<Driver>>;

    /// The driver currently assigned to a vehicle, if any.
    async fn find_driver_by_vehicle(&self, vehicle_id: Uuid) -> StoreResult<Option<Driver>>;

    /// Point a driver at a vehicle (or at none).
    ///
    /// Together with [`RecordStore::insert_driver`] this is the only write
    /// path for the driver/vehicle link. A vehicle already held by another
    /// driver yields `AppError::Conflict`.
    async fn assign_vehicle(
        &self,
        driver_id: Uuid,
        vehicle_id: Option<Uuid>,
    ) -> StoreResult<Option<Driver>>;

    /// Returns false when no such driver existed.
    async fn delete_driver(&self, id: Uuid) -> StoreResult<bool>;

    async fn insert_vehicle(&self, vehicle: NewVehicle) -> StoreResult<Vehicle>;

    async fn get_vehicle(&self, id: Uuid) -> StoreResult<Option<Vehicle>>;

    async fn update_vehicle(
        &self,
        id: Uuid,
        details: &VehicleDetails,
    ) -> StoreResult<Option<Vehicle>>;

    /// Vehicles of an agency, most recently added first.
    async fn list_vehicles(&self, agency_id: Uuid) -> StoreResult<Vec<Vehicle>>;

    /// Delete a vehicle; the driver holding it is left without a vehicle.
    async fn delete_vehicle(&self, id: Uuid) -> StoreResult<bool>;
}
