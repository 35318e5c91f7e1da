//! PostgreSQL record store.
//!
//! Connection pooling and migrations live here too: the pool is created
//! once at startup and every query runs through it.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    agency::{Agency, AgencyProfile, NewAgency},
    booking::{Approval, BOOKING_DATE_FORMAT, Booking, BookingStatus, NewBooking},
    driver::{Driver, DriverProfile, NewDriver},
    vehicle::{NewVehicle, Vehicle, VehicleDetails},
};
use crate::store::{RecordStore, StoreResult};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// - Maximum connections: 5
/// - Connections are created lazily as needed
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the server
/// cannot be reached.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Run the SQL migrations embedded from `migrations/`.
///
/// Applied migrations are tracked in `_sqlx_migrations`, so each runs once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
fn unique_or_database(err: sqlx::Error, message: &str) -> AppError {
    let is_unique = err
        .as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false);

    if is_unique {
        AppError::Conflict(message.to_string())
    } else {
        AppError::Database(err)
    }
}

/// Record store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_agency(&self, agency: NewAgency) -> StoreResult<Agency> {
        sqlx::query_as::<_, Agency>(
            r#"
            INSERT INTO agencies (
                agency_name,
                owner_name,
                operate_station,
                agency_email,
                agency_mobile,
                agency_license,
                gst_number,
                pan_number,
                api_key_hash
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(agency.agency_name)
        .bind(agency.owner_name)
        .bind(agency.operate_station)
        .bind(agency.agency_email)
        .bind(agency.agency_mobile)
        .bind(agency.agency_license)
        .bind(agency.gst_number)
        .bind(agency.pan_number)
        .bind(agency.api_key_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            unique_or_database(
                e,
                "An agency with this email, mobile, licence, GST or PAN already exists",
            )
        })
    }

    async fn get_agency(&self, id: Uuid) -> StoreResult<Option<Agency>> {
        let agency = sqlx::query_as::<_, Agency>("SELECT * FROM agencies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(agency)
    }

    async fn find_agency_by_key_hash(&self, key_hash: &str) -> StoreResult<Option<Agency>> {
        let agency = sqlx::query_as::<_, Agency>("SELECT * FROM agencies WHERE api_key_hash = $1")
            .bind(key_hash)
            .fetch_optional(&self.pool)
            .await?;

        Ok(agency)
    }

    async fn update_agency(
        &self,
        id: Uuid,
        profile: &AgencyProfile,
    ) -> StoreResult<Option<Agency>> {
        sqlx::query_as::<_, Agency>(
            r#"
            UPDATE agencies
            SET agency_name = $2,
                owner_name = $3,
                operate_station = $4,
                agency_mobile = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&profile.agency_name)
        .bind(&profile.owner_name)
        .bind(&profile.operate_station)
        .bind(&profile.agency_mobile)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_or_database(e, "An agency with this mobile already exists"))
    }

    async fn insert_booking(&self, booking: NewBooking) -> StoreResult<Booking> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                agency_id,
                customer_name,
                customer_email,
                pickup_address,
                origin,
                destination,
                ride_date,
                ride_time,
                status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending')
            RETURNING *
            "#,
        )
        .bind(booking.agency_id)
        .bind(booking.customer_name)
        .bind(booking.customer_email)
        .bind(booking.pickup_address)
        .bind(booking.origin)
        .bind(booking.destination)
        .bind(booking.date.format(BOOKING_DATE_FORMAT).to_string())
        .bind(booking.time)
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    async fn list_bookings(
        &self,
        agency_id: Uuid,
        statuses: &[BookingStatus],
    ) -> StoreResult<Vec<Booking>> {
        let statuses: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();

        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE agency_id = $1 AND status = ANY($2)
            ORDER BY requested_at DESC
            "#,
        )
        .bind(agency_id)
        .bind(&statuses)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn approve_booking(
        &self,
        id: Uuid,
        approval: &Approval,
    ) -> StoreResult<Option<Booking>> {
        // The status guard makes a concurrent second approval a no-op
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'approved',
                assigned_driver_id = $2,
                driver_name = $3,
                assigned_vehicle_id = $4,
                fare_cents = $5,
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(approval.driver_id)
        .bind(&approval.driver_name)
        .bind(approval.vehicle_id)
        .bind(approval.fare_cents)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn set_booking_status(
        &self,
        id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> StoreResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected.as_str())
        .bind(next.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn insert_driver(&self, driver: NewDriver) -> StoreResult<Driver> {
        sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (
                agency_id,
                full_name,
                email,
                mobile,
                license_number,
                address,
                age,
                gender,
                assigned_vehicle_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(driver.agency_id)
        .bind(driver.full_name)
        .bind(driver.email)
        .bind(driver.mobile)
        .bind(driver.license_number)
        .bind(driver.address)
        .bind(driver.age)
        .bind(driver.gender)
        .bind(driver.assigned_vehicle_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            unique_or_database(
                e,
                "A driver with this email, mobile, or license already exists, \
                 or the vehicle is assigned to another driver",
            )
        })
    }

    async fn update_driver(
        &self,
        id: Uuid,
        profile: &DriverProfile,
    ) -> StoreResult<Option<Driver>> {
        sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET full_name = $2,
                email = $3,
                mobile = $4,
                license_number = $5,
                address = $6,
                age = $7,
                gender = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&profile.full_name)
        .bind(&profile.email)
        .bind(&profile.mobile)
        .bind(&profile.license_number)
        .bind(&profile.address)
        .bind(profile.age)
        .bind(&profile.gender)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            unique_or_database(
                e,
                "A driver with this email, mobile, or license already exists",
            )
        })
    }

    async fn get_driver(&self, id: Uuid) -> StoreResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    async fn list_drivers(&self, agency_id: Uuid) -> StoreResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE agency_id = $1 ORDER BY full_name ASC",
        )
        .bind(agency_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    async fn find_driver_by_vehicle(&self, vehicle_id: Uuid) -> StoreResult<Option<Driver>> {
        let driver =
            sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE assigned_vehicle_id = $1")
                .bind(vehicle_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(driver)
    }

    async fn assign_vehicle(
        &self,
        driver_id: Uuid,
        vehicle_id: Option<Uuid>,
    ) -> StoreResult<Option<Driver>> {
        sqlx::query_as::<_, Driver>(
            "UPDATE drivers SET assigned_vehicle_id = $2 WHERE id = $1 RETURNING *",
        )
        .bind(driver_id)
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_or_database(e, "Vehicle is already assigned to another driver"))
    }

    async fn delete_driver(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_vehicle(&self, vehicle: NewVehicle) -> StoreResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                agency_id,
                vehicle_name,
                model,
                number_plate,
                rc_number,
                insurance_number,
                owner_name,
                ac_type,
                vehicle_type,
                max_capacity,
                rate_per_km_cents
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(vehicle.agency_id)
        .bind(vehicle.vehicle_name)
        .bind(vehicle.model)
        .bind(vehicle.number_plate)
        .bind(vehicle.rc_number)
        .bind(vehicle.insurance_number)
        .bind(vehicle.owner_name)
        .bind(vehicle.ac_type)
        .bind(vehicle.vehicle_type)
        .bind(vehicle.max_capacity)
        .bind(vehicle.rate_per_km_cents)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_or_database(e, "Vehicle with this number plate already exists"))
    }

    async fn get_vehicle(&self, id: Uuid) -> StoreResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn update_vehicle(
        &self,
        id: Uuid,
        details: &VehicleDetails,
    ) -> StoreResult<Option<Vehicle>> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET vehicle_name = $2,
                model = $3,
                number_plate = $4,
                rc_number = $5,
                insurance_number = $6,
                owner_name = $7,
                ac_type = $8,
                vehicle_type = $9,
                max_capacity = $10,
                rate_per_km_cents = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&details.vehicle_name)
        .bind(&details.model)
        .bind(&details.number_plate)
        .bind(&details.rc_number)
        .bind(&details.insurance_number)
        .bind(&details.owner_name)
        .bind(&details.ac_type)
        .bind(&details.vehicle_type)
        .bind(details.max_capacity)
        .bind(details.rate_per_km_cents)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_or_database(e, "Vehicle with this number plate already exists"))
    }

    async fn list_vehicles(&self, agency_id: Uuid) -> StoreResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE agency_id = $1 ORDER BY created_at DESC",
        )
        .bind(agency_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn delete_vehicle(&self, id: Uuid) -> StoreResult<bool> {
        // drivers.assigned_vehicle_id is ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
