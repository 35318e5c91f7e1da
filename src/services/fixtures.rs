//! Shared setup for service tests.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{
    agency::{Agency, NewAgency},
    booking::{Booking, BookingStatus, NewBooking},
    driver::{Driver, NewDriver},
    vehicle::{NewVehicle, Vehicle},
};
use crate::store::{RecordStore, memory::MemoryStore};

pub(crate) async fn agency(store: &MemoryStore, name: &str) -> Agency {
    store
        .insert_agency(NewAgency {
            agency_name: name.to_string(),
            owner_name: None,
            operate_station: Some("Dadar".to_string()),
            agency_email: format!("{}@agency.example", Uuid::new_v4()),
            agency_mobile: None,
            agency_license: None,
            gst_number: None,
            pan_number: None,
            api_key_hash: Uuid::new_v4().to_string(),
        })
        .await
        .unwrap()
}

pub(crate) async fn vehicle(store: &MemoryStore, agency_id: Uuid, plate: &str) -> Vehicle {
    store
        .insert_vehicle(NewVehicle {
            agency_id,
            vehicle_name: Some("Dzire".to_string()),
            model: Some("2022".to_string()),
            number_plate: plate.to_string(),
            rc_number: None,
            insurance_number: None,
            owner_name: None,
            ac_type: Some("AC".to_string()),
            vehicle_type: Some("Sedan".to_string()),
            max_capacity: Some(4),
            rate_per_km_cents: Some(1800),
        })
        .await
        .unwrap()
}

pub(crate) async fn driver(store: &MemoryStore, agency_id: Uuid, name: &str) -> Driver {
    store
        .insert_driver(NewDriver {
            agency_id,
            full_name: name.to_string(),
            email: None,
            mobile: Some(format!("98{}", &Uuid::new_v4().simple().to_string()[..8])),
            license_number: None,
            address: None,
            age: Some(34),
            gender: None,
            assigned_vehicle_id: None,
        })
        .await
        .unwrap()
}

pub(crate) async fn pending_booking(
    store: &MemoryStore,
    agency_id: Uuid,
    customer_email: Option<&str>,
) -> Booking {
    store
        .insert_booking(NewBooking {
            agency_id,
            customer_name: Some("Asha Rao".to_string()),
            customer_email: customer_email.map(str::to_string),
            pickup_address: Some("Platform 2 exit".to_string()),
            origin: "Dadar".to_string(),
            destination: "Andheri".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
            time: Some("09:30".to_string()),
        })
        .await
        .unwrap()
}

/// A booking in any state, with an optional driver attribution.
pub(crate) fn booking(
    agency_id: Uuid,
    status: BookingStatus,
    date: &str,
    fare_cents: Option<i64>,
    driver: Option<(Uuid, &str)>,
) -> Booking {
    let now = Utc::now();
    Booking {
        id: Uuid::new_v4(),
        agency_id,
        customer_name: Some("Customer".to_string()),
        customer_email: Some("customer@example.com".to_string()),
        pickup_address: None,
        origin: "Dadar".to_string(),
        destination: "Bandra".to_string(),
        date: date.to_string(),
        time: None,
        status,
        assigned_driver_id: driver.map(|(id, _)| id),
        assigned_vehicle_id: None,
        fare_cents,
        driver_name: driver.map(|(_, name)| name.to_string()),
        requested_at: now,
        updated_at: now,
    }
}
