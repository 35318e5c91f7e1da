//! Ride confirmation content and the mail relay payload.
//!
//! # Flow
//!
//! 1. An approval resolves booking, agency, driver and vehicle
//! 2. `RideConfirmation` collects the display values
//! 3. `render_html` fills the fixed template
//! 4. The notifier delivers subject + HTML to the customer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{agency::Agency, booking::Booking, driver::Driver, vehicle::Vehicle};

/// Subject line of every ride confirmation.
pub const CONFIRMATION_SUBJECT: &str = "Confirmation: Your Sharing Yatra Ride is Approved";

const MISSING: &str = "N/A";

/// Display values of a ride confirmation.
///
/// Besides the greeting name, the message carries eleven detail rows:
/// pickup address, from, to, date & time, fare, agency, driver name,
/// driver mobile, vehicle name, vehicle type and vehicle plate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideConfirmation {
    pub customer_name: String,
    pub customer_email: String,
    pub pickup_address: String,
    pub from: String,
    pub to: String,
    pub date_time: String,
    pub fare: String,
    pub agency_name: String,
    pub driver_name: String,
    pub driver_mobile: String,
    pub vehicle_name: String,
    pub vehicle_type: String,
    pub vehicle_plate: String,
}

impl RideConfirmation {
    pub fn new(
        booking: &Booking,
        customer_email: &str,
        agency: Option<&Agency>,
        driver: &Driver,
        vehicle: &Vehicle,
        fare_cents: i64,
    ) -> Self {
        Self {
            customer_name: non_empty(booking.customer_name.as_deref())
                .unwrap_or("Valued Customer")
                .to_string(),
            customer_email: customer_email.to_string(),
            pickup_address: or_missing(booking.pickup_address.as_deref()),
            from: or_missing(Some(&booking.origin)),
            to: or_missing(Some(&booking.destination)),
            date_time: format!(
                "{} at {}",
                or_missing(Some(&booking.date)),
                or_missing(booking.time.as_deref())
            ),
            fare: format_fare(fare_cents),
            agency_name: or_missing(agency.map(|a| a.agency_name.as_str())),
            driver_name: driver.full_name.clone(),
            driver_mobile: or_missing(driver.mobile.as_deref()),
            vehicle_name: or_missing(vehicle.vehicle_name.as_deref()),
            vehicle_type: or_missing(vehicle.ac_type.as_deref()),
            vehicle_plate: or_missing(Some(&vehicle.number_plate)),
        }
    }

    /// Detail rows in template order.
    pub fn rows(&self) -> [(&'static str, &str); 11] {
        [
            ("Pick Up Address", self.pickup_address.as_str()),
            ("From", self.from.as_str()),
            ("To", self.to.as_str()),
            ("Date & Time", self.date_time.as_str()),
            ("Total Fare", self.fare.as_str()),
            ("Approved Agency", self.agency_name.as_str()),
            ("Driver Name", self.driver_name.as_str()),
            ("Driver Mobile", self.driver_mobile.as_str()),
            ("Vehicle Name", self.vehicle_name.as_str()),
            ("Vehicle Type", self.vehicle_type.as_str()),
            ("Vehicle Plate", self.vehicle_plate.as_str()),
        ]
    }

    /// Render the confirmation email body.
    ///
    /// Every interpolated value is HTML-escaped.
    pub fn render_html(&self) -> String {
        let rows = self.rows();
        let (ride_rows, crew_rows) = rows.split_at(6);
        let table = |rows: &[(&str, &str)]| {
            rows.iter()
                .map(|(label, value)| {
                    format!(
                        "<tr><th>{}</th><td>{}</td></tr>",
                        escape_html(label),
                        escape_html(value)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Ride Confirmation | Sharing Yatra</title>
</head>
<body style="margin: 0; padding: 0; background-color: #f4f7f6; font-family: Arial, sans-serif;">
<h1 style="background-color: #0056b3; color: white; padding: 20px;">Sharing Yatra</h1>
<p>Dear <b>{customer}</b>,</p>
<p>We are pleased to confirm your ride booking. Please find the details below.</p>
<h3>Your Ride Details</h3>
<table border="1" cellpadding="8" cellspacing="0">
{ride}
</table>
<h3>Your Driver &amp; Vehicle Details</h3>
<table border="1" cellpadding="8" cellspacing="0">
{crew}
</table>
<p>Thank you for choosing <b>Sharing Yatra</b>. We wish you a safe and pleasant journey!</p>
</body>
</html>
"#,
            customer = escape_html(&self.customer_name),
            ride = table(ride_rows),
            crew = table(crew_rows),
        )
    }
}

/// Message posted to the mail relay.
///
/// # Example
///
/// ```json
/// {
///   "event_type": "booking.approved",
///   "event_id": "550e8400-e29b-41d4-a716-446655440000",
///   "created_at": "2025-01-15T10:30:00Z",
///   "from": "no-reply@sharingyatra.app",
///   "to": "asha@example.com",
///   "subject": "Confirmation: Your Sharing Yatra Ride is Approved",
///   "html": "<!DOCTYPE html>..."
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct RelayMessage {
    pub event_type: String,
    pub event_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl RelayMessage {
    pub fn new(event_id: Uuid, from: &str, to: &str, subject: &str, html: &str) -> Self {
        Self {
            event_type: "booking.approved".to_string(),
            event_id,
            created_at: Utc::now(),
            from: from.to_string(),
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        }
    }
}

/// `45050` -> `"₹ 450.50"`
pub fn format_fare(fare_cents: i64) -> String {
    format!("₹ {}.{:02}", fare_cents / 100, fare_cents % 100)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn or_missing(value: Option<&str>) -> String {
    non_empty(value).unwrap_or(MISSING).to_string()
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
