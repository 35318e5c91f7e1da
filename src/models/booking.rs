//! Booking data models and API request/response types.
//!
//! This module defines:
//! - `BookingStatus`: the booking lifecycle and its transition table
//! - `Booking`: Database entity representing a customer's ride request
//! - Request types for booking requests, approval and status changes
//! - `BookingResponse`: Response body returned to clients

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Calendar date format bookings are stored and requested in.
pub const BOOKING_DATE_FORMAT: &str = "%Y-%m-%d";

/// Highest fare an approval accepts: ₹1,00,00,000 in paise.
pub const MAX_FARE_CENTS: i64 = 1_000_000_000;

/// Lifecycle of a booking.
///
/// ```text
/// pending ──► approved ──► ongoing ──► completed
///    │
///    └──────► rejected
/// ```
///
/// Every change goes through [`BookingStatus::can_transition_to`]; there is
/// no way back and `rejected`/`completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Ongoing,
    Completed,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Ongoing => "ongoing",
            BookingStatus::Completed => "completed",
            BookingStatus::Rejected => "rejected",
        }
    }

    /// Transition table for the booking lifecycle.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Approved)
                | (BookingStatus::Pending, BookingStatus::Rejected)
                | (BookingStatus::Approved, BookingStatus::Ongoing)
                | (BookingStatus::Ongoing, BookingStatus::Completed)
        )
    }

    /// Check a transition, producing the error the API reports on refusal.
    pub fn transition_to(self, next: BookingStatus) -> Result<BookingStatus, AppError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Statuses listed on the "approved rides" board.
    pub const ACCEPTED: [BookingStatus; 3] = [
        BookingStatus::Approved,
        BookingStatus::Ongoing,
        BookingStatus::Completed,
    ];
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "approved" => Ok(BookingStatus::Approved),
            "ongoing" => Ok(BookingStatus::Ongoing),
            "completed" => Ok(BookingStatus::Completed),
            "rejected" => Ok(BookingStatus::Rejected),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents a booking record from the database.
///
/// # Database Table
///
/// Maps to the `bookings` table. Driver and vehicle columns are snapshots
/// taken at approval time and carry no foreign keys, so earnings history
/// survives a driver being removed from the roster.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Booking {
    pub id: Uuid,

    /// Agency the request was sent to
    pub agency_id: Uuid,

    pub customer_name: Option<String>,

    /// Address the confirmation is delivered to
    pub customer_email: Option<String>,

    pub pickup_address: Option<String>,

    /// Route start
    pub origin: String,

    /// Route end
    pub destination: String,

    /// Calendar date, `YYYY-MM-DD`
    #[sqlx(rename = "ride_date")]
    pub date: String,

    #[sqlx(rename = "ride_time")]
    pub time: Option<String>,

    #[sqlx(try_from = "String")]
    pub status: BookingStatus,

    pub assigned_driver_id: Option<Uuid>,

    pub assigned_vehicle_id: Option<Uuid>,

    /// Fare in cents, set on approval
    pub fare_cents: Option<i64>,

    /// Driver's name as it was when the booking was approved
    pub driver_name: Option<String>,

    pub requested_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Fields written by a successful approval.
///
/// `vehicle_id` is `None` only on the degraded path where the driver has
/// no vehicle to resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct Approval {
    pub driver_id: Uuid,
    pub driver_name: String,
    pub vehicle_id: Option<Uuid>,
    pub fare_cents: i64,
}

/// Values needed to insert a new pending booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub agency_id: Uuid,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub pickup_address: Option<String>,
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub time: Option<String>,
}

/// Customer request for a ride.
///
/// # JSON Example
///
/// ```json
/// {
///   "customer_name": "Asha Rao",
///   "customer_email": "asha@example.com",
///   "pickup_address": "Platform 2 exit",
///   "from": "Dadar",
///   "to": "Andheri",
///   "date": "2025-11-03",
///   "time": "09:30"
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub customer_name: Option<String>,
    #[validate(email)]
    pub customer_email: Option<String>,
    pub pickup_address: Option<String>,
    pub from: String,
    pub to: String,
    pub date: String,
    pub time: Option<String>,
}

/// Request to approve a pending booking.
///
/// # JSON Example
///
/// ```json
/// {
///   "driver_id": "550e8400-e29b-41d4-a716-446655440000",
///   "fare_cents": 45000
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct ApproveBookingRequest {
    pub driver_id: Uuid,

    /// Between 0 and `MAX_FARE_CENTS`
    pub fare_cents: i64,
}

/// Request to move an approved booking along its ride lifecycle.
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

/// Response returned for booking operations.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub pickup_address: Option<String>,
    pub from: String,
    pub to: String,
    pub date: String,
    pub time: Option<String>,
    pub status: BookingStatus,
    pub assigned_driver_id: Option<Uuid>,
    pub assigned_vehicle_id: Option<Uuid>,
    pub fare_cents: Option<i64>,
    pub driver_name: Option<String>,
    pub requested_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            customer_name: booking.customer_name,
            customer_email: booking.customer_email,
            pickup_address: booking.pickup_address,
            from: booking.origin,
            to: booking.destination,
            date: booking.date,
            time: booking.time,
            status: booking.status,
            assigned_driver_id: booking.assigned_driver_id,
            assigned_vehicle_id: booking.assigned_vehicle_id,
            fare_cents: booking.fare_cents,
            driver_name: booking.driver_name,
            requested_at: booking.requested_at,
        }
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_booking_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), BOOKING_DATE_FORMAT)
        .map_err(|_| AppError::invalid(format!("Invalid date '{value}', expected YYYY-MM-DD")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_only_be_approved_or_rejected() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Ongoing));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn decided_bookings_cannot_be_decided_again() {
        use BookingStatus::*;
        for from in [Approved, Ongoing, Completed, Rejected] {
            assert!(!from.can_transition_to(Approved), "{from} -> approved");
            assert!(!from.can_transition_to(Rejected), "{from} -> rejected");
        }
    }

    #[test]
    fn ride_progresses_forward_only() {
        use BookingStatus::*;
        assert!(Approved.can_transition_to(Ongoing));
        assert!(Ongoing.can_transition_to(Completed));
        assert!(!Approved.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Ongoing));
    }

    #[test]
    fn refused_transition_reports_both_ends() {
        let err = BookingStatus::Rejected
            .transition_to(BookingStatus::Approved)
            .unwrap_err();
        match err {
            AppError::InvalidTransition { from, to } => {
                assert_eq!(from, BookingStatus::Rejected);
                assert_eq!(to, BookingStatus::Approved);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_parses_from_stored_text() {
        assert_eq!(
            BookingStatus::try_from("completed".to_string()),
            Ok(BookingStatus::Completed)
        );
        assert!(BookingStatus::try_from("archived".to_string()).is_err());
    }

    #[test]
    fn booking_dates_must_be_calendar_dates() {
        assert_eq!(
            parse_booking_date("2025-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(parse_booking_date("01/03/2025").is_err());
        assert!(parse_booking_date("2025-02-30").is_err());
    }
}
