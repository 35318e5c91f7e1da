//! Booking service - ride requests and the approval workflow.
//!
//! This service handles:
//! - Customer ride requests (created `pending`)
//! - Approval: driver and vehicle resolution, fare, confirmation message
//! - Rejection and ride progress (`ongoing`, `completed`)
//!
//! # Approval Guarantees
//!
//! - Only a `pending` booking can be approved or rejected; the store applies
//!   the change conditionally, so two operators cannot both decide one booking
//! - The booking update is the durable effect. The confirmation is sent
//!   afterwards and its failure is logged, never propagated

use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{
    booking::{
        Approval, Booking, BookingStatus, CreateBookingRequest, MAX_FARE_CENTS, NewBooking,
        parse_booking_date,
    },
    notification::{CONFIRMATION_SUBJECT, RideConfirmation},
};
use crate::services::agency_service::trimmed;
use crate::services::notifier::Notifier;
use crate::store::RecordStore;

/// What happened to the confirmation of an approval.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationStatus {
    /// Handed to the notifier successfully
    Sent { recipient: String },

    /// Not attempted because data needed for the message is missing
    Skipped { reason: String },

    /// Attempted and failed; the approval stands
    Failed { reason: String },
}

/// Result of an approval.
#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    pub booking: Booking,
    pub notification: NotificationStatus,
    pub confirmation: Option<RideConfirmation>,
}

/// Create a ride request for an agency.
///
/// # Validation
///
/// - `from` and `to` must not be blank
/// - `date` must be `YYYY-MM-DD`
/// - `customer_email`, when given, must be a valid email address
///
/// # Errors
///
/// - `AgencyNotFound`: no such agency
/// - `InvalidRequest`: validation failed
pub async fn request_booking(
    store: &dyn RecordStore,
    agency_id: Uuid,
    mut request: CreateBookingRequest,
) -> Result<Booking, AppError> {
    let origin = request.from.trim().to_string();
    let destination = request.to.trim().to_string();
    if origin.is_empty() || destination.is_empty() {
        return Err(AppError::invalid("Both 'from' and 'to' are required"));
    }

    let date = parse_booking_date(&request.date)?;

    request.customer_email = trimmed(request.customer_email);
    request.validate()?;

    store
        .get_agency(agency_id)
        .await?
        .ok_or(AppError::AgencyNotFound)?;

    let booking = store
        .insert_booking(NewBooking {
            agency_id,
            customer_name: trimmed(request.customer_name),
            customer_email: request.customer_email,
            pickup_address: trimmed(request.pickup_address),
            origin,
            destination,
            date,
            time: trimmed(request.time),
        })
        .await?;

    tracing::info!(booking_id = %booking.id, %agency_id, "Booking requested");

    Ok(booking)
}

/// Pending requests waiting for a decision, newest first.
pub async fn list_pending(
    store: &dyn RecordStore,
    agency_id: Uuid,
) -> Result<Vec<Booking>, AppError> {
    store
        .list_bookings(agency_id, &[BookingStatus::Pending])
        .await
}

/// Approved, ongoing and completed rides, newest first.
pub async fn list_accepted(
    store: &dyn RecordStore,
    agency_id: Uuid,
) -> Result<Vec<Booking>, AppError> {
    store
        .list_bookings(agency_id, &BookingStatus::ACCEPTED)
        .await
}

/// Approve a pending booking and confirm it to the customer.
///
/// # Process
///
/// 1. Validate the fare (0 to `MAX_FARE_CENTS`)
/// 2. Resolve the booking (must belong to the agency and be `pending`)
/// 3. Resolve the driver (must be on the agency's roster) and its vehicle
/// 4. Write status, driver, driver name snapshot, vehicle and fare
/// 5. Send the confirmation when vehicle and customer email are known
///
/// A driver without a vehicle, or a booking without a customer email, still
/// gets approved; the confirmation is then skipped.
///
/// # Errors
///
/// - `InvalidRequest`: fare below zero or above `MAX_FARE_CENTS`
/// - `BookingNotFound` / `DriverNotFound`: unknown or foreign records
/// - `InvalidTransition`: booking already decided
/// - `Database`: store failure (nothing after the failing step runs)
pub async fn approve_booking(
    store: &dyn RecordStore,
    notifier: &dyn Notifier,
    agency_id: Uuid,
    booking_id: Uuid,
    driver_id: Uuid,
    fare_cents: i64,
) -> Result<ApprovalOutcome, AppError> {
    if !(0..=MAX_FARE_CENTS).contains(&fare_cents) {
        return Err(AppError::invalid(format!(
            "Fare must be between 0 and {MAX_FARE_CENTS} paise"
        )));
    }

    let booking = owned_booking(store, agency_id, booking_id).await?;
    booking.status.transition_to(BookingStatus::Approved)?;

    let driver = store
        .get_driver(driver_id)
        .await?
        .filter(|d| d.agency_id == agency_id)
        .ok_or(AppError::DriverNotFound)?;

    let vehicle = match driver.assigned_vehicle_id {
        Some(vehicle_id) => store.get_vehicle(vehicle_id).await?,
        None => None,
    };

    let agency = store.get_agency(booking.agency_id).await?;

    let approval = Approval {
        driver_id: driver.id,
        driver_name: driver.full_name.clone(),
        vehicle_id: vehicle.as_ref().map(|v| v.id),
        fare_cents,
    };

    let booking = match store.approve_booking(booking_id, &approval).await? {
        Some(updated) => updated,
        None => return Err(refused(store, booking_id, BookingStatus::Approved).await),
    };

    tracing::info!(
        %booking_id,
        %driver_id,
        fare_cents,
        "Booking approved"
    );

    let customer_email = booking
        .customer_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    let (vehicle, customer_email) = match (vehicle, customer_email) {
        (Some(vehicle), Some(email)) => (vehicle, email.to_string()),
        (vehicle, email) => {
            let reason = if vehicle.is_none() {
                "driver has no assigned vehicle"
            } else {
                "booking has no customer email"
            };
            tracing::warn!(
                %booking_id,
                vehicle = vehicle.is_some(),
                customer_email = email.is_some(),
                "Approval recorded without confirmation: {}",
                reason
            );
            return Ok(ApprovalOutcome {
                booking,
                notification: NotificationStatus::Skipped {
                    reason: reason.to_string(),
                },
                confirmation: None,
            });
        }
    };

    let confirmation = RideConfirmation::new(
        &booking,
        &customer_email,
        agency.as_ref(),
        &driver,
        &vehicle,
        fare_cents,
    );

    let notification = match notifier
        .send(&customer_email, CONFIRMATION_SUBJECT, &confirmation.render_html())
        .await
    {
        Ok(()) => NotificationStatus::Sent {
            recipient: customer_email,
        },
        Err(e) => {
            tracing::warn!(%booking_id, "Failed to send ride confirmation: {}", e);
            NotificationStatus::Failed {
                reason: e.to_string(),
            }
        }
    };

    Ok(ApprovalOutcome {
        booking,
        notification,
        confirmation: Some(confirmation),
    })
}

/// Reject a pending booking. Only the status changes.
pub async fn reject_booking(
    store: &dyn RecordStore,
    agency_id: Uuid,
    booking_id: Uuid,
) -> Result<Booking, AppError> {
    change_status(store, agency_id, booking_id, BookingStatus::Rejected).await
}

/// Move an approved booking to `ongoing`, or an ongoing one to `completed`.
pub async fn advance_booking(
    store: &dyn RecordStore,
    agency_id: Uuid,
    booking_id: Uuid,
    next: BookingStatus,
) -> Result<Booking, AppError> {
    if !matches!(next, BookingStatus::Ongoing | BookingStatus::Completed) {
        return Err(AppError::invalid(
            "Status can only be advanced to 'ongoing' or 'completed'",
        ));
    }
    change_status(store, agency_id, booking_id, next).await
}

async fn change_status(
    store: &dyn RecordStore,
    agency_id: Uuid,
    booking_id: Uuid,
    next: BookingStatus,
) -> Result<Booking, AppError> {
    let booking = owned_booking(store, agency_id, booking_id).await?;
    booking.status.transition_to(next)?;

    let updated = match store
        .set_booking_status(booking_id, booking.status, next)
        .await?
    {
        Some(updated) => updated,
        None => return Err(refused(store, booking_id, next).await),
    };

    tracing::info!(%booking_id, from = %booking.status, to = %next, "Booking status changed");

    Ok(updated)
}

/// Load a booking and hide it when it belongs to another agency.
async fn owned_booking(
    store: &dyn RecordStore,
    agency_id: Uuid,
    booking_id: Uuid,
) -> Result<Booking, AppError> {
    store
        .get_booking(booking_id)
        .await?
        .filter(|b| b.agency_id == agency_id)
        .ok_or(AppError::BookingNotFound)
}

/// Explain why a conditional update matched nothing: the booking vanished or
/// another request changed its status first.
async fn refused(store: &dyn RecordStore, booking_id: Uuid, next: BookingStatus) -> AppError {
    match store.get_booking(booking_id).await {
        Ok(Some(current)) => AppError::InvalidTransition {
            from: current.status,
            to: next,
        },
        Ok(None) => AppError::BookingNotFound,
        Err(e) => e,
    }
}
