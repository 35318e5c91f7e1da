//! Earnings aggregation over completed rides.
//!
//! # Rules
//!
//! - Only `completed` bookings of the agency count
//! - The range is inclusive at both ends, compared on calendar dates
//! - A missing or negative fare counts as zero
//! - Drivers are attributed only when both id and name snapshot are present;
//!   the first name seen for a driver wins
//! - The breakdown is sorted by total, highest first; ties keep the order in
//!   which drivers were first seen

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    booking::{BOOKING_DATE_FORMAT, BookingStatus, parse_booking_date},
    earnings::{DriverEarnings, EarningsQuery, EarningsReport},
};
use crate::store::RecordStore;

/// Turn the query string into an inclusive date range.
///
/// # Errors
///
/// `InvalidRequest` when only one bound is given, a date is malformed,
/// or `start_date` is after `end_date`.
pub fn resolve_range(query: &EarningsQuery) -> Result<(NaiveDate, NaiveDate), AppError> {
    let (start, end) = match (&query.start_date, &query.end_date) {
        (None, None) => {
            let today = Utc::now().date_naive();
            (today, today)
        }
        (Some(start), Some(end)) => (parse_booking_date(start)?, parse_booking_date(end)?),
        _ => {
            return Err(AppError::invalid(
                "Provide both start_date and end_date, or neither",
            ));
        }
    };

    if start > end {
        return Err(AppError::invalid("start_date must not be after end_date"));
    }
    Ok((start, end))
}

/// Aggregate an agency's completed earnings between `start` and `end`.
///
/// # Errors
///
/// - `InvalidRequest`: `start` after `end`
/// - `Database`: the store failed, or a stored booking date is unreadable
/// - `Internal`: the fares do not fit an `i64` sum
///
/// No partial report is returned.
pub async fn aggregate(
    store: &dyn RecordStore,
    agency_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<EarningsReport, AppError> {
    if start > end {
        return Err(AppError::invalid("start_date must not be after end_date"));
    }

    let mut completed = store
        .list_bookings(agency_id, &[BookingStatus::Completed])
        .await?;
    // Oldest first, so "first seen" follows request order.
    completed.sort_by_key(|b| b.requested_at);

    let mut total_earnings_cents: i64 = 0;
    let mut breakdown: Vec<(Uuid, String, i64)> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for booking in &completed {
        let date = NaiveDate::parse_from_str(&booking.date, BOOKING_DATE_FORMAT).map_err(|e| {
            tracing::error!(booking_id = %booking.id, date = %booking.date, "Unreadable booking date");
            AppError::Database(sqlx::Error::Decode(Box::new(e)))
        })?;
        if date < start || date > end {
            continue;
        }

        let fare = booking.fare_cents.filter(|f| *f > 0).unwrap_or(0);
        total_earnings_cents = add_fare(total_earnings_cents, fare)?;

        let (Some(driver_id), Some(name)) = (booking.assigned_driver_id, &booking.driver_name)
        else {
            continue;
        };
        match index.get(&driver_id) {
            Some(&i) => breakdown[i].2 = add_fare(breakdown[i].2, fare)?,
            None => {
                index.insert(driver_id, breakdown.len());
                breakdown.push((driver_id, name.clone(), fare));
            }
        }
    }

    breakdown.sort_by(|a, b| b.2.cmp(&a.2));

    let driver_breakdown = breakdown
        .into_iter()
        .map(|(driver_id, name, total_cents)| DriverEarnings {
            driver_id,
            name,
            total_cents,
            contribution: contribution(total_cents, total_earnings_cents),
        })
        .collect();

    tracing::debug!(%agency_id, %start, %end, total_earnings_cents, "Earnings aggregated");

    Ok(EarningsReport {
        start_date: start,
        end_date: end,
        total_earnings_cents,
        driver_breakdown,
    })
}

fn add_fare(sum: i64, fare: i64) -> Result<i64, AppError> {
    sum.checked_add(fare)
        .ok_or_else(|| AppError::Internal("earnings total exceeds i64 range".to_string()))
}

fn contribution(part: i64, total: i64) -> String {
    if total == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", part as f64 / total as f64 * 100.0)
}
