//! Earnings report models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query string for `GET /api/v1/earnings`.
///
/// Both dates are `YYYY-MM-DD`. Leaving both out reports on today (UTC).
#[derive(Debug, Default, Deserialize)]
pub struct EarningsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// One driver's share of an agency's earnings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverEarnings {
    pub driver_id: Uuid,

    /// Name snapshot from the first booking seen for this driver
    pub name: String,

    pub total_cents: i64,

    /// Percentage of the period's total, two decimals (e.g. `"37.50"`)
    pub contribution: String,
}

/// Earnings over an inclusive date range.
///
/// # JSON Example
///
/// ```json
/// {
///   "start_date": "2025-11-01",
///   "end_date": "2025-11-30",
///   "total_earnings_cents": 100000,
///   "driver_breakdown": [
///     { "driver_id": "...", "name": "Imran Shaikh", "total_cents": 100000, "contribution": "100.00" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarningsReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_earnings_cents: i64,

    /// Sorted by `total_cents`, highest first
    pub driver_breakdown: Vec<DriverEarnings>,
}
