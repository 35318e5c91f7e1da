//! Earnings report handler.

use crate::{
    error::AppError,
    middleware::auth::AgencyContext,
    models::earnings::{EarningsQuery, EarningsReport},
    services::earnings_service,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

/// Earnings of completed rides over an inclusive date range.
///
/// # Endpoint
///
/// `GET /api/v1/earnings?start_date=2025-11-01&end_date=2025-11-30`
///
/// Without both parameters the report covers today (UTC).
///
/// # Response
///
/// - **Success (200 OK)**: `EarningsReport`
/// - **Error (400)**: One bound missing, malformed date, or reversed range
/// - **Error (500)**: Store failure; no partial report is returned
pub async fn get_earnings(
    State(state): State<AppState>,
    Extension(agency): Extension<AgencyContext>,
    Query(query): Query<EarningsQuery>,
) -> Result<Json<EarningsReport>, AppError> {
    let (start, end) = earnings_service::resolve_range(&query)?;

    let report = earnings_service::aggregate(state.store.as_ref(), agency.agency_id, start, end)
        .await
        .inspect_err(|e| {
            tracing::error!(agency_id = %agency.agency_id, "Earnings aggregation failed: {}", e)
        })?;

    Ok(Json(report))
}
