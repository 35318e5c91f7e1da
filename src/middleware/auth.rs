//! API key authentication middleware.
//!
//! This middleware intercepts every agency-scoped request to:
//! 1. Extract the API key from the Authorization header
//! 2. Resolve its hash to a registered agency
//! 3. Inject the agency context into the request
//! 4. Reject unknown keys with HTTP 401

use crate::{error::AppError, services::agency_service, state::AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// The agency making an authenticated request.
///
/// Inserted into the request extensions; handlers extract it with
/// `Extension<AgencyContext>` and scope every lookup to `agency_id`.
#[derive(Debug, Clone)]
pub struct AgencyContext {
    pub agency_id: Uuid,
    pub agency_name: String,
}

/// Authenticate `Authorization: Bearer <key>` against the agency table.
///
/// # Errors
///
/// - `Unauthorized`: header missing, not a bearer token, or unknown key
/// - `Database`: the key lookup failed
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let agency = agency_service::authenticate(state.store.as_ref(), api_key)
        .await?
        .ok_or(AppError::Unauthorized)?;

    tracing::debug!(agency_id = %agency.id, "Request authenticated");

    request.extensions_mut().insert(AgencyContext {
        agency_id: agency.id,
        agency_name: agency.agency_name,
    });

    Ok(next.run(request).await)
}
