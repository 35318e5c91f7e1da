//! Agency registration and API key handling.
//!
//! API keys are 32 random bytes, hex encoded, shown once at registration.
//! Only their SHA-256 digest is stored.

use sha2::{Digest, Sha256};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::agency::{
    Agency, AgencyProfile, NewAgency, RegisterAgencyRequest, UpdateAgencyRequest,
};
use crate::store::RecordStore;

/// Register a new agency.
///
/// # Process
///
/// 1. Validate name and email, lower-case the email
/// 2. Generate an API key and store only its hash
/// 3. Return the agency together with the plaintext key
///
/// # Errors
///
/// - `InvalidRequest`: blank name or malformed email
/// - `Conflict`: email, mobile, licence, GST or PAN already registered
pub async fn register_agency(
    store: &dyn RecordStore,
    mut request: RegisterAgencyRequest,
) -> Result<(Agency, String), AppError> {
    let agency_name = request.agency_name.trim().to_string();
    if agency_name.is_empty() {
        return Err(AppError::invalid("Agency name is required"));
    }

    request.agency_email = request.agency_email.trim().to_lowercase();
    request.validate()?;
    let agency_email = request.agency_email;

    let api_key = generate_api_key();

    let agency = store
        .insert_agency(NewAgency {
            agency_name,
            owner_name: trimmed(request.owner_name),
            operate_station: trimmed(request.operate_station),
            agency_email,
            agency_mobile: trimmed(request.agency_mobile),
            agency_license: trimmed(request.agency_license),
            gst_number: trimmed(request.gst_number),
            pan_number: trimmed(request.pan_number),
            api_key_hash: hash_api_key(&api_key),
        })
        .await?;

    tracing::info!(agency_id = %agency.id, "Agency registered");

    Ok((agency, api_key))
}

/// Resolve an API key to its agency.
pub async fn authenticate(
    store: &dyn RecordStore,
    api_key: &str,
) -> Result<Option<Agency>, AppError> {
    store.find_agency_by_key_hash(&hash_api_key(api_key)).await
}

/// The calling agency's own record.
pub async fn get_agency(store: &dyn RecordStore, agency_id: Uuid) -> Result<Agency, AppError> {
    store
        .get_agency(agency_id)
        .await?
        .ok_or(AppError::AgencyNotFound)
}

/// Edit an agency's profile.
///
/// Email, licence, GST and PAN cannot be changed here.
///
/// # Errors
///
/// - `InvalidRequest`: the name is set to blank
/// - `Conflict`: the mobile number belongs to another agency
pub async fn update_agency(
    store: &dyn RecordStore,
    agency_id: Uuid,
    request: UpdateAgencyRequest,
) -> Result<Agency, AppError> {
    let current = get_agency(store, agency_id).await?;
    let mut profile = AgencyProfile::from(&current);

    profile.agency_name = patched_required(profile.agency_name, request.agency_name)
        .ok_or_else(|| AppError::invalid("Agency name is required"))?;
    profile.owner_name = patched(profile.owner_name, request.owner_name);
    profile.operate_station = patched(profile.operate_station, request.operate_station);
    profile.agency_mobile = patched(profile.agency_mobile, request.agency_mobile);

    let agency = store
        .update_agency(agency_id, &profile)
        .await?
        .ok_or(AppError::AgencyNotFound)?;

    tracing::info!(%agency_id, "Agency profile updated");

    Ok(agency)
}

/// SHA-256 hex digest of an API key.
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// 64 hex characters (32 random bytes).
fn generate_api_key() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Apply a partial update to an optional column: absent keeps, blank clears.
pub(crate) fn patched(current: Option<String>, update: Option<String>) -> Option<String> {
    match update {
        Some(value) => trimmed(Some(value)),
        None => current,
    }
}

/// Like [`patched`] for a required column; `None` when it would be blanked.
pub(crate) fn patched_required(current: String, update: Option<String>) -> Option<String> {
    match update {
        Some(value) => trimmed(Some(value)),
        None => Some(current),
    }
}
