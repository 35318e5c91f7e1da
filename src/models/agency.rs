//! Agency model, registration request and the API key shown once on signup.
//!
//! Agencies authenticate with an API key that is stored as a SHA-256 hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Represents an agency record from the database.
///
/// # Database Table
///
/// Maps to the `agencies` table. `api_key_hash` holds the SHA-256 hex digest
/// of the agency's API key; the key itself is never stored.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Agency {
    pub id: Uuid,

    /// Display name used in ride confirmations
    pub agency_name: String,

    pub owner_name: Option<String>,

    /// Station the agency operates from
    pub operate_station: Option<String>,

    /// Lower-cased, unique
    pub agency_email: String,

    pub agency_mobile: Option<String>,

    pub agency_license: Option<String>,

    pub gst_number: Option<String>,

    pub pan_number: Option<String>,

    pub api_key_hash: String,

    pub created_at: DateTime<Utc>,
}

/// Values needed to insert a new agency.
#[derive(Debug, Clone)]
pub struct NewAgency {
    pub agency_name: String,
    pub owner_name: Option<String>,
    pub operate_station: Option<String>,
    pub agency_email: String,
    pub agency_mobile: Option<String>,
    pub agency_license: Option<String>,
    pub gst_number: Option<String>,
    pub pan_number: Option<String>,
    pub api_key_hash: String,
}

/// Request to register a new agency.
///
/// # JSON Example
///
/// ```json
/// {
///   "agency_name": "Western Line Cabs",
///   "owner_name": "R. Kulkarni",
///   "operate_station": "Dadar",
///   "agency_email": "ops@westernline.example",
///   "agency_mobile": "9820000000"
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterAgencyRequest {
    pub agency_name: String,
    pub owner_name: Option<String>,
    pub operate_station: Option<String>,
    #[validate(email)]
    pub agency_email: String,
    pub agency_mobile: Option<String>,
    pub agency_license: Option<String>,
    pub gst_number: Option<String>,
    pub pan_number: Option<String>,
}

/// Profile columns an agency may change after registration.
///
/// Email, licence, GST and PAN are fixed once registered.
#[derive(Debug, Clone)]
pub struct AgencyProfile {
    pub agency_name: String,
    pub owner_name: Option<String>,
    pub operate_station: Option<String>,
    pub agency_mobile: Option<String>,
}

impl From<&Agency> for AgencyProfile {
    fn from(agency: &Agency) -> Self {
        Self {
            agency_name: agency.agency_name.clone(),
            owner_name: agency.owner_name.clone(),
            operate_station: agency.operate_station.clone(),
            agency_mobile: agency.agency_mobile.clone(),
        }
    }
}

/// Request to edit the calling agency's profile.
///
/// Other fields in the body (email, GST, PAN, ...) are ignored.
///
/// # JSON Example
///
/// ```json
/// { "owner_name": "S. Kulkarni", "operate_station": "Bandra" }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAgencyRequest {
    pub agency_name: Option<String>,
    pub owner_name: Option<String>,
    pub operate_station: Option<String>,
    pub agency_mobile: Option<String>,
}

/// Response body for agency endpoints.
///
/// The `api_key` field is ONLY included right after registration.
#[derive(Debug, Serialize)]
pub struct AgencyResponse {
    pub id: Uuid,
    pub agency_name: String,
    pub owner_name: Option<String>,
    pub operate_station: Option<String>,
    pub agency_email: String,
    pub agency_mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Agency> for AgencyResponse {
    fn from(agency: Agency) -> Self {
        Self {
            id: agency.id,
            agency_name: agency.agency_name,
            owner_name: agency.owner_name,
            operate_station: agency.operate_station,
            agency_email: agency.agency_email,
            agency_mobile: agency.agency_mobile,
            api_key: None,
            created_at: agency.created_at,
        }
    }
}

impl AgencyResponse {
    /// Create response with the API key included (only for registration).
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }
}
