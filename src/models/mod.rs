//! Data models: database entities and API request/response types.

/// Agencies and registration
pub mod agency;
/// Bookings and their lifecycle
pub mod booking;
/// Driver roster
pub mod driver;
/// Earnings report
pub mod earnings;
/// Ride confirmation content and relay payload
pub mod notification;
/// Fleet
pub mod vehicle;
