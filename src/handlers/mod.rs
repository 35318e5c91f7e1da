//! HTTP request handlers (route handlers).
//!
//! Each handler extracts request data, calls one service function and maps
//! the result to a JSON response. Errors become `AppError` responses.

/// Agency registration
pub mod agencies;
/// Booking requests, decisions and ride progress
pub mod bookings;
/// Driver roster
pub mod drivers;
/// Earnings report
pub mod earnings;
/// Health check
pub mod health;
/// Fleet
pub mod vehicles;
