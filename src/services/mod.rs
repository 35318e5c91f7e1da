//! Business logic services.
//!
//! Services hold the booking back office rules, separated from HTTP handlers.
//! They receive the record store (and, for approvals, the notifier) as trait
//! objects so the same code runs against PostgreSQL and the in-memory store.

pub mod agency_service;
pub mod booking_service;
pub mod earnings_service;
pub mod fleet_service;
pub mod notifier;

#[cfg(test)]
pub(crate) mod fixtures;
