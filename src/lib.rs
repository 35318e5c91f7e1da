//! Ride booking back office.
//!
//! Agencies register, keep a roster of drivers and a fleet of vehicles,
//! decide customer ride requests and review their earnings.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: [`store::RecordStore`], PostgreSQL via sqlx in production
//! - **Authentication**: agency API keys, stored as SHA-256 hashes
//! - **Notifications**: ride confirmations posted to a signed mail relay

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
pub mod store;
