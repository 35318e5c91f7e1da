//! HTTP middleware components.

/// Agency API key authentication
pub mod auth;
