//! HTTP route table.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, middleware, state::AppState};

/// Build the application router.
///
/// Routes under `/api/v1` except registration and customer booking
/// requests require an agency API key.
pub fn build_router(state: AppState) -> Router {
    let agency_routes = Router::new()
        // Agency profile
        .route(
            "/api/v1/agencies/me",
            get(handlers::agencies::get_current_agency)
                .patch(handlers::agencies::update_current_agency),
        )
        // Bookings
        .route(
            "/api/v1/bookings/pending",
            get(handlers::bookings::list_pending),
        )
        .route(
            "/api/v1/bookings/approved",
            get(handlers::bookings::list_approved),
        )
        .route(
            "/api/v1/bookings/{id}/approve",
            post(handlers::bookings::approve_booking),
        )
        .route(
            "/api/v1/bookings/{id}/reject",
            post(handlers::bookings::reject_booking),
        )
        .route(
            "/api/v1/bookings/{id}/status",
            post(handlers::bookings::update_status),
        )
        // Drivers
        .route(
            "/api/v1/drivers",
            post(handlers::drivers::create_driver).get(handlers::drivers::list_drivers),
        )
        .route(
            "/api/v1/drivers/{id}/vehicle",
            put(handlers::drivers::assign_vehicle),
        )
        .route(
            "/api/v1/drivers/{id}",
            patch(handlers::drivers::update_driver).delete(handlers::drivers::delete_driver),
        )
        // Vehicles
        .route(
            "/api/v1/vehicles",
            post(handlers::vehicles::create_vehicle).get(handlers::vehicles::list_vehicles),
        )
        .route(
            "/api/v1/vehicles/{id}",
            patch(handlers::vehicles::update_vehicle).delete(handlers::vehicles::delete_vehicle),
        )
        // Earnings
        .route("/api/v1/earnings", get(handlers::earnings::get_earnings))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/v1/agencies",
            post(handlers::agencies::register_agency),
        )
        .route(
            "/api/v1/agencies/{agency_id}/bookings",
            post(handlers::bookings::request_booking),
        )
        .merge(agency_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
