use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{auth, bookings, trains};
use crate::middleware::auth::auth_middleware;
use crate::middleware::logging::log_request;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public account routes
    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login));

    // Public train search
    let train_routes = Router::new()
        .route("/", get(trains::list_trains))
        .route("/{id}", get(trains::get_train));

    // Booking routes (requires auth)
    let booking_routes = Router::new()
        .route("/", post(bookings::create_booking))
        .route("/", get(bookings::my_bookings))
        .route("/{id}", delete(bookings::cancel_booking))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/trains", train_routes)
        .nest("/api/bookings", booking_routes)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
