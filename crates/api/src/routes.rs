//! API Routes

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Account routes
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))

        // Form routes
        .route("/forms", post(handlers::submit_form))
        .route("/forms/:id", get(handlers::get_form))
        .route("/users/:phone/forms", get(handlers::list_user_forms))

        // Tier routes (x-key)
        .route("/dashboard", get(handlers::dashboard))
        .route("/forms/:id/actions", post(handlers::act_on_form))

        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
