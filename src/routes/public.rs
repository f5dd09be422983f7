use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that do not require a bearer token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check for monitoring and load balancers.
        .route("/health", get(handlers::health))
        // POST /users/register
        // Creates an identity. Email and username must be unused.
        .route("/users/register", post(handlers::users::register_user))
        // POST /users/login
        // Exchanges email/password for a one-hour bearer token.
        .route("/users/login", post(handlers::users::login))
}
