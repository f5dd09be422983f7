use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

pub mod comments;
pub mod photos;
pub mod social_media;
pub mod users;

/// JsonBody
///
/// `axum::Json` whose rejection is an `AppError`, so malformed bodies get the usual
/// `{"message"}` 400 instead of axum's plain-text one.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// ResourceId
///
/// `axum::extract::Path` with an `AppError` rejection ("Parameter must be a valid ID").
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ResourceId<T>(pub T);

/// health
///
/// Liveness probe for load balancers. Touches nothing.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}
