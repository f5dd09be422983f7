use axum::{Json, extract::State, http::StatusCode};

use super::JsonBody;
use crate::{
    AppState,
    auth::AuthUser,
    error::AppResult,
    models::{
        ApiResponse, LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest,
        UserResponse,
    },
};

/// register_user
///
/// [Public Route] Creates a new identity. Email and username must be unused among live users.
#[utoipa::path(
    post,
    path = "/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = UserResponse),
        (status = 400, description = "Missing field, or email/username already used")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let user = state.identity().register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data(
            "Successfully registered",
            UserResponse::from(user),
        )),
    ))
}

/// login
///
/// [Public Route] Exchanges email and password for a bearer token valid for one hour.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "email/password is wrong")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let token = state.identity().login(payload).await?;
    Ok(Json(ApiResponse::with_data(
        "Login successfully",
        LoginResponse { token },
    )))
}

/// get_me
///
/// [Authenticated Route] The caller's own profile.
#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "Profile", body = UserResponse)),
    security(("bearer" = []))
)]
pub async fn get_me(AuthUser { user, .. }: AuthUser) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::with_data(
        "Successfully retrieved",
        UserResponse::from(user),
    ))
}

/// update_me
///
/// [Authenticated Route] Partial profile update. Only non-empty fields change.
#[utoipa::path(
    patch,
    path = "/users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = UserResponse),
        (status = 400, description = "email/username already used")
    ),
    security(("bearer" = []))
)]
pub async fn update_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.identity().update_profile(id, payload).await?;
    Ok(Json(ApiResponse::with_data(
        "Successfully updated user",
        UserResponse::from(user),
    )))
}

/// delete_me
///
/// [Authenticated Route] Soft-deletes the caller's account.
#[utoipa::path(
    delete,
    path = "/users",
    responses((status = 200, description = "Deleted")),
    security(("bearer" = []))
)]
pub async fn delete_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.identity().delete_account(id).await?;
    Ok(Json(ApiResponse::message("Successfully deleted user")))
}
