use axum::{Json, extract::State, http::StatusCode};

use super::{JsonBody, ResourceId};
use crate::{
    AppState,
    auth::AuthUser,
    error::AppResult,
    models::{ApiResponse, CommentResponse, CreateCommentRequest, UpdateCommentRequest},
    services::ensure_owner,
};

#[utoipa::path(
    get,
    path = "/comment",
    responses((status = 200, description = "My comments", body = [CommentResponse])),
    security(("bearer" = []))
)]
pub async fn get_my_comments(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CommentResponse>>>> {
    let comments = state.comments().list_mine(id).await?;
    Ok(Json(ApiResponse::with_data(
        "Successfully retrieved all my comments",
        comments,
    )))
}

#[utoipa::path(
    get,
    path = "/comment/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Found", body = CommentResponse),
        (status = 400, description = "Not found among the caller's comments")
    ),
    security(("bearer" = []))
)]
pub async fn get_my_comment(
    AuthUser { id: caller, .. }: AuthUser,
    State(state): State<AppState>,
    ResourceId(id): ResourceId<i64>,
) -> AppResult<Json<ApiResponse<CommentResponse>>> {
    let comment = state.comments().get_one(caller, id).await?;
    Ok(Json(ApiResponse::with_data(
        "Successfully retrieved all my comments",
        comment,
    )))
}

#[utoipa::path(
    get,
    path = "/comments",
    responses((status = 200, description = "All comments", body = [CommentResponse])),
    security(("bearer" = []))
)]
pub async fn get_comments(
    _caller: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CommentResponse>>>> {
    let comments = state.comments().list_all().await?;
    Ok(Json(ApiResponse::with_data(
        "Successfully retrieved all comments",
        comments,
    )))
}

/// create_comment
///
/// [Authenticated Route] Comments on a live photo.
#[utoipa::path(
    post,
    path = "/comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Submitted", body = CommentResponse),
        (status = 400, description = "Empty message or unknown photo")
    ),
    security(("bearer" = []))
)]
pub async fn create_comment(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CommentResponse>>)> {
    let comment = state.comments().create(id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data(
            "Successfully submitted comment",
            comment,
        )),
    ))
}

#[utoipa::path(
    patch,
    path = "/comments/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Updated", body = CommentResponse),
        (status = 400, description = "Comment ID cannot be found / Invalid User ID")
    ),
    security(("bearer" = []))
)]
pub async fn update_comment(
    AuthUser { id: caller, .. }: AuthUser,
    State(state): State<AppState>,
    ResourceId(id): ResourceId<i64>,
    JsonBody(payload): JsonBody<UpdateCommentRequest>,
) -> AppResult<Json<ApiResponse<CommentResponse>>> {
    let comment = state
        .comments()
        .update(caller, id, payload)
        .await?
        .into_owned_by(caller)?;
    Ok(Json(ApiResponse::with_data(
        "Successfully updated comment",
        comment,
    )))
}

#[utoipa::path(
    delete,
    path = "/comments/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Comment ID cannot be found / Invalid User ID")
    ),
    security(("bearer" = []))
)]
pub async fn delete_comment(
    AuthUser { id: caller, .. }: AuthUser,
    State(state): State<AppState>,
    ResourceId(id): ResourceId<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let owner = state.comments().delete(caller, id).await?;
    ensure_owner(caller, owner)?;
    Ok(Json(ApiResponse::message("Successfully deleted comment")))
}
