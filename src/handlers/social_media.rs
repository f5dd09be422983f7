use axum::{Json, extract::State, http::StatusCode};

use super::{JsonBody, ResourceId};
use crate::{
    AppState,
    auth::AuthUser,
    error::AppResult,
    models::{
        ApiResponse, CreateSocialMediaRequest, SocialMediaResponse, UpdateSocialMediaRequest,
    },
    services::ensure_owner,
};

#[utoipa::path(
    get,
    path = "/socialmedia",
    responses((status = 200, description = "My social media links", body = [SocialMediaResponse])),
    security(("bearer" = []))
)]
pub async fn get_my_social_media(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<SocialMediaResponse>>>> {
    let links = state.social_media().list_mine(id).await?;
    Ok(Json(ApiResponse::with_data(
        "Successfully get my social media",
        links,
    )))
}

#[utoipa::path(
    get,
    path = "/socialmedia/{id}",
    params(("id" = i64, Path, description = "Social media ID")),
    responses(
        (status = 200, description = "Found", body = SocialMediaResponse),
        (status = 400, description = "Not found among the caller's links")
    ),
    security(("bearer" = []))
)]
pub async fn get_my_social_media_by_id(
    AuthUser { id: caller, .. }: AuthUser,
    State(state): State<AppState>,
    ResourceId(id): ResourceId<i64>,
) -> AppResult<Json<ApiResponse<SocialMediaResponse>>> {
    let link = state.social_media().get_one(caller, id).await?;
    Ok(Json(ApiResponse::with_data(
        "Successfully get my social media",
        link,
    )))
}

#[utoipa::path(
    get,
    path = "/socialmedias",
    responses((status = 200, description = "All social media links", body = [SocialMediaResponse])),
    security(("bearer" = []))
)]
pub async fn get_social_media(
    _caller: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<SocialMediaResponse>>>> {
    let links = state.social_media().list_all().await?;
    Ok(Json(ApiResponse::with_data(
        "Successfully get social media",
        links,
    )))
}

#[utoipa::path(
    post,
    path = "/socialmedias",
    request_body = CreateSocialMediaRequest,
    responses(
        (status = 201, description = "Created", body = SocialMediaResponse),
        (status = 400, description = "Missing name or url")
    ),
    security(("bearer" = []))
)]
pub async fn create_social_media(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateSocialMediaRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SocialMediaResponse>>)> {
    let link = state.social_media().create(id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data(
            "Successfully created social media",
            link,
        )),
    ))
}

#[utoipa::path(
    patch,
    path = "/socialmedias/{id}",
    params(("id" = i64, Path, description = "Social media ID")),
    request_body = UpdateSocialMediaRequest,
    responses(
        (status = 200, description = "Updated", body = SocialMediaResponse),
        (status = 400, description = "Not found or not the owner")
    ),
    security(("bearer" = []))
)]
pub async fn update_social_media(
    AuthUser { id: caller, .. }: AuthUser,
    State(state): State<AppState>,
    ResourceId(id): ResourceId<i64>,
    JsonBody(payload): JsonBody<UpdateSocialMediaRequest>,
) -> AppResult<Json<ApiResponse<SocialMediaResponse>>> {
    let link = state
        .social_media()
        .update(caller, id, payload)
        .await?
        .into_owned_by(caller)?;
    Ok(Json(ApiResponse::with_data(
        "Successfully updated social media",
        link,
    )))
}

#[utoipa::path(
    delete,
    path = "/socialmedias/{id}",
    params(("id" = i64, Path, description = "Social media ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Not found or not the owner")
    ),
    security(("bearer" = []))
)]
pub async fn delete_social_media(
    AuthUser { id: caller, .. }: AuthUser,
    State(state): State<AppState>,
    ResourceId(id): ResourceId<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let owner = state.social_media().delete(caller, id).await?;
    ensure_owner(caller, owner)?;
    Ok(Json(ApiResponse::message("Successfully deleted social media")))
}
