use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};

use super::{JsonBody, ResourceId};
use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{ApiResponse, NewPhoto, PhotoResponse, PhotoUploadForm, UpdatePhotoRequest},
    services::{PhotoSource, ensure_owner, ownership::provided, store_image},
};

/// get_my_photos
///
/// [Authenticated Route] Every live photo the caller owns.
#[utoipa::path(
    get,
    path = "/photo",
    responses((status = 200, description = "My photos", body = [PhotoResponse])),
    security(("bearer" = []))
)]
pub async fn get_my_photos(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<PhotoResponse>>>> {
    let photos = state.photos().list_mine(id).await?;
    Ok(Json(ApiResponse::with_data(
        "Successfully retrieved all my photos",
        photos,
    )))
}

/// get_my_photo
///
/// [Authenticated Route] One of the caller's photos. Other users' photos are reported as
/// not found.
#[utoipa::path(
    get,
    path = "/photo/{id}",
    params(("id" = i64, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Found", body = PhotoResponse),
        (status = 400, description = "Not found among the caller's photos")
    ),
    security(("bearer" = []))
)]
pub async fn get_my_photo(
    AuthUser { id: caller, .. }: AuthUser,
    State(state): State<AppState>,
    ResourceId(id): ResourceId<i64>,
) -> AppResult<Json<ApiResponse<PhotoResponse>>> {
    let photo = state.photos().get_one(caller, id).await?;
    Ok(Json(ApiResponse::with_data(
        "Successfully retrieved all my photos",
        photo,
    )))
}

/// get_photos
///
/// [Authenticated Route] Every live photo of every live user.
#[utoipa::path(
    get,
    path = "/photos",
    responses((status = 200, description = "All photos", body = [PhotoResponse])),
    security(("bearer" = []))
)]
pub async fn get_photos(
    _caller: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<PhotoResponse>>>> {
    let photos = state.photos().list_all().await?;
    Ok(Json(ApiResponse::with_data(
        "Successfully retrieved all photos",
        photos,
    )))
}

/// create_photo
///
/// [Authenticated Route] Multipart upload. The image is either an attached `file` or a
/// `photo_url` to mirror; a non-empty `photo_url` wins when both are sent. The image is stored
/// on the media host before the photo row is written.
#[utoipa::path(
    post,
    path = "/photos",
    request_body(content = PhotoUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Uploaded", body = PhotoResponse),
        (status = 400, description = "Missing title/image, bad extension or upload failure")
    ),
    security(("bearer" = []))
)]
pub async fn create_photo(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<PhotoResponse>>)> {
    let mut multipart =
        multipart.map_err(|rejection| AppError::ValidationFailed(rejection.body_text()))?;

    let mut title = String::new();
    let mut caption = String::new();
    let mut photo_url = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("title") => title = field.text().await?,
            Some("caption") => caption = field.text().await?,
            Some("photo_url") => photo_url = Some(field.text().await?),
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?.to_vec();
                file = Some(PhotoSource::File {
                    filename,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    if title.trim().is_empty() {
        return Err(AppError::ValidationFailed("title is required".to_string()));
    }

    let source = match (provided(&photo_url), file) {
        (Some(url), _) => PhotoSource::Remote(url.to_string()),
        (None, Some(file)) => file,
        (None, None) => {
            return Err(AppError::ValidationFailed(
                "a file or photo_url is required".to_string(),
            ));
        }
    };

    let stored_url = store_image(state.media.as_ref(), source).await?;
    let photo = state
        .photos()
        .create(
            id,
            NewPhoto {
                title,
                caption,
                photo_url: stored_url,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("Successfully uploaded photo", photo)),
    ))
}

/// update_photo
///
/// [Authenticated Route] Changes title and/or caption. The image itself cannot be replaced.
#[utoipa::path(
    patch,
    path = "/photos/{id}",
    params(("id" = i64, Path, description = "Photo ID")),
    request_body = UpdatePhotoRequest,
    responses(
        (status = 200, description = "Updated", body = PhotoResponse),
        (status = 400, description = "Not found, not the owner, or photo_url sent")
    ),
    security(("bearer" = []))
)]
pub async fn update_photo(
    AuthUser { id: caller, .. }: AuthUser,
    State(state): State<AppState>,
    ResourceId(id): ResourceId<i64>,
    JsonBody(payload): JsonBody<UpdatePhotoRequest>,
) -> AppResult<Json<ApiResponse<PhotoResponse>>> {
    if provided(&payload.photo_url).is_some() {
        return Err(AppError::ValidationFailed(
            "Cannot update the photo".to_string(),
        ));
    }

    let photo = state
        .photos()
        .update(caller, id, payload)
        .await?
        .into_owned_by(caller)?;

    Ok(Json(ApiResponse::with_data(
        "Successfully updated photo",
        photo,
    )))
}

/// delete_photo
///
/// [Authenticated Route] Soft-deletes one of the caller's photos.
#[utoipa::path(
    delete,
    path = "/photos/{id}",
    params(("id" = i64, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Photo ID cannot be found / Invalid User ID")
    ),
    security(("bearer" = []))
)]
pub async fn delete_photo(
    AuthUser { id: caller, .. }: AuthUser,
    State(state): State<AppState>,
    ResourceId(id): ResourceId<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let owner = state.photos().delete(caller, id).await?;
    ensure_owner(caller, owner)?;
    Ok(Json(ApiResponse::message("Successfully deleted photo")))
}
