use crate::{
    AppState,
    handlers::{comments, photos, social_media, users},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch},
};

/// Upper bound on a `POST /photos` body. Camera images routinely exceed axum's 2 MB default.
pub const MAX_PHOTO_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Authenticated Router Module
///
/// Every route here sits behind the `auth_middleware` layer. Singular paths (`/photo`,
/// `/comment`, `/socialmedia`) read the caller's own records; plural paths list everything
/// and take writes.
///
/// Ownership Strategy:
/// Single-record reads are scoped to the caller by the query itself. Updates and deletes look
/// the record up by id and refuse with "Invalid User ID" when the caller is not its owner.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // --- Own Profile ---
        .route(
            "/users",
            get(users::get_me)
                .patch(users::update_me)
                .delete(users::delete_me),
        )
        // --- Photos ---
        .route("/photo", get(photos::get_my_photos))
        .route("/photo/{id}", get(photos::get_my_photo))
        // POST /photos is multipart: title, caption, and a file or photo_url.
        .route(
            "/photos",
            get(photos::get_photos)
                .post(photos::create_photo)
                .layer(DefaultBodyLimit::max(MAX_PHOTO_UPLOAD_BYTES)),
        )
        .route(
            "/photos/{id}",
            patch(photos::update_photo).delete(photos::delete_photo),
        )
        // --- Comments ---
        .route("/comment", get(comments::get_my_comments))
        .route("/comment/{id}", get(comments::get_my_comment))
        .route(
            "/comments",
            get(comments::get_comments).post(comments::create_comment),
        )
        .route(
            "/comments/{id}",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
        // --- Social Media ---
        .route("/socialmedia", get(social_media::get_my_social_media))
        .route(
            "/socialmedia/{id}",
            get(social_media::get_my_social_media_by_id),
        )
        .route(
            "/socialmedias",
            get(social_media::get_social_media).post(social_media::create_social_media),
        )
        .route(
            "/socialmedias/{id}",
            patch(social_media::update_social_media).delete(social_media::delete_social_media),
        )
}
