use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Stored Rows (Mapped to Database) ---

/// User
///
/// A registered identity from the `users` table. The password column only ever holds an Argon2
/// PHC string; this struct is never serialized straight to a client.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub username: String,
    pub email: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Soft-delete marker. Rows with a value here are invisible to every read.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Photo
///
/// A row from the `photos` table. `user_id` is the owner and never changes after insert.
#[derive(Debug, Clone, FromRow, Default)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Comment
///
/// A row from the `comments` table, referencing both its author and the photo it is about.
#[derive(Debug, Clone, FromRow, Default)]
pub struct Comment {
    pub id: i64,
    pub photo_id: i64,
    pub user_id: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// SocialMedia
///
/// A row from the `social_media` table: one named link on a user's profile.
#[derive(Debug, Clone, FromRow, Default)]
pub struct SocialMedia {
    pub id: i64,
    pub name: String,
    pub social_media_url: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// --- Insert Payloads (Service -> Repository) ---

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// NewPhoto
///
/// A photo ready to persist: `photo_url` is already the durable media-host URL.
#[derive(Debug, Clone, Default)]
pub struct NewPhoto {
    pub title: String,
    pub caption: String,
    pub photo_url: String,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for `POST /users/register`. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// UpdateUserRequest
///
/// Partial profile update (`PATCH /users`). Absent or empty fields keep their stored value;
/// a non-empty password is re-hashed.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// PhotoUploadForm
///
/// Documents the multipart body of `POST /photos`. Either `file` or `photo_url` must be given;
/// the handler reads the parts directly from the stream.
#[derive(Debug, ToSchema)]
pub struct PhotoUploadForm {
    pub title: String,
    pub caption: Option<String>,
    /// Remote image to mirror into the media host when no file is attached.
    pub photo_url: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<Vec<u8>>,
}

/// UpdatePhotoRequest
///
/// Partial photo update. The image itself cannot be replaced, only its text.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdatePhotoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Rejected when non-empty; kept so the request is not silently accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub photo_id: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateCommentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateSocialMediaRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub social_media_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateSocialMediaRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media_url: Option<String>,
}

// --- Response Schemas (Output) ---

/// ApiResponse
///
/// The envelope every successful response uses: a short message plus an optional payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn with_data(message: &str, data: T) -> Self {
        Self {
            message: message.to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: &str) -> Self {
        Self {
            message: message.to_string(),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
}

/// UserResponse
///
/// Public view of an identity. Deliberately has no password field.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserResponse {
    pub id: i64,
    pub full_name: String,
    pub username: String,
    pub email: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// OwnerProfile
///
/// The owner's public fields, joined into every owned-resource response.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct OwnerProfile {
    pub id: i64,
    pub full_name: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for OwnerProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PhotoResponse {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
    pub user: OwnerProfile,
}

impl PhotoResponse {
    pub fn new(photo: Photo, owner: &User) -> Self {
        Self {
            id: photo.id,
            title: photo.title,
            caption: photo.caption,
            photo_url: photo.photo_url,
            user_id: photo.user_id,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
            user: OwnerProfile::from(owner),
        }
    }
}

/// PhotoSummary
///
/// The referenced photo as nested inside a comment response.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct PhotoSummary {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
}

impl From<&Photo> for PhotoSummary {
    fn from(photo: &Photo) -> Self {
        Self {
            id: photo.id,
            title: photo.title.clone(),
            caption: photo.caption.clone(),
            photo_url: photo.photo_url.clone(),
            user_id: photo.user_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CommentResponse {
    pub id: i64,
    pub message: String,
    pub photo_id: i64,
    pub user_id: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
    pub photo: PhotoSummary,
    pub user: OwnerProfile,
}

impl CommentResponse {
    pub fn new(comment: Comment, photo: &Photo, author: &User) -> Self {
        Self {
            id: comment.id,
            message: comment.message,
            photo_id: comment.photo_id,
            user_id: comment.user_id,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            photo: PhotoSummary::from(photo),
            user: OwnerProfile::from(author),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SocialMediaResponse {
    pub id: i64,
    pub name: String,
    pub social_media_url: String,
    pub user_id: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
    pub user: OwnerProfile,
}

impl SocialMediaResponse {
    pub fn new(social_media: SocialMedia, owner: &User) -> Self {
        Self {
            id: social_media.id,
            name: social_media.name,
            social_media_url: social_media.social_media_url,
            user_id: social_media.user_id,
            created_at: social_media.created_at,
            updated_at: social_media.updated_at,
            user: OwnerProfile::from(owner),
        }
    }
}
