use crate::{
    error::AppError,
    models::{Comment, NewPhoto, NewUser, Photo, SocialMedia, User},
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

pub mod memory;

pub use memory::InMemoryRepository;

/// Repository Trait
///
/// The abstract contract for all persistence. Handlers and services only ever see
/// `Arc<dyn Repository>`, so the Postgres implementation and the in-memory one are
/// interchangeable.
///
/// Every read hides soft-deleted rows. The only exception is `find_photo_reference`, which
/// resolves a comment's photo by id even after the photo was soft-deleted.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;
    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    // Persists every mutable profile column of `user`.
    async fn update_user(&self, user: &User) -> Result<User, AppError>;
    // Returns false when there was no live row to delete.
    async fn soft_delete_user(&self, id: i64) -> Result<bool, AppError>;

    // --- Photos ---
    async fn insert_photo(&self, owner_id: i64, photo: NewPhoto) -> Result<Photo, AppError>;
    async fn find_photo(&self, id: i64) -> Result<Option<Photo>, AppError>;
    async fn find_photo_reference(&self, id: i64) -> Result<Option<Photo>, AppError>;
    async fn find_owned_photo(&self, owner_id: i64, id: i64) -> Result<Option<Photo>, AppError>;
    async fn list_photos_by_owner(&self, owner_id: i64) -> Result<Vec<Photo>, AppError>;
    // Inner-joins on live owners.
    async fn list_photos(&self) -> Result<Vec<Photo>, AppError>;
    async fn update_photo(&self, photo: &Photo) -> Result<Photo, AppError>;
    async fn soft_delete_photo(&self, id: i64) -> Result<bool, AppError>;

    // --- Comments ---
    async fn insert_comment(
        &self,
        owner_id: i64,
        photo_id: i64,
        message: String,
    ) -> Result<Comment, AppError>;
    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, AppError>;
    async fn find_owned_comment(&self, owner_id: i64, id: i64)
    -> Result<Option<Comment>, AppError>;
    async fn list_comments_by_owner(&self, owner_id: i64) -> Result<Vec<Comment>, AppError>;
    async fn list_comments(&self) -> Result<Vec<Comment>, AppError>;
    async fn update_comment(&self, comment: &Comment) -> Result<Comment, AppError>;
    async fn soft_delete_comment(&self, id: i64) -> Result<bool, AppError>;

    // --- Social Media ---
    async fn insert_social_media(
        &self,
        owner_id: i64,
        name: String,
        social_media_url: String,
    ) -> Result<SocialMedia, AppError>;
    async fn find_social_media(&self, id: i64) -> Result<Option<SocialMedia>, AppError>;
    async fn find_owned_social_media(
        &self,
        owner_id: i64,
        id: i64,
    ) -> Result<Option<SocialMedia>, AppError>;
    async fn list_social_media_by_owner(&self, owner_id: i64)
    -> Result<Vec<SocialMedia>, AppError>;
    async fn list_social_media(&self) -> Result<Vec<SocialMedia>, AppError>;
    async fn update_social_media(&self, social_media: &SocialMedia)
    -> Result<SocialMedia, AppError>;
    async fn soft_delete_social_media(&self, id: i64) -> Result<bool, AppError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const USER_COLUMNS: &str =
    "id, full_name, username, email, password, created_at, updated_at, deleted_at";
const PHOTO_COLUMNS: &str =
    "id, title, caption, photo_url, user_id, created_at, updated_at, deleted_at";
const COMMENT_COLUMNS: &str =
    "id, photo_id, user_id, message, created_at, updated_at, deleted_at";
const SOCIAL_MEDIA_COLUMNS: &str =
    "id, name, social_media_url, user_id, created_at, updated_at, deleted_at";

/// map_write_error
///
/// Turns a unique-constraint violation into `Conflict` so a registration race that slips past
/// the service-level check still surfaces as "already used".
fn map_write_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("email or username already used".to_string())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::DanglingReference("referenced row does not exist".to_string())
        }
        _ => AppError::Database(e),
    }
}

/// PostgresRepository
///
/// The `Repository` backed by PostgreSQL. Queries are built at runtime with `sqlx::query_as`
/// so the crate compiles without a live database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (full_name, username, email, password, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.full_name)
            .bind(user.username)
            .bind(user.email)
            .bind(user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql =
            format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql =
            format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1 AND deleted_at IS NULL");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_user(&self, user: &User) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users SET full_name = $2, username = $3, email = $4, password = $5, \
             updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.full_name)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn soft_delete_user(&self, id: i64) -> Result<bool, AppError> {
        let res = sqlx::query(
            "UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- PHOTOS ---

    async fn insert_photo(&self, owner_id: i64, photo: NewPhoto) -> Result<Photo, AppError> {
        let sql = format!(
            "INSERT INTO photos (title, caption, photo_url, user_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) RETURNING {PHOTO_COLUMNS}"
        );
        sqlx::query_as::<_, Photo>(&sql)
            .bind(photo.title)
            .bind(photo.caption)
            .bind(photo.photo_url)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn find_photo(&self, id: i64) -> Result<Option<Photo>, AppError> {
        let sql =
            format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1 AND deleted_at IS NULL");
        Ok(sqlx::query_as::<_, Photo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_photo_reference(&self, id: i64) -> Result<Option<Photo>, AppError> {
        let sql = format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1");
        Ok(sqlx::query_as::<_, Photo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_owned_photo(&self, owner_id: i64, id: i64) -> Result<Option<Photo>, AppError> {
        let sql = format!(
            "SELECT {PHOTO_COLUMNS} FROM photos \
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL"
        );
        Ok(sqlx::query_as::<_, Photo>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_photos_by_owner(&self, owner_id: i64) -> Result<Vec<Photo>, AppError> {
        let sql = format!(
            "SELECT {PHOTO_COLUMNS} FROM photos \
             WHERE user_id = $1 AND deleted_at IS NULL ORDER BY id ASC"
        );
        Ok(sqlx::query_as::<_, Photo>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_photos(&self) -> Result<Vec<Photo>, AppError> {
        let query = r#"
            SELECT p.id, p.title, p.caption, p.photo_url, p.user_id,
                   p.created_at, p.updated_at, p.deleted_at
            FROM photos p
            JOIN users u ON u.id = p.user_id
            WHERE p.deleted_at IS NULL AND u.deleted_at IS NULL
            ORDER BY p.id ASC
        "#;
        Ok(sqlx::query_as::<_, Photo>(query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_photo(&self, photo: &Photo) -> Result<Photo, AppError> {
        let sql = format!(
            "UPDATE photos SET title = $2, caption = $3, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {PHOTO_COLUMNS}"
        );
        sqlx::query_as::<_, Photo>(&sql)
            .bind(photo.id)
            .bind(&photo.title)
            .bind(&photo.caption)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Photo ID cannot be found".to_string()))
    }

    async fn soft_delete_photo(&self, id: i64) -> Result<bool, AppError> {
        let res = sqlx::query(
            "UPDATE photos SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- COMMENTS ---

    async fn insert_comment(
        &self,
        owner_id: i64,
        photo_id: i64,
        message: String,
    ) -> Result<Comment, AppError> {
        let sql = format!(
            "INSERT INTO comments (photo_id, user_id, message, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) RETURNING {COMMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(photo_id)
            .bind(owner_id)
            .bind(message)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, AppError> {
        let sql =
            format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1 AND deleted_at IS NULL");
        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_owned_comment(
        &self,
        owner_id: i64,
        id: i64,
    ) -> Result<Option<Comment>, AppError> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL"
        );
        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_comments_by_owner(&self, owner_id: i64) -> Result<Vec<Comment>, AppError> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE user_id = $1 AND deleted_at IS NULL ORDER BY id ASC"
        );
        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, AppError> {
        let query = r#"
            SELECT c.id, c.photo_id, c.user_id, c.message,
                   c.created_at, c.updated_at, c.deleted_at
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.deleted_at IS NULL AND u.deleted_at IS NULL
            ORDER BY c.id ASC
        "#;
        Ok(sqlx::query_as::<_, Comment>(query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_comment(&self, comment: &Comment) -> Result<Comment, AppError> {
        let sql = format!(
            "UPDATE comments SET message = $2, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {COMMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(comment.id)
            .bind(&comment.message)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment ID cannot be found".to_string()))
    }

    async fn soft_delete_comment(&self, id: i64) -> Result<bool, AppError> {
        let res = sqlx::query(
            "UPDATE comments SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- SOCIAL MEDIA ---

    async fn insert_social_media(
        &self,
        owner_id: i64,
        name: String,
        social_media_url: String,
    ) -> Result<SocialMedia, AppError> {
        let sql = format!(
            "INSERT INTO social_media (name, social_media_url, user_id, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) RETURNING {SOCIAL_MEDIA_COLUMNS}"
        );
        sqlx::query_as::<_, SocialMedia>(&sql)
            .bind(name)
            .bind(social_media_url)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn find_social_media(&self, id: i64) -> Result<Option<SocialMedia>, AppError> {
        let sql = format!(
            "SELECT {SOCIAL_MEDIA_COLUMNS} FROM social_media WHERE id = $1 AND deleted_at IS NULL"
        );
        Ok(sqlx::query_as::<_, SocialMedia>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_owned_social_media(
        &self,
        owner_id: i64,
        id: i64,
    ) -> Result<Option<SocialMedia>, AppError> {
        let sql = format!(
            "SELECT {SOCIAL_MEDIA_COLUMNS} FROM social_media \
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL"
        );
        Ok(sqlx::query_as::<_, SocialMedia>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_social_media_by_owner(
        &self,
        owner_id: i64,
    ) -> Result<Vec<SocialMedia>, AppError> {
        let sql = format!(
            "SELECT {SOCIAL_MEDIA_COLUMNS} FROM social_media \
             WHERE user_id = $1 AND deleted_at IS NULL ORDER BY id ASC"
        );
        Ok(sqlx::query_as::<_, SocialMedia>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_social_media(&self) -> Result<Vec<SocialMedia>, AppError> {
        let query = r#"
            SELECT s.id, s.name, s.social_media_url, s.user_id,
                   s.created_at, s.updated_at, s.deleted_at
            FROM social_media s
            JOIN users u ON u.id = s.user_id
            WHERE s.deleted_at IS NULL AND u.deleted_at IS NULL
            ORDER BY s.id ASC
        "#;
        Ok(sqlx::query_as::<_, SocialMedia>(query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_social_media(
        &self,
        social_media: &SocialMedia,
    ) -> Result<SocialMedia, AppError> {
        let sql = format!(
            "UPDATE social_media SET name = $2, social_media_url = $3, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {SOCIAL_MEDIA_COLUMNS}"
        );
        sqlx::query_as::<_, SocialMedia>(&sql)
            .bind(social_media.id)
            .bind(&social_media.name)
            .bind(&social_media.social_media_url)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Social media ID cannot be found".to_string()))
    }

    async fn soft_delete_social_media(&self, id: i64) -> Result<bool, AppError> {
        let res = sqlx::query(
            "UPDATE social_media SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
