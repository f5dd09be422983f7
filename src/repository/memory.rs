use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::Repository;
use crate::{
    error::AppError,
    models::{Comment, NewPhoto, NewUser, Photo, SocialMedia, User},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    photos: Vec<Photo>,
    comments: Vec<Comment>,
    social_media: Vec<SocialMedia>,
    next_user_id: i64,
    next_photo_id: i64,
    next_comment_id: i64,
    next_social_media_id: i64,
}

impl Tables {
    fn live_user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id && u.deleted_at.is_none())
    }

    fn owner_is_live(&self, owner_id: i64) -> bool {
        self.live_user(owner_id).is_some()
    }

    fn email_or_username_taken(&self, except: Option<i64>, email: &str, username: &str) -> bool {
        self.users.iter().any(|u| {
            u.deleted_at.is_none()
                && Some(u.id) != except
                && (u.email == email || u.username == username)
        })
    }
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// InMemoryRepository
///
/// A process-local `Repository` with the same visibility rules as Postgres: soft-deleted rows
/// are invisible, "list all" inner-joins on live owners, and email/username stay unique among
/// live users. Backs the test suites and quick local runs without a database.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Physically removes a user row, as a cascade outside the service layer would.
    pub async fn remove_user_row(&self, id: i64) {
        self.tables.write().await.users.retain(|u| u.id != id);
    }

    /// Physically removes a photo row, leaving any comments pointing at it dangling.
    pub async fn remove_photo_row(&self, id: i64) {
        self.tables.write().await.photos.retain(|p| p.id != id);
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.email_or_username_taken(None, &user.email, &user.username) {
            return Err(AppError::Conflict("email or username already used".to_string()));
        }
        let now = Utc::now();
        let row = User {
            id: next(&mut tables.next_user_id),
            full_name: user.full_name,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.live_user(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email == email && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.username == username && u.deleted_at.is_none())
            .cloned())
    }

    async fn update_user(&self, user: &User) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.email_or_username_taken(Some(user.id), &user.email, &user.username) {
            return Err(AppError::Conflict("email or username already used".to_string()));
        }
        let row = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id && u.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        row.full_name = user.full_name.clone();
        row.username = user.username.clone();
        row.email = user.email.clone();
        row.password_hash = user.password_hash.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn soft_delete_user(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables
            .users
            .iter_mut()
            .find(|u| u.id == id && u.deleted_at.is_none())
        {
            Some(row) => {
                row.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // --- Photos ---

    async fn insert_photo(&self, owner_id: i64, photo: NewPhoto) -> Result<Photo, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.owner_is_live(owner_id) {
            return Err(AppError::UnknownIdentity);
        }
        let now = Utc::now();
        let row = Photo {
            id: next(&mut tables.next_photo_id),
            title: photo.title,
            caption: photo.caption,
            photo_url: photo.photo_url,
            user_id: owner_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.photos.push(row.clone());
        Ok(row)
    }

    async fn find_photo(&self, id: i64) -> Result<Option<Photo>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .photos
            .iter()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .cloned())
    }

    async fn find_photo_reference(&self, id: i64) -> Result<Option<Photo>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.photos.iter().find(|p| p.id == id).cloned())
    }

    async fn find_owned_photo(&self, owner_id: i64, id: i64) -> Result<Option<Photo>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .photos
            .iter()
            .find(|p| p.id == id && p.user_id == owner_id && p.deleted_at.is_none())
            .cloned())
    }

    async fn list_photos_by_owner(&self, owner_id: i64) -> Result<Vec<Photo>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .photos
            .iter()
            .filter(|p| p.user_id == owner_id && p.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn list_photos(&self) -> Result<Vec<Photo>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .photos
            .iter()
            .filter(|p| p.deleted_at.is_none() && tables.owner_is_live(p.user_id))
            .cloned()
            .collect())
    }

    async fn update_photo(&self, photo: &Photo) -> Result<Photo, AppError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .photos
            .iter_mut()
            .find(|p| p.id == photo.id && p.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound("Photo ID cannot be found".to_string()))?;
        row.title = photo.title.clone();
        row.caption = photo.caption.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn soft_delete_photo(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables
            .photos
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
        {
            Some(row) => {
                row.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // --- Comments ---

    async fn insert_comment(
        &self,
        owner_id: i64,
        photo_id: i64,
        message: String,
    ) -> Result<Comment, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.owner_is_live(owner_id) {
            return Err(AppError::UnknownIdentity);
        }
        let now = Utc::now();
        let row = Comment {
            id: next(&mut tables.next_comment_id),
            photo_id,
            user_id: owner_id,
            message,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.comments.push(row.clone());
        Ok(row)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .find(|c| c.id == id && c.deleted_at.is_none())
            .cloned())
    }

    async fn find_owned_comment(
        &self,
        owner_id: i64,
        id: i64,
    ) -> Result<Option<Comment>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .find(|c| c.id == id && c.user_id == owner_id && c.deleted_at.is_none())
            .cloned())
    }

    async fn list_comments_by_owner(&self, owner_id: i64) -> Result<Vec<Comment>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.user_id == owner_id && c.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.deleted_at.is_none() && tables.owner_is_live(c.user_id))
            .cloned()
            .collect())
    }

    async fn update_comment(&self, comment: &Comment) -> Result<Comment, AppError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment.id && c.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound("Comment ID cannot be found".to_string()))?;
        row.message = comment.message.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn soft_delete_comment(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables
            .comments
            .iter_mut()
            .find(|c| c.id == id && c.deleted_at.is_none())
        {
            Some(row) => {
                row.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // --- Social Media ---

    async fn insert_social_media(
        &self,
        owner_id: i64,
        name: String,
        social_media_url: String,
    ) -> Result<SocialMedia, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.owner_is_live(owner_id) {
            return Err(AppError::UnknownIdentity);
        }
        let now = Utc::now();
        let row = SocialMedia {
            id: next(&mut tables.next_social_media_id),
            name,
            social_media_url,
            user_id: owner_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.social_media.push(row.clone());
        Ok(row)
    }

    async fn find_social_media(&self, id: i64) -> Result<Option<SocialMedia>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .social_media
            .iter()
            .find(|s| s.id == id && s.deleted_at.is_none())
            .cloned())
    }

    async fn find_owned_social_media(
        &self,
        owner_id: i64,
        id: i64,
    ) -> Result<Option<SocialMedia>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .social_media
            .iter()
            .find(|s| s.id == id && s.user_id == owner_id && s.deleted_at.is_none())
            .cloned())
    }

    async fn list_social_media_by_owner(
        &self,
        owner_id: i64,
    ) -> Result<Vec<SocialMedia>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .social_media
            .iter()
            .filter(|s| s.user_id == owner_id && s.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn list_social_media(&self) -> Result<Vec<SocialMedia>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .social_media
            .iter()
            .filter(|s| s.deleted_at.is_none() && tables.owner_is_live(s.user_id))
            .cloned()
            .collect())
    }

    async fn update_social_media(&self, social_media: &SocialMedia) -> Result<SocialMedia, AppError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .social_media
            .iter_mut()
            .find(|s| s.id == social_media.id && s.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound("Social media ID cannot be found".to_string()))?;
        row.name = social_media.name.clone();
        row.social_media_url = social_media.social_media_url.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn soft_delete_social_media(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables
            .social_media
            .iter_mut()
            .find(|s| s.id == id && s.deleted_at.is_none())
        {
            Some(row) => {
                row.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
