use async_trait::async_trait;

use super::{
    ownership::{OwnedService, OwnedStore, Patch, Validate, provided, require_non_empty},
    photos::PHOTO_NOT_FOUND,
};
use crate::{
    error::{AppError, AppResult},
    models::{Comment, CommentResponse, CreateCommentRequest, UpdateCommentRequest},
    repository::RepositoryState,
};

impl Validate for CreateCommentRequest {
    fn validate(&self) -> AppResult<()> {
        if self.photo_id <= 0 {
            return Err(AppError::ValidationFailed("photo_id is required".to_string()));
        }
        require_non_empty(&[("message", self.message.as_str())])
    }
}

impl Patch<Comment> for UpdateCommentRequest {
    fn is_empty(&self) -> bool {
        provided(&self.message).is_none()
    }

    fn apply_to(self, comment: &mut Comment) {
        if let Some(message) = provided(&self.message) {
            comment.message = message.to_string();
        }
    }
}

/// CommentStore
///
/// Comments as an owned resource. Presenting a comment resolves both its author and the photo
/// it points at; either one missing is a `DanglingReference`.
#[derive(Clone)]
pub struct CommentStore {
    repo: RepositoryState,
}

impl CommentStore {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl OwnedStore for CommentStore {
    type Record = Comment;
    type Draft = CreateCommentRequest;
    type Changes = UpdateCommentRequest;
    type View = CommentResponse;

    const NOT_FOUND: &'static str = "Comment ID cannot be found";
    const KIND: &'static str = "comment";

    fn id_of(comment: &Comment) -> i64 {
        comment.id
    }

    fn owner_of(comment: &Comment) -> i64 {
        comment.user_id
    }

    /// A comment can only be attached to a live photo.
    async fn insert(&self, owner_id: i64, draft: CreateCommentRequest) -> AppResult<Comment> {
        if self.repo.find_photo(draft.photo_id).await?.is_none() {
            return Err(AppError::NotFound(PHOTO_NOT_FOUND.to_string()));
        }
        self.repo
            .insert_comment(owner_id, draft.photo_id, draft.message)
            .await
    }

    async fn find(&self, id: i64) -> AppResult<Option<Comment>> {
        self.repo.find_comment(id).await
    }

    async fn find_owned(&self, owner_id: i64, id: i64) -> AppResult<Option<Comment>> {
        self.repo.find_owned_comment(owner_id, id).await
    }

    async fn list_owned(&self, owner_id: i64) -> AppResult<Vec<Comment>> {
        self.repo.list_comments_by_owner(owner_id).await
    }

    async fn list_all(&self) -> AppResult<Vec<Comment>> {
        self.repo.list_comments().await
    }

    async fn save(&self, comment: &Comment) -> AppResult<Comment> {
        self.repo.update_comment(comment).await
    }

    async fn soft_delete(&self, id: i64) -> AppResult<bool> {
        self.repo.soft_delete_comment(id).await
    }

    async fn present(&self, comment: Comment) -> AppResult<CommentResponse> {
        // Soft-deleted photos still resolve; only a physically missing row dangles.
        let photo = self
            .repo
            .find_photo_reference(comment.photo_id)
            .await?
            .ok_or_else(|| {
                AppError::DanglingReference(format!(
                    "photo {} referenced by comment {} no longer exists",
                    comment.photo_id, comment.id
                ))
            })?;
        let author = self.repo.find_user(comment.user_id).await?.ok_or_else(|| {
            AppError::DanglingReference(format!("author of comment {} no longer exists", comment.id))
        })?;
        Ok(CommentResponse::new(comment, &photo, &author))
    }
}

pub type CommentService = OwnedService<CommentStore>;
