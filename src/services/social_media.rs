use async_trait::async_trait;

use super::ownership::{OwnedService, OwnedStore, Patch, Validate, provided, require_non_empty};
use crate::{
    error::{AppError, AppResult},
    models::{
        CreateSocialMediaRequest, SocialMedia, SocialMediaResponse, UpdateSocialMediaRequest,
    },
    repository::RepositoryState,
};

impl Validate for CreateSocialMediaRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_empty(&[
            ("name", self.name.as_str()),
            ("social_media_url", self.social_media_url.as_str()),
        ])
    }
}

impl Patch<SocialMedia> for UpdateSocialMediaRequest {
    fn is_empty(&self) -> bool {
        provided(&self.name).is_none() && provided(&self.social_media_url).is_none()
    }

    fn apply_to(self, link: &mut SocialMedia) {
        if let Some(name) = provided(&self.name) {
            link.name = name.to_string();
        }
        if let Some(url) = provided(&self.social_media_url) {
            link.social_media_url = url.to_string();
        }
    }
}

#[derive(Clone)]
pub struct SocialMediaStore {
    repo: RepositoryState,
}

impl SocialMediaStore {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl OwnedStore for SocialMediaStore {
    type Record = SocialMedia;
    type Draft = CreateSocialMediaRequest;
    type Changes = UpdateSocialMediaRequest;
    type View = SocialMediaResponse;

    const NOT_FOUND: &'static str = "Social media ID cannot be found";
    const KIND: &'static str = "social_media";

    fn id_of(link: &SocialMedia) -> i64 {
        link.id
    }

    fn owner_of(link: &SocialMedia) -> i64 {
        link.user_id
    }

    async fn insert(
        &self,
        owner_id: i64,
        draft: CreateSocialMediaRequest,
    ) -> AppResult<SocialMedia> {
        self.repo
            .insert_social_media(owner_id, draft.name, draft.social_media_url)
            .await
    }

    async fn find(&self, id: i64) -> AppResult<Option<SocialMedia>> {
        self.repo.find_social_media(id).await
    }

    async fn find_owned(&self, owner_id: i64, id: i64) -> AppResult<Option<SocialMedia>> {
        self.repo.find_owned_social_media(owner_id, id).await
    }

    async fn list_owned(&self, owner_id: i64) -> AppResult<Vec<SocialMedia>> {
        self.repo.list_social_media_by_owner(owner_id).await
    }

    async fn list_all(&self) -> AppResult<Vec<SocialMedia>> {
        self.repo.list_social_media().await
    }

    async fn save(&self, link: &SocialMedia) -> AppResult<SocialMedia> {
        self.repo.update_social_media(link).await
    }

    async fn soft_delete(&self, id: i64) -> AppResult<bool> {
        self.repo.soft_delete_social_media(id).await
    }

    async fn present(&self, link: SocialMedia) -> AppResult<SocialMediaResponse> {
        let owner = self.repo.find_user(link.user_id).await?.ok_or_else(|| {
            AppError::DanglingReference(format!(
                "owner of social media {} no longer exists",
                link.id
            ))
        })?;
        Ok(SocialMediaResponse::new(link, &owner))
    }
}

pub type SocialMediaService = OwnedService<SocialMediaStore>;
