use async_trait::async_trait;

use super::ownership::{OwnedService, OwnedStore, Patch, Validate, provided, require_non_empty};
use crate::{
    error::{AppError, AppResult},
    models::{NewPhoto, Photo, PhotoResponse, UpdatePhotoRequest},
    repository::RepositoryState,
    storage::{MediaUploader, is_allowed_image},
};

pub const PHOTO_NOT_FOUND: &str = "Photo ID cannot be found";
const FORMAT_NOT_ALLOWED: &str =
    "The provided file format is not allowed. Please upload a JPEG or PNG image";

impl Validate for NewPhoto {
    fn validate(&self) -> AppResult<()> {
        require_non_empty(&[
            ("title", self.title.as_str()),
            ("photo_url", self.photo_url.as_str()),
        ])
    }
}

impl Patch<Photo> for UpdatePhotoRequest {
    fn is_empty(&self) -> bool {
        provided(&self.title).is_none() && provided(&self.caption).is_none()
    }

    fn apply_to(self, photo: &mut Photo) {
        if let Some(title) = provided(&self.title) {
            photo.title = title.to_string();
        }
        if let Some(caption) = provided(&self.caption) {
            photo.caption = caption.to_string();
        }
    }
}

/// PhotoStore
///
/// Photos as an owned resource. Responses carry the owner's public profile.
#[derive(Clone)]
pub struct PhotoStore {
    repo: RepositoryState,
}

impl PhotoStore {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl OwnedStore for PhotoStore {
    type Record = Photo;
    type Draft = NewPhoto;
    type Changes = UpdatePhotoRequest;
    type View = PhotoResponse;

    const NOT_FOUND: &'static str = PHOTO_NOT_FOUND;
    const KIND: &'static str = "photo";

    fn id_of(photo: &Photo) -> i64 {
        photo.id
    }

    fn owner_of(photo: &Photo) -> i64 {
        photo.user_id
    }

    async fn insert(&self, owner_id: i64, draft: NewPhoto) -> AppResult<Photo> {
        self.repo.insert_photo(owner_id, draft).await
    }

    async fn find(&self, id: i64) -> AppResult<Option<Photo>> {
        self.repo.find_photo(id).await
    }

    async fn find_owned(&self, owner_id: i64, id: i64) -> AppResult<Option<Photo>> {
        self.repo.find_owned_photo(owner_id, id).await
    }

    async fn list_owned(&self, owner_id: i64) -> AppResult<Vec<Photo>> {
        self.repo.list_photos_by_owner(owner_id).await
    }

    async fn list_all(&self) -> AppResult<Vec<Photo>> {
        self.repo.list_photos().await
    }

    async fn save(&self, photo: &Photo) -> AppResult<Photo> {
        self.repo.update_photo(photo).await
    }

    async fn soft_delete(&self, id: i64) -> AppResult<bool> {
        self.repo.soft_delete_photo(id).await
    }

    async fn present(&self, photo: Photo) -> AppResult<PhotoResponse> {
        let owner = self.repo.find_user(photo.user_id).await?.ok_or_else(|| {
            AppError::DanglingReference(format!("owner of photo {} no longer exists", photo.id))
        })?;
        Ok(PhotoResponse::new(photo, &owner))
    }
}

pub type PhotoService = OwnedService<PhotoStore>;

/// PhotoSource
///
/// Where the image of a new photo comes from.
#[derive(Debug)]
pub enum PhotoSource {
    /// A file attached to the upload form.
    File {
        filename: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
    /// An image already hosted elsewhere; it is mirrored into the media host.
    Remote(String),
}

impl PhotoSource {
    fn name(&self) -> &str {
        match self {
            PhotoSource::File { filename, .. } => filename,
            PhotoSource::Remote(url) => url,
        }
    }
}

/// store_image
///
/// Checks the image extension, then hands the image to the media host and returns the durable
/// URL to persist on the photo.
pub async fn store_image(media: &dyn MediaUploader, source: PhotoSource) -> AppResult<String> {
    if !is_allowed_image(source.name()) {
        return Err(AppError::ValidationFailed(FORMAT_NOT_ALLOWED.to_string()));
    }

    match source {
        PhotoSource::File {
            filename,
            content_type,
            bytes,
        } => {
            if bytes.is_empty() {
                return Err(AppError::ValidationFailed("file is empty".to_string()));
            }
            media
                .upload_file(&filename, content_type.as_deref(), bytes)
                .await
        }
        PhotoSource::Remote(url) => media.upload_remote(&url).await,
    }
}
