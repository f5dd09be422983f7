use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::primitives::ByteStream;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::error::AppError;

const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Timeout for fetching a remote image before mirroring it.
const REMOTE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

// 1. MediaUploader Contract
/// MediaUploader
///
/// The media host every photo image ends up on. Handlers only ever see this trait, so the
/// S3 client is swapped for `MockMediaUploader` in tests.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Creates the configured bucket if it is missing. Only called for local MinIO setups.
    async fn ensure_bucket_exists(&self);

    /// Stores an uploaded file and returns its durable public URL.
    async fn upload_file(
        &self,
        filename: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<String, AppError>;

    /// Fetches the image at `url` and stores a copy, returning the copy's URL.
    async fn upload_remote(&self, url: &str) -> Result<String, AppError>;
}

/// is_allowed_image
///
/// True when `name` (a filename or URL) ends in `.png`, `.jpg` or `.jpeg`, case-insensitive.
/// Any query string or fragment is ignored.
pub fn is_allowed_image(name: &str) -> bool {
    extension_of(name)
        .map(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension_of(name: &str) -> Option<String> {
    let path = name.split(['?', '#']).next().unwrap_or(name);
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = last_segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// object_key
///
/// Builds the storage key for a new image: `photos/<uuid>.<ext>`. The client-supplied name only
/// contributes its extension.
pub fn object_key(filename: &str) -> String {
    let ext = extension_of(filename).unwrap_or_else(|| "bin".to_string());
    sanitize_key(&format!("photos/{}.{}", Uuid::new_v4(), ext))
}

fn content_type_for(filename: &str) -> &'static str {
    match extension_of(filename).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// sanitize_key
///
/// Removes directory navigation components (`..`, `.`) and empty segments from a key.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

// 2. The Real Implementation (S3/MinIO)
/// S3MediaUploader
///
/// Stores images in an S3-compatible bucket. `force_path_style(true)` is required for MinIO.
#[derive(Clone)]
pub struct S3MediaUploader {
    client: s3::Client,
    http: reqwest::Client,
    bucket_name: String,
    public_base_url: String,
}

impl S3MediaUploader {
    /// new
    ///
    /// Constructs the S3 client from the storage settings in `AppConfig`.
    pub fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
        public_base_url: &str,
    ) -> Result<Self, AppError> {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        let http = reqwest::Client::builder()
            .timeout(REMOTE_FETCH_TIMEOUT)
            .build()
            .map_err(|e| AppError::Fatal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client: s3::Client::from_conf(config),
            http,
            bucket_name: bucket.to_string(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket_name, key)
    }
}

#[async_trait]
impl MediaUploader for S3MediaUploader {
    /// ensure_bucket_exists
    ///
    /// CreateBucket is idempotent for our purposes; an "already owned" error is ignored.
    async fn ensure_bucket_exists(&self) {
        if let Err(e) = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
        {
            tracing::debug!("create_bucket for {} returned: {:?}", self.bucket_name, e);
        }
    }

    async fn upload_file(
        &self,
        filename: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        let key = object_key(filename);
        let content_type = content_type.unwrap_or_else(|| content_type_for(filename));

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("put_object {} failed: {:?}", key, e);
                AppError::UploadFailed("Error uploading photo".to_string())
            })?;

        tracing::info!(key = %key, "stored photo object");
        Ok(self.public_url(&key))
    }

    /// upload_remote
    ///
    /// Downloads the source image (bounded by the client timeout) and re-uploads it, so stored
    /// photos never depend on a third-party host.
    async fn upload_remote(&self, url: &str) -> Result<String, AppError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!("fetching remote image {} failed: {}", url, e);
                AppError::UploadFailed("Error uploading photo".to_string())
            })?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!("reading remote image {} failed: {}", url, e);
            AppError::UploadFailed("Error uploading photo".to_string())
        })?;

        self.upload_file(url, content_type.as_deref(), bytes.to_vec())
            .await
    }
}

// 3. The Mock Implementation (For Tests)
/// MockMediaUploader
///
/// Never touches the network. Returns deterministic-looking URLs under a fake bucket, or fails
/// every call when built with `new_failing`.
#[derive(Clone, Default)]
pub struct MockMediaUploader {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
}

impl MockMediaUploader {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

#[async_trait]
impl MediaUploader for MockMediaUploader {
    async fn ensure_bucket_exists(&self) {}

    async fn upload_file(
        &self,
        filename: &str,
        _content_type: Option<&str>,
        _bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        if self.should_fail {
            return Err(AppError::UploadFailed("Error uploading photo".to_string()));
        }
        Ok(format!(
            "http://localhost:9000/mock-bucket/{}",
            object_key(filename)
        ))
    }

    async fn upload_remote(&self, url: &str) -> Result<String, AppError> {
        self.upload_file(url, None, Vec::new()).await
    }
}

/// MediaState
///
/// The concrete type used to share the media host across the application state.
pub type MediaState = Arc<dyn MediaUploader>;
