use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod repository;
pub mod services;
pub mod storage;

// Routing segregated by access level (Public, Authenticated).
pub mod routes;
use auth::{AuthUser, TokenService};
use routes::{authenticated, public};
use services::{
    CommentService, CommentStore, IdentityService, PhotoService, PhotoStore, SocialMediaService,
    SocialMediaStore,
};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};
pub use storage::{MediaState, MockMediaUploader, S3MediaUploader};

/// ApiDoc
///
/// The OpenAPI document, served at `/api-docs/openapi.json` and rendered by Swagger UI.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::users::register_user, handlers::users::login, handlers::users::get_me,
        handlers::users::update_me, handlers::users::delete_me,
        handlers::photos::get_my_photos, handlers::photos::get_my_photo,
        handlers::photos::get_photos, handlers::photos::create_photo,
        handlers::photos::update_photo, handlers::photos::delete_photo,
        handlers::comments::get_my_comments, handlers::comments::get_my_comment,
        handlers::comments::get_comments, handlers::comments::create_comment,
        handlers::comments::update_comment, handlers::comments::delete_comment,
        handlers::social_media::get_my_social_media,
        handlers::social_media::get_my_social_media_by_id,
        handlers::social_media::get_social_media, handlers::social_media::create_social_media,
        handlers::social_media::update_social_media,
        handlers::social_media::delete_social_media,
    ),
    components(
        schemas(
            models::RegisterRequest, models::LoginRequest, models::LoginResponse,
            models::UpdateUserRequest, models::UserResponse, models::OwnerProfile,
            models::PhotoUploadForm, models::UpdatePhotoRequest, models::PhotoResponse,
            models::PhotoSummary, models::CreateCommentRequest, models::UpdateCommentRequest,
            models::CommentResponse, models::CreateSocialMediaRequest,
            models::UpdateSocialMediaRequest, models::SocialMediaResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "photogram", description = "Photo sharing API")
    )
)]
pub struct ApiDoc;

// Registers the `bearer` scheme the authenticated paths refer to.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// AppState
///
/// The single, cloneable container of everything a request may need. Services are cheap
/// views over it, built per request.
#[derive(Clone)]
pub struct AppState {
    /// Persistence: Postgres in production, in-memory in tests.
    pub repo: RepositoryState,
    /// Media host for photo images.
    pub media: MediaState,
    /// Issues and verifies bearer tokens.
    pub tokens: TokenService,
    pub config: AppConfig,
}

impl AppState {
    /// new
    ///
    /// Builds the token service from `config.jwt_secret`; fails with `Fatal` when it is empty.
    pub fn new(repo: RepositoryState, media: MediaState, config: AppConfig) -> AppResult<Self> {
        let tokens = TokenService::new(&config.jwt_secret)?;
        Ok(Self {
            repo,
            media,
            tokens,
            config,
        })
    }

    pub fn identity(&self) -> IdentityService {
        IdentityService::new(self.repo.clone(), self.tokens.clone())
    }

    pub fn photos(&self) -> PhotoService {
        PhotoService::new(PhotoStore::new(self.repo.clone()))
    }

    pub fn comments(&self) -> CommentService {
        CommentService::new(CommentStore::new(self.repo.clone()))
    }

    pub fn social_media(&self) -> SocialMediaService {
        SocialMediaService::new(SocialMediaStore::new(self.repo.clone()))
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for MediaState {
    fn from_ref(app_state: &AppState) -> MediaState {
        app_state.media.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> TokenService {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Gate for `authenticated_routes`. Extracting `AuthUser` verifies the bearer token and
/// confirms the identity still exists; any failure short-circuits with a 401 before the
/// handler runs.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing table, applies the authentication layer to protected routes and
/// wraps everything in the observability and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .with_state(state);

    // Request ID is set first so the trace span and the response both carry it.
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the `http_request` span for a request, tagged with method, URI and `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
