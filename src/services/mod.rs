//! Use-case layer between the HTTP handlers and the repository.
//!
//! `ownership` holds the generic owned-resource rules; the other modules plug photos, comments
//! and social-media links into it, plus the identity flows.

pub mod comments;
pub mod identity;
pub mod ownership;
pub mod photos;
pub mod social_media;

pub use comments::{CommentService, CommentStore};
pub use identity::IdentityService;
pub use ownership::{ID_NOT_OWNED, OwnedService, OwnedStore, Updated, ensure_owner};
pub use photos::{PhotoService, PhotoSource, PhotoStore, store_image};
pub use social_media::{SocialMediaService, SocialMediaStore};
