use photogram_api::{
    AppConfig, AppError, AppState, InMemoryRepository, MockMediaUploader,
    models::{
        CreateCommentRequest, CreateSocialMediaRequest, LoginRequest, NewPhoto, RegisterRequest,
        UpdateCommentRequest, UpdatePhotoRequest, UpdateSocialMediaRequest, UpdateUserRequest,
    },
    repository::{Repository, RepositoryState},
    services::ensure_owner,
    storage::MediaState,
};
use std::sync::Arc;

// --- Fixtures ---

struct Fixture {
    state: AppState,
    memory: Arc<InMemoryRepository>,
}

fn fixture() -> Fixture {
    let memory = Arc::new(InMemoryRepository::new());
    let state = AppState::new(
        memory.clone() as RepositoryState,
        Arc::new(MockMediaUploader::new()) as MediaState,
        AppConfig::default(),
    )
    .unwrap();
    Fixture { state, memory }
}

fn registration(username: &str) -> RegisterRequest {
    RegisterRequest {
        full_name: format!("{username} Person"),
        username: username.to_string(),
        email: format!("{username}@x.com"),
        password: "pw-secret".to_string(),
    }
}

impl Fixture {
    async fn user(&self, username: &str) -> i64 {
        self.state
            .identity()
            .register(registration(username))
            .await
            .unwrap()
            .id
    }

    async fn photo(&self, owner: i64, title: &str) -> i64 {
        self.state
            .photos()
            .create(
                owner,
                NewPhoto {
                    title: title.to_string(),
                    caption: "c".to_string(),
                    photo_url: "http://localhost:9000/mock-bucket/photos/a.png".to_string(),
                },
            )
            .await
            .unwrap()
            .id
    }

    async fn comment(&self, author: i64, photo_id: i64, message: &str) -> i64 {
        self.state
            .comments()
            .create(
                author,
                CreateCommentRequest {
                    photo_id,
                    message: message.to_string(),
                },
            )
            .await
            .unwrap()
            .id
    }
}

// --- Identity ---

#[tokio::test]
async fn test_register_conflict_writes_nothing() {
    let fx = fixture();
    fx.user("alice").await;

    let mut clash = registration("alice2");
    clash.email = "alice@x.com".to_string();
    let result = fx.state.identity().register(clash).await;
    match result {
        Err(AppError::Conflict(msg)) => assert_eq!(msg, "email already used"),
        other => panic!("expected Conflict, got {:?}", other),
    }
    assert!(fx.memory.find_user_by_username("alice2").await.unwrap().is_none());

    let result = fx.state.identity().register(registration("alice")).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_register_requires_every_field() {
    let fx = fixture();
    let mut input = registration("bob");
    input.password = String::new();

    let result = fx.state.identity().register(input).await;
    match result {
        Err(AppError::ValidationFailed(msg)) => assert_eq!(msg, "password is required"),
        other => panic!("expected ValidationFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_login_issues_token_for_the_user() {
    let fx = fixture();
    let id = fx.user("carol").await;

    let token = fx
        .state
        .identity()
        .login(LoginRequest {
            email: "carol@x.com".to_string(),
            password: "pw-secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(fx.state.tokens.verify(&token), Ok(id));

    for (email, password) in [("carol@x.com", "wrong"), ("nobody@x.com", "pw-secret")] {
        let result = fx
            .state
            .identity()
            .login(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await;
        match result {
            Err(AppError::Unauthenticated(msg)) => assert_eq!(msg, "email/password is wrong"),
            other => panic!("expected Unauthenticated, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_profile_update_checks_conflicts_against_others_only() {
    let fx = fixture();
    let dave = fx.user("dave").await;
    fx.user("erin").await;

    // Re-submitting your own username is not a conflict.
    let updated = fx
        .state
        .identity()
        .update_profile(
            dave,
            UpdateUserRequest {
                username: Some("dave".to_string()),
                full_name: Some("David".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.full_name, "David");

    let result = fx
        .state
        .identity()
        .update_profile(
            dave,
            UpdateUserRequest {
                username: Some("erin".to_string()),
                ..Default::default()
            },
        )
        .await;
    match result {
        Err(AppError::Conflict(msg)) => assert_eq!(msg, "username already used"),
        other => panic!("expected Conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_profile_fields_keep_stored_values() {
    let fx = fixture();
    let id = fx.user("finn").await;

    let updated = fx
        .state
        .identity()
        .update_profile(
            id,
            UpdateUserRequest {
                email: Some("   ".to_string()),
                username: Some("\t".to_string()),
                full_name: Some(" ".to_string()),
                password: Some("  ".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "finn@x.com");
    assert_eq!(updated.username, "finn");
    assert_eq!(updated.full_name, "finn Person");

    let stored = fx.memory.find_user(id).await.unwrap().unwrap();
    assert_eq!(stored.email, "finn@x.com");
    let login = LoginRequest {
        email: "finn@x.com".to_string(),
        password: "pw-secret".to_string(),
    };
    assert!(fx.state.identity().login(login).await.is_ok());
}

#[tokio::test]
async fn test_password_change_is_rehashed() {
    let fx = fixture();
    let id = fx.user("fay").await;

    fx.state
        .identity()
        .update_profile(
            id,
            UpdateUserRequest {
                password: Some("new-password".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = fx.memory.find_user(id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "new-password");

    let login = |password: &str| LoginRequest {
        email: "fay@x.com".to_string(),
        password: password.to_string(),
    };
    assert!(fx.state.identity().login(login("new-password")).await.is_ok());
    assert!(fx.state.identity().login(login("pw-secret")).await.is_err());
}

#[tokio::test]
async fn test_delete_account_twice() {
    let fx = fixture();
    let id = fx.user("gus").await;

    fx.state.identity().delete_account(id).await.unwrap();
    let result = fx.state.identity().delete_account(id).await;
    assert!(matches!(result, Err(AppError::UnknownIdentity)));

    // The freed email can be registered again.
    assert!(fx.state.identity().register(registration("gus")).await.is_ok());
}

// --- Owned Resources ---

#[tokio::test]
async fn test_get_one_hides_other_users_records() {
    let fx = fixture();
    let owner = fx.user("hana").await;
    let other = fx.user("ivan").await;
    let photo_id = fx.photo(owner, "Private view").await;

    assert!(fx.state.photos().get_one(owner, photo_id).await.is_ok());
    match fx.state.photos().get_one(other, photo_id).await {
        Err(AppError::NotFound(msg)) => assert_eq!(msg, "Failed to get data, id is invalid"),
        other => panic!("expected NotFound, got {:?}", other.map(|p| p.id)),
    }
}

#[tokio::test]
async fn test_delete_by_non_owner_reports_owner_and_keeps_record() {
    let fx = fixture();
    let owner = fx.user("jade").await;
    let other = fx.user("kim").await;
    let photo_id = fx.photo(owner, "Stays").await;

    let reported = fx.state.photos().delete(other, photo_id).await.unwrap();
    assert_eq!(reported, owner);
    assert!(matches!(ensure_owner(other, reported), Err(AppError::Forbidden)));
    assert!(fx.memory.find_photo(photo_id).await.unwrap().is_some());

    let reported = fx.state.photos().delete(owner, photo_id).await.unwrap();
    assert!(ensure_owner(owner, reported).is_ok());
    assert!(fx.memory.find_photo(photo_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_by_non_owner_is_not_persisted() {
    let fx = fixture();
    let owner = fx.user("leo").await;
    let other = fx.user("max").await;
    let photo_id = fx.photo(owner, "Original").await;

    let outcome = fx
        .state
        .photos()
        .update(
            other,
            photo_id,
            UpdatePhotoRequest {
                title: Some("Vandalised".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.owner_id, owner);
    assert!(matches!(outcome.into_owned_by(other), Err(AppError::Forbidden)));

    let stored = fx.memory.find_photo(photo_id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Original");
}

#[tokio::test]
async fn test_empty_patch_is_a_no_op() {
    let fx = fixture();
    let owner = fx.user("nina").await;
    let link = fx
        .state
        .social_media()
        .create(
            owner,
            CreateSocialMediaRequest {
                name: "Site".to_string(),
                social_media_url: "https://nina.example.com".to_string(),
            },
        )
        .await
        .unwrap();

    let outcome = fx
        .state
        .social_media()
        .update(
            owner,
            link.id,
            UpdateSocialMediaRequest {
                name: Some(String::new()),
                social_media_url: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.owner_id, owner);
    let view = outcome.into_owned_by(owner).unwrap();
    assert_eq!(view.name, "Site");
    assert_eq!(view.updated_at, link.updated_at);
}

#[tokio::test]
async fn test_update_missing_record_is_not_found() {
    let fx = fixture();
    let owner = fx.user("omar").await;

    let result = fx
        .state
        .comments()
        .update(
            owner,
            999,
            UpdateCommentRequest {
                message: Some("hello".to_string()),
            },
        )
        .await;
    match result {
        Err(AppError::NotFound(msg)) => assert_eq!(msg, "Comment ID cannot be found"),
        other => panic!("expected NotFound, got {:?}", other.map(|u| u.owner_id)),
    }
}

#[tokio::test]
async fn test_list_mine_comments_nest_photo_and_author() {
    let fx = fixture();
    let photographer = fx.user("pia").await;
    let commenter = fx.user("quin").await;
    let photo_id = fx.photo(photographer, "Nested").await;
    fx.comment(commenter, photo_id, "great").await;

    let mine = fx.state.comments().list_mine(commenter).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].photo.id, photo_id);
    assert_eq!(mine[0].photo.title, "Nested");
    assert_eq!(mine[0].photo.user_id, photographer);
    assert_eq!(mine[0].user.id, commenter);
    assert_eq!(mine[0].user.username, "quin");

    assert!(fx.state.comments().list_mine(photographer).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_soft_deleted_photo_still_resolves_from_comment() {
    let fx = fixture();
    let owner = fx.user("rex").await;
    let photo_id = fx.photo(owner, "Archived").await;
    fx.comment(owner, photo_id, "keep me").await;

    fx.state.photos().delete(owner, photo_id).await.unwrap();

    let comments = fx.state.comments().list_mine(owner).await.unwrap();
    assert_eq!(comments[0].photo.title, "Archived");
}

#[tokio::test]
async fn test_hard_removed_photo_is_a_dangling_reference() {
    let fx = fixture();
    let owner = fx.user("sia").await;
    let photo_id = fx.photo(owner, "Purged").await;
    let comment_id = fx.comment(owner, photo_id, "orphan").await;

    fx.memory.remove_photo_row(photo_id).await;

    let result = fx.state.comments().get_one(owner, comment_id).await;
    assert!(matches!(result, Err(AppError::DanglingReference(_))));
}

#[tokio::test]
async fn test_non_owner_update_of_dangling_comment_is_forbidden() {
    let fx = fixture();
    let owner = fx.user("sam").await;
    let other = fx.user("sol").await;
    let photo_id = fx.photo(owner, "Purged too").await;
    let comment_id = fx.comment(owner, photo_id, "orphan").await;

    fx.memory.remove_photo_row(photo_id).await;

    // Ownership is decided before the missing photo is ever joined.
    let outcome = fx
        .state
        .comments()
        .update(
            other,
            comment_id,
            UpdateCommentRequest {
                message: Some("hijack".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.owner_id, owner);
    assert!(matches!(outcome.into_owned_by(other), Err(AppError::Forbidden)));

    let stored = fx.memory.find_comment(comment_id).await.unwrap().unwrap();
    assert_eq!(stored.message, "orphan");
}

#[tokio::test]
async fn test_comment_requires_live_photo() {
    let fx = fixture();
    let owner = fx.user("tom").await;
    let photo_id = fx.photo(owner, "Deleted first").await;
    fx.state.photos().delete(owner, photo_id).await.unwrap();

    let result = fx
        .state
        .comments()
        .create(
            owner,
            CreateCommentRequest {
                photo_id,
                message: "too late".to_string(),
            },
        )
        .await;
    match result {
        Err(AppError::NotFound(msg)) => assert_eq!(msg, "Photo ID cannot be found"),
        other => panic!("expected NotFound, got {:?}", other.map(|c| c.id)),
    }
}

#[tokio::test]
async fn test_list_all_excludes_deleted_and_removed_owners() {
    let fx = fixture();
    let stays = fx.user("uli").await;
    let leaves = fx.user("vera").await;
    let removed = fx.user("walt").await;
    fx.photo(stays, "Visible").await;
    fx.photo(leaves, "Hidden by soft delete").await;
    fx.photo(removed, "Hidden by removal").await;

    fx.state.identity().delete_account(leaves).await.unwrap();
    fx.memory.remove_user_row(removed).await;

    let all = fx.state.photos().list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Visible");
    assert_eq!(all[0].user.username, "uli");
}

#[tokio::test]
async fn test_create_rejects_missing_fields_without_writing() {
    let fx = fixture();
    let owner = fx.user("xena").await;

    let result = fx
        .state
        .social_media()
        .create(
            owner,
            CreateSocialMediaRequest {
                name: "   ".to_string(),
                social_media_url: "https://x.example.com".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::ValidationFailed(_))));
    assert!(fx.state.social_media().list_mine(owner).await.unwrap().is_empty());
}
