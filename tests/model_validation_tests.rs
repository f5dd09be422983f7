use chrono::Utc;
use photogram_api::{
    auth::Claims,
    models::{
        ApiResponse, CommentResponse, CreateCommentRequest, OwnerProfile, Photo, PhotoSummary,
        RegisterRequest, UpdatePhotoRequest, User, UserResponse,
    },
};
use serde_json::{Value, json};

fn sample_user() -> User {
    User {
        id: 3,
        full_name: "Jane Doe".to_string(),
        username: "jane".to_string(),
        email: "jane@example.com".to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

#[test]
fn test_user_response_never_carries_the_password() {
    let response = UserResponse::from(sample_user());
    let json_output = serde_json::to_string(&response).unwrap();

    assert!(json_output.contains(r#""username":"jane""#));
    assert!(!json_output.contains("password"));
    assert!(!json_output.contains("argon2"));
}

#[test]
fn test_api_response_omits_absent_data() {
    let json_output = serde_json::to_value(ApiResponse::message("Successfully deleted photo")).unwrap();
    assert_eq!(json_output, json!({ "message": "Successfully deleted photo" }));

    let with_data = serde_json::to_value(ApiResponse::with_data("ok", vec![1, 2])).unwrap();
    assert_eq!(with_data["data"], json!([1, 2]));
}

#[test]
fn test_claims_use_user_id_camel_case_key() {
    let claims = Claims {
        user_id: 9,
        authorized: true,
        exp: 1_700_000_000,
    };
    let value = serde_json::to_value(&claims).unwrap();

    assert_eq!(value["userId"], 9);
    assert_eq!(value["authorized"], true);
    assert!(value.get("user_id").is_none());
}

#[test]
fn test_request_fields_default_when_absent() {
    // Missing required fields parse as empty and are reported by validation, not by serde.
    let register: RegisterRequest = serde_json::from_value(json!({ "email": "a@b.c" })).unwrap();
    assert_eq!(register.email, "a@b.c");
    assert!(register.username.is_empty());

    let comment: CreateCommentRequest = serde_json::from_value(json!({})).unwrap();
    assert_eq!(comment.photo_id, 0);
}

#[test]
fn test_update_photo_request_optionality() {
    let partial_update = UpdatePhotoRequest {
        title: Some("New Title Only".to_string()),
        caption: None,
        photo_url: None,
    };

    let json_output = serde_json::to_string(&partial_update).unwrap();
    assert!(json_output.contains(r#""title":"New Title Only""#));
    assert!(!json_output.contains("caption"));
    assert!(!json_output.contains("photo_url"));
}

#[test]
fn test_comment_response_nests_photo_and_author() {
    let author = sample_user();
    let photo = Photo {
        id: 11,
        title: "Harbour".to_string(),
        caption: "Morning".to_string(),
        photo_url: "http://localhost:9000/bucket/photos/x.jpg".to_string(),
        user_id: 4,
        ..Photo::default()
    };
    let comment = photogram_api::models::Comment {
        id: 21,
        photo_id: 11,
        user_id: author.id,
        message: "Lovely".to_string(),
        ..Default::default()
    };

    let response = CommentResponse::new(comment, &photo, &author);
    assert_eq!(response.photo, PhotoSummary::from(&photo));
    assert_eq!(response.user, OwnerProfile::from(&author));

    let value: Value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["photo"]["title"], "Harbour");
    assert_eq!(value["photo"]["user_id"], 4);
    assert_eq!(value["user"]["username"], "jane");
    assert!(value["user"].get("password_hash").is_none());
}
