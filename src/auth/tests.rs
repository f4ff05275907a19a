use actix_web::test::TestRequest;

use crate::auth::jwt::{generate_access_token, validate_token};
use crate::auth::middleware::validate_request_token;
use crate::auth::model::Claims;

const SECRET: &str = "test-secret";

#[test]
fn test_generate_and_validate_access_token() {
    let token = generate_access_token("user-42", Some("a@b.fr"), SECRET)
        .expect("Failed to generate access token");

    let claims = validate_token(&token, SECRET).expect("Failed to validate token");

    assert_eq!(claims.sub, "user-42");
    assert_eq!(claims.email.as_deref(), Some("a@b.fr"));
    assert_eq!(claims.token_type, "access");
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_wrong_secret_is_rejected() {
    let token = generate_access_token("user-42", None, SECRET).unwrap();
    assert!(validate_token(&token, "other-secret").is_err());
}

#[test]
fn test_invalid_token_returns_error() {
    assert!(validate_token("invalid.token.here", SECRET).is_err());
}

#[test]
fn test_request_without_header_is_unauthorized() {
    let req = TestRequest::default().to_http_request();
    assert!(validate_request_token(&req, SECRET).is_err());
}

#[test]
fn test_request_with_bearer_token() {
    let token = generate_access_token("user-7", None, SECRET).unwrap();
    let req = TestRequest::default()
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_http_request();

    let claims = validate_request_token(&req, SECRET).unwrap();
    assert_eq!(claims.user_id(), "user-7");
}

#[test]
fn test_refresh_tokens_are_not_accepted() {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: "user-7".into(),
        email: None,
        exp: now + 600,
        iat: now,
        token_type: "refresh".into(),
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    let req = TestRequest::default()
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_http_request();

    assert!(validate_request_token(&req, SECRET).is_err());
}
