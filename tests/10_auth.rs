mod common;

use anyhow::Result;
use axum::http::{header, StatusCode};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use photo_cards_api::auth::{verify_token, Claims};

#[tokio::test]
async fn signup_returns_created_user_without_the_secret() -> Result<()> {
    let app = common::test_app();

    let response = common::send_json(
        &app,
        "POST",
        "/signup",
        None,
        Some(json!({
            "email": "ansel@example.com",
            "password": "zone-system",
            "name": "Ansel",
            "about": "landscapes",
            "avatar": "https://example.com/ansel.png",
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = common::body_json(response).await;
    assert_eq!(body["email"], "ansel@example.com");
    assert_eq!(body["name"], "Ansel");
    assert!(body.get("password").is_none(), "secret leaked: {}", body);

    Ok(())
}

#[tokio::test]
async fn signup_with_a_taken_email_conflicts() -> Result<()> {
    let app = common::test_app();
    common::signup(&app, "dupe@example.com", "first-password").await;

    let response = common::send_json(
        &app,
        "POST",
        "/signup",
        None,
        Some(json!({ "email": "dupe@example.com", "password": "second-password" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "a user with this email already exists");

    Ok(())
}

#[tokio::test]
async fn signup_rejects_invalid_payloads() -> Result<()> {
    let app = common::test_app();

    let bad_email = common::send_json(
        &app,
        "POST",
        "/signup",
        None,
        Some(json!({ "email": "not-an-email", "password": "pw" })),
    )
    .await;
    assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);

    let short_name = common::send_json(
        &app,
        "POST",
        "/signup",
        None,
        Some(json!({ "email": "ok@example.com", "password": "pw", "name": "x" })),
    )
    .await;
    assert_eq!(short_name.status(), StatusCode::BAD_REQUEST);

    let bad_avatar = common::send_json(
        &app,
        "POST",
        "/signup",
        None,
        Some(json!({
            "email": "ok2@example.com",
            "password": "pw",
            "avatar": "ftp://example.com/x.png",
        })),
    )
    .await;
    assert_eq!(bad_avatar.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() -> Result<()> {
    let app = common::test_app();
    common::signup(&app, "real@example.com", "right-password").await;

    let wrong_password = common::send_json(
        &app,
        "POST",
        "/signin",
        None,
        Some(json!({ "email": "real@example.com", "password": "wrong-password" })),
    )
    .await;
    let unknown_email = common::send_json(
        &app,
        "POST",
        "/signin",
        None,
        Some(json!({ "email": "ghost@example.com", "password": "whatever" })),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let first = common::body_json(wrong_password).await;
    let second = common::body_json(unknown_email).await;
    assert_eq!(first["message"], second["message"]);

    Ok(())
}

#[tokio::test]
async fn signin_sets_a_week_long_httponly_cookie_for_the_right_subject() -> Result<()> {
    let app = common::test_app();
    let user = common::signup(&app, "week@example.com", "pw-123456").await;

    let response = common::send_json(
        &app,
        "POST",
        "/signin",
        None,
        Some(json!({ "email": "week@example.com", "password": "pw-123456" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie")
        .to_str()?
        .to_string();

    assert!(set_cookie.starts_with("jwt="), "cookie: {}", set_cookie);
    assert!(set_cookie.contains("HttpOnly"), "cookie: {}", set_cookie);
    // 7 days in seconds
    assert!(set_cookie.contains("Max-Age=604800"), "cookie: {}", set_cookie);

    // The token in the cookie resolves back to the authenticated user
    let token = set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("jwt="))
        .expect("token value");
    let subject = verify_token(token).expect("verify");
    assert_eq!(subject.to_hex(), user["id"].as_str().expect("id"));

    // The token is not echoed in the body
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "authentication successful");
    assert!(body.get("token").is_none());

    Ok(())
}

#[tokio::test]
async fn protected_routes_require_the_cookie() -> Result<()> {
    let app = common::test_app();

    for (method, path) in [
        ("GET", "/users"),
        ("GET", "/users/me"),
        ("PATCH", "/users/me"),
        ("GET", "/cards"),
        ("DELETE", "/cards/507f1f77bcf86cd799439011"),
        ("PUT", "/cards/507f1f77bcf86cd799439011/likes"),
    ] {
        let response = common::send_json(&app, method, path, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, path);
        let body = common::body_json(response).await;
        assert_eq!(body["message"], "authentication required");
    }

    Ok(())
}

#[tokio::test]
async fn tampered_tokens_are_rejected() -> Result<()> {
    let app = common::test_app();
    let (_, cookie) = common::register(&app, "tamper@example.com").await;

    let tampered = format!("{}corrupted", cookie);
    let response = common::send_json(&app, "GET", "/users", Some(&tampered), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "invalid authentication token");

    Ok(())
}

#[tokio::test]
async fn expired_tokens_are_rejected() -> Result<()> {
    let app = common::test_app();
    let (user_id, _) = common::register(&app, "expired@example.com").await;

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: now - 120,
        iat: now - 240,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::TEST_SECRET.as_bytes()),
    )?;

    let cookie = format!("jwt={}", token);
    let response = common::send_json(&app, "GET", "/users", Some(&cookie), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
