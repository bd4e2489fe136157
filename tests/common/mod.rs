#![allow(dead_code)]

use std::sync::{Arc, Once};

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use photo_cards_api::store::memory::MemoryStore;
use photo_cards_api::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

static INIT: Once = Once::new();

/// Build the full router over a fresh in-memory store. The signing secret
/// is pinned before the config singleton is first touched.
pub fn test_app() -> Router {
    INIT.call_once(|| {
        std::env::set_var("JWT_SECRET", TEST_SECRET);
    });

    app(AppState {
        store: Arc::new(MemoryStore::new()),
    })
}

pub async fn send_json(
    app: &Router,
    method: &str,
    path: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    app.clone().oneshot(request).await.expect("response")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    if bytes.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(&bytes).expect("json body")
}

/// Sign up a user and return the created user JSON.
pub async fn signup(app: &Router, email: &str, password: &str) -> Value {
    let response = send_json(
        app,
        "POST",
        "/signup",
        None,
        Some(json!({
            "email": email,
            "password": password,
            "name": "Tester",
            "about": "test account",
            "avatar": "https://example.com/avatar.png",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    body_json(response).await
}

/// Sign in and return the identity cookie pair (`jwt=<token>`).
pub async fn signin(app: &Router, email: &str, password: &str) -> String {
    let response = send_json(
        app,
        "POST",
        "/signin",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .expect("cookie string")
        .to_string();

    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .trim()
        .to_string()
}

/// Sign up and sign in, returning the user's hex id and the cookie pair.
pub async fn register(app: &Router, email: &str) -> (String, String) {
    let user = signup(app, email, "hunter2-secret").await;
    let cookie = signin(app, email, "hunter2-secret").await;
    let id = user["id"].as_str().expect("user id").to_string();

    (id, cookie)
}
