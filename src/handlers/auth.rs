use axum::{extract::State, http::StatusCode, response::Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};
use time::Duration;

use crate::auth::{self, AUTH_COOKIE};
use crate::config::{self, CookieSameSite};
use crate::error::{ApiError, ApiResult};
use crate::models::{NewUser, UserResponse};
use crate::validation;
use crate::AppState;

/// Returned for both an unknown email and a wrong password, so the two
/// cases cannot be told apart by a client probing for accounts.
const BAD_CREDENTIALS: &str = "incorrect email or password";

#[derive(Debug, Deserialize)]
pub struct SignupPayload {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub about: Option<String>,
    pub avatar: Option<String>,
}

impl SignupPayload {
    fn validate(&self) -> Result<(), ApiError> {
        self.check()
            .map_err(|detail| ApiError::bad_request(format!("invalid data for user creation: {}", detail)))
    }

    fn check(&self) -> Result<(), String> {
        validation::validate_email(&self.email)?;
        validation::validate_password(&self.password)?;
        if let Some(name) = &self.name {
            validation::validate_text_field("name", name)?;
        }
        if let Some(about) = &self.about {
            validation::validate_text_field("about", about)?;
        }
        if let Some(avatar) = &self.avatar {
            validation::validate_url_field("avatar", avatar)?;
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SigninPayload {
    pub email: String,
    pub password: String,
}

/// POST /signup - create an account
///
/// The secret is hashed before it reaches the store and is absent from the
/// response by construction.
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    payload.validate()?;

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::internal_server_error(format!("password hashing failed: {}", e)))?;

    let user = state
        .store
        .create_user(NewUser {
            email: payload.email,
            password: password_hash,
            name: payload.name,
            about: payload.about,
            avatar: payload.avatar,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /signin - verify credentials and set the identity cookie
///
/// The token travels only in the cookie, never in the response body.
pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SigninPayload>,
) -> ApiResult<(CookieJar, Json<Value>)> {
    let user = state
        .store
        .find_user_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized(BAD_CREDENTIALS))?;

    let password_matches = bcrypt::verify(&payload.password, &user.password)
        .map_err(|e| ApiError::internal_server_error(format!("password verification failed: {}", e)))?;
    if !password_matches {
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    let token = auth::issue_token(user.id)
        .map_err(|e| ApiError::internal_server_error(format!("token issuance failed: {}", e)))?;

    let jar = jar.add(identity_cookie(token));

    Ok((jar, Json(json!({ "message": "authentication successful" }))))
}

fn identity_cookie(token: String) -> Cookie<'static> {
    let security = &config::config().security;

    Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .path("/")
        .max_age(Duration::days(security.jwt_expiry_days))
        .secure(security.cookie_secure)
        .same_site(match security.cookie_same_site {
            CookieSameSite::Lax => SameSite::Lax,
            CookieSameSite::Strict => SameSite::Strict,
            CookieSameSite::None => SameSite::None,
        })
        .build()
}
