use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use bson::oid::ObjectId;

use crate::auth::{self, AUTH_COOKIE};
use crate::error::ApiError;

/// Authenticated caller identity extracted from the identity-token cookie.
/// Lives only in the extensions of a single request.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: ObjectId,
}

/// Authentication gate for protected routes: reads the identity token from
/// its cookie, verifies it and attaches the caller identity to the request.
/// Absent or unverifiable tokens short-circuit before any handler runs.
pub async fn jwt_auth_middleware(
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::unauthorized("authentication required"))?;

    let subject = auth::verify_token(&token)
        .map_err(|_| ApiError::unauthorized("invalid authentication token"))?;

    request.extensions_mut().insert(AuthUser { id: subject });

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("authentication required"))
    }
}
