use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;

use super::parse_object_id;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{UserResponse, UserUpdate};
use crate::validation;
use crate::AppState;

/// GET /users - list all users
pub async fn get_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.store.list_users().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/me - the caller's own record
pub async fn get_current_user(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .store
        .find_user(caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(user.into()))
}

/// GET /users/:userId
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let id = parse_object_id(&user_id, "user")?;

    let user = state
        .store
        .find_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(user.into()))
}

#[derive(Debug, Deserialize)]
pub struct ProfilePayload {
    pub name: String,
    pub about: String,
}

impl ProfilePayload {
    fn validate(&self) -> Result<(), ApiError> {
        self.check()
            .map_err(|detail| ApiError::bad_request(format!("invalid data for profile update: {}", detail)))
    }

    fn check(&self) -> Result<(), String> {
        validation::validate_text_field("name", &self.name)?;
        validation::validate_text_field("about", &self.about)?;

        Ok(())
    }
}

/// PATCH /users/me - update own display fields
///
/// The target id always comes from the caller identity; nothing in the
/// request can select another user's record.
pub async fn update_profile(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<ProfilePayload>,
) -> ApiResult<Json<UserResponse>> {
    payload.validate()?;

    let user = state
        .store
        .update_user(
            caller.id,
            UserUpdate {
                name: Some(payload.name),
                about: Some(payload.about),
                avatar: None,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(user.into()))
}

#[derive(Debug, Deserialize)]
pub struct AvatarPayload {
    pub avatar: String,
}

impl AvatarPayload {
    fn validate(&self) -> Result<(), ApiError> {
        validation::validate_url_field("avatar", &self.avatar)
            .map_err(|detail| ApiError::bad_request(format!("invalid data for avatar update: {}", detail)))
    }
}

/// PATCH /users/me/avatar - update own avatar, caller-targeted like
/// the profile update
pub async fn update_avatar(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<AvatarPayload>,
) -> ApiResult<Json<UserResponse>> {
    payload.validate()?;

    let user = state
        .store
        .update_user(
            caller.id,
            UserUpdate {
                name: None,
                about: None,
                avatar: Some(payload.avatar),
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(user.into()))
}
