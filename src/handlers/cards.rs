use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use super::parse_object_id;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{CardResponse, NewCard};
use crate::validation;
use crate::AppState;

/// GET /cards - list all cards
pub async fn get_cards(State(state): State<AppState>) -> ApiResult<Json<Vec<CardResponse>>> {
    let cards = state.store.list_cards().await?;

    Ok(Json(cards.into_iter().map(CardResponse::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CardPayload {
    pub name: String,
    pub link: String,
}

impl CardPayload {
    fn validate(&self) -> Result<(), ApiError> {
        self.check()
            .map_err(|detail| ApiError::bad_request(format!("invalid data for card creation: {}", detail)))
    }

    fn check(&self) -> Result<(), String> {
        validation::validate_text_field("name", &self.name)?;
        validation::validate_url_field("link", &self.link)?;

        Ok(())
    }
}

/// POST /cards - create a card owned by the caller
pub async fn create_card(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CardPayload>,
) -> ApiResult<(StatusCode, Json<CardResponse>)> {
    payload.validate()?;

    let card = state
        .store
        .create_card(NewCard {
            name: payload.name,
            link: payload.link,
            owner: caller.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(card.into())))
}

/// DELETE /cards/:cardId - owner-only removal
///
/// Lookup first so a missing card reads as 404 rather than 403, then the
/// ownership check, then the delete.
pub async fn delete_card(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(card_id): Path<String>,
) -> ApiResult<Json<CardResponse>> {
    let id = parse_object_id(&card_id, "card")?;

    let card = state
        .store
        .find_card(id)
        .await?
        .ok_or_else(|| ApiError::not_found("card not found"))?;

    if card.owner != caller.id {
        return Err(ApiError::forbidden("cannot delete another user's card"));
    }

    let deleted = state
        .store
        .delete_card(id)
        .await?
        .ok_or_else(|| ApiError::not_found("card not found"))?;

    Ok(Json(deleted.into()))
}

/// PUT|PATCH /cards/:cardId/likes - add the caller to the likers set
///
/// Set-add semantics: liking twice is idempotent success, never a conflict.
pub async fn like_card(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(card_id): Path<String>,
) -> ApiResult<Json<CardResponse>> {
    let id = parse_object_id(&card_id, "card")?;

    let card = state
        .store
        .add_like(id, caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("card not found"))?;

    Ok(Json(card.into()))
}

/// DELETE /cards/:cardId/likes - remove the caller from the likers set
///
/// Removing an id that was never present is a no-op that still returns the
/// card.
pub async fn unlike_card(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(card_id): Path<String>,
) -> ApiResult<Json<CardResponse>> {
    let id = parse_object_id(&card_id, "card")?;

    let card = state
        .store
        .remove_like(id, caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("card not found"))?;

    Ok(Json(card.into()))
}
