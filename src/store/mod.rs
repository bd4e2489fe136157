pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{Card, NewCard, NewUser, User, UserUpdate};

/// Failures surfaced by a store backend.
///
/// Backends reduce driver-specific failures to these variants at the point
/// where the driver error is caught; the HTTP classification of each variant
/// lives in `ApiError::from`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value for unique field `{field}`")]
    Duplicate { field: &'static str },

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

/// Contract of the external key-document service.
///
/// Every operation is single-shot: a failure is surfaced immediately and
/// never retried at this layer. `add_like`/`remove_like` are atomic
/// set-add/set-remove on the card's likers set and are idempotent.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn find_user(&self, id: ObjectId) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;
    async fn update_user(&self, id: ObjectId, update: UserUpdate) -> Result<Option<User>, StoreError>;

    async fn list_cards(&self) -> Result<Vec<Card>, StoreError>;
    async fn find_card(&self, id: ObjectId) -> Result<Option<Card>, StoreError>;
    async fn create_card(&self, new_card: NewCard) -> Result<Card, StoreError>;
    async fn delete_card(&self, id: ObjectId) -> Result<Option<Card>, StoreError>;
    async fn add_like(&self, card_id: ObjectId, user_id: ObjectId) -> Result<Option<Card>, StoreError>;
    async fn remove_like(&self, card_id: ObjectId, user_id: ObjectId) -> Result<Option<Card>, StoreError>;
}
