//! In-memory store backend with the same observable semantics as the Mongo
//! backend (unique emails, idempotent like set). Used by the integration
//! tests and handy for running the API without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::models::{Card, NewCard, NewUser, User, UserUpdate};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<ObjectId, User>>,
    cards: RwLock<HashMap<ObjectId, Card>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if users.values().any(|user| user.email == new_user.email) {
            return Err(StoreError::Duplicate { field: "email" });
        }

        let user = User {
            id: ObjectId::new(),
            email: new_user.email,
            password: new_user.password,
            name: new_user.name,
            about: new_user.about,
            avatar: new_user.avatar,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update_user(&self, id: ObjectId, update: UserUpdate) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;

        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            user.name = Some(name);
        }
        if let Some(about) = update.about {
            user.about = Some(about);
        }
        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar);
        }

        Ok(Some(user.clone()))
    }

    async fn list_cards(&self) -> Result<Vec<Card>, StoreError> {
        Ok(self.cards.read().await.values().cloned().collect())
    }

    async fn find_card(&self, id: ObjectId) -> Result<Option<Card>, StoreError> {
        Ok(self.cards.read().await.get(&id).cloned())
    }

    async fn create_card(&self, new_card: NewCard) -> Result<Card, StoreError> {
        let card = Card {
            id: ObjectId::new(),
            name: new_card.name,
            link: new_card.link,
            owner: new_card.owner,
            likes: Vec::new(),
            created_at: Utc::now(),
        };
        self.cards.write().await.insert(card.id, card.clone());

        Ok(card)
    }

    async fn delete_card(&self, id: ObjectId) -> Result<Option<Card>, StoreError> {
        Ok(self.cards.write().await.remove(&id))
    }

    async fn add_like(&self, card_id: ObjectId, user_id: ObjectId) -> Result<Option<Card>, StoreError> {
        let mut cards = self.cards.write().await;

        let Some(card) = cards.get_mut(&card_id) else {
            return Ok(None);
        };
        if !card.likes.contains(&user_id) {
            card.likes.push(user_id);
        }

        Ok(Some(card.clone()))
    }

    async fn remove_like(&self, card_id: ObjectId, user_id: ObjectId) -> Result<Option<Card>, StoreError> {
        let mut cards = self.cards.write().await;

        let Some(card) = cards.get_mut(&card_id) else {
            return Ok(None);
        };
        card.likes.retain(|liker| *liker != user_id);

        Ok(Some(card.clone()))
    }
}
