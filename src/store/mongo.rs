use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Client, Collection, Database, IndexModel,
};

use super::{Store, StoreError};
use crate::config::DatabaseConfig;
use crate::models::{Card, NewCard, NewUser, User, UserUpdate};

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB-backed store. Likes rely on the server's atomic
/// `$addToSet`/`$pull` update operators; no cross-document coordination.
pub struct MongoStore {
    db: Database,
    users: Collection<User>,
    cards: Collection<Card>,
}

impl MongoStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(&config.url).await?;
        let db = client.database(&config.name);

        let store = Self {
            users: db.collection("users"),
            cards: db.collection("cards"),
            db,
        };
        store.ensure_indexes().await?;

        Ok(store)
    }

    /// The unique index on `email` backs the duplicate-account conflict.
    async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let email_unique = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users.create_index(email_unique).await?;

        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

fn classify_write(err: mongodb::error::Error) -> StoreError {
    if is_duplicate_key(&err) {
        StoreError::Duplicate { field: "email" }
    } else {
        StoreError::Mongo(err)
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = self.users.find(doc! {}).await?.try_collect().await?;
        Ok(users)
    }

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.users.find_one(doc! { "_id": id }).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.find_one(doc! { "email": email }).await?)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = User {
            id: ObjectId::new(),
            email: new_user.email,
            password: new_user.password,
            name: new_user.name,
            about: new_user.about,
            avatar: new_user.avatar,
        };

        self.users.insert_one(&user).await.map_err(classify_write)?;

        Ok(user)
    }

    async fn update_user(&self, id: ObjectId, update: UserUpdate) -> Result<Option<User>, StoreError> {
        let mut set = Document::new();
        if let Some(name) = update.name {
            set.insert("name", name);
        }
        if let Some(about) = update.about {
            set.insert("about", about);
        }
        if let Some(avatar) = update.avatar {
            set.insert("avatar", avatar);
        }
        if set.is_empty() {
            return self.find_user(id).await;
        }

        let updated = self
            .users
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }

    async fn list_cards(&self) -> Result<Vec<Card>, StoreError> {
        let cards = self.cards.find(doc! {}).await?.try_collect().await?;
        Ok(cards)
    }

    async fn find_card(&self, id: ObjectId) -> Result<Option<Card>, StoreError> {
        Ok(self.cards.find_one(doc! { "_id": id }).await?)
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

        self.cards.insert_one(&card).await?;

        Ok(card)
    }

    async fn delete_card(&self, id: ObjectId) -> Result<Option<Card>, StoreError> {
        Ok(self.cards.find_one_and_delete(doc! { "_id": id }).await?)
    }

    async fn add_like(&self, card_id: ObjectId, user_id: ObjectId) -> Result<Option<Card>, StoreError> {
        let updated = self
            .cards
            .find_one_and_update(
                doc! { "_id": card_id },
                doc! { "$addToSet": { "likes": user_id } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }

    async fn remove_like(&self, card_id: ObjectId, user_id: ObjectId) -> Result<Option<Card>, StoreError> {
        let updated = self
            .cards
            .find_one_and_update(
                doc! { "_id": card_id },
                doc! { "$pull": { "likes": user_id } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }
}
