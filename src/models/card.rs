use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Photo card document as persisted by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub link: String,
    pub owner: ObjectId,
    /// Likers set: unique user ids, maintained by atomic set-add/set-remove.
    #[serde(default)]
    pub likes: Vec<ObjectId>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a card; the owner is always the caller.
#[derive(Debug, Clone)]
pub struct NewCard {
    pub name: String,
    pub link: String,
    pub owner: ObjectId,
}

/// Client-facing view of a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    pub id: String,
    pub name: String,
    pub link: String,
    pub owner: String,
    pub likes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id.to_hex(),
            name: card.name,
            link: card.link,
            owner: card.owner.to_hex(),
            likes: card.likes.iter().map(|liker| liker.to_hex()).collect(),
            created_at: card.created_at,
        }
    }
}
