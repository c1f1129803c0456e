use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named bucket of items, owned either by a user or by the system user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub user_id: i64,
    pub deleted_flag: bool,
}

impl Category {
    #[must_use]
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub user_id: i64,
    #[serde(skip)]
    pub category_id: String,
    /// Name of the parent category, resolved at read time.
    pub category_name: String,
    pub quantity: i64,
    pub deleted_flag: bool,
    pub updated_at: DateTime<Utc>,
}

/// A category together with its items, as returned by the category listing.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub name: String,
    pub items: Vec<Item>,
}

/// Flattened item projection used by the item listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub name: String,
    pub quantity: i64,
    pub category_name: String,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity,
            category_name: item.category_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(skip)]
    pub token_hash: String,
    #[serde(skip)]
    pub token_lookup: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}
