mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Methods taking `owner_ids` scope their results to rows owned by any of the
/// given users. Callers pass the visibility set `{caller, system user}`.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Category operations
    fn create_category(&self, category: &Category) -> Result<()>;
    /// Non-deleted categories owned by any of `owner_ids`.
    fn list_categories_by_owners(&self, owner_ids: &[i64]) -> Result<Vec<Category>>;
    /// Non-deleted category with the given id, owned by exactly `owner_id`.
    fn find_category_by_owner_and_id(&self, owner_id: i64, id: &str) -> Result<Option<Category>>;
    /// Categories (deleted or not) with an exact name, in creation order.
    fn find_categories_by_owners_and_name(
        &self,
        owner_ids: &[i64],
        name: &str,
    ) -> Result<Vec<Category>>;
    fn category_exists(&self, owner_id: i64, name: &str) -> Result<bool>;
    fn update_category(&self, category: &Category) -> Result<()>;

    // Item operations
    /// Every item of a category, soft-deleted ones included.
    fn list_category_items(&self, category_id: &str) -> Result<Vec<Item>>;
    /// Items of a category owned by any of `owner_ids`, soft-deleted ones included.
    fn list_category_items_by_owners(
        &self,
        owner_ids: &[i64],
        category_id: &str,
    ) -> Result<Vec<Item>>;
    /// Inserts an item, failing with `NotFound` if its category is gone.
    fn create_item(&self, item: &Item) -> Result<()>;
    fn update_item(&self, item: &Item) -> Result<()>;
    /// Non-deleted items owned by any of `owner_ids` in a non-deleted, visible
    /// category with the given name.
    fn list_items_by_owners_and_category_name(
        &self,
        owner_ids: &[i64],
        category_name: &str,
    ) -> Result<Vec<Item>>;
    fn find_item_by_owners_and_id(&self, owner_ids: &[i64], id: &str) -> Result<Option<Item>>;

    // Token operations
    fn create_token(&self, token: &Token) -> Result<()>;
    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>>;
    fn list_user_tokens(&self, user_id: i64) -> Result<Vec<Token>>;
    fn delete_token(&self, id: &str) -> Result<bool>;
    fn update_token_last_used(&self, id: &str) -> Result<()>;
}
