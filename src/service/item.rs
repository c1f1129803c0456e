use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Category, Item, ItemRequest, ItemView};

/// Per-category item rules: name uniqueness with revival, ownership and soft deletion.
pub struct ItemService {
    store: Arc<dyn Store>,
    system_user_id: i64,
}

fn name_taken(name: &str) -> Error {
    Error::NameConflict(format!("item name '{name}' already exists"))
}

impl ItemService {
    pub fn new(store: Arc<dyn Store>, system_user_id: i64) -> Self {
        Self {
            store,
            system_user_id,
        }
    }

    fn visible_owners(&self, user_id: i64) -> [i64; 2] {
        [user_id, self.system_user_id]
    }

    /// First live category with this exact name visible to the user.
    fn resolve_category(&self, user_id: i64, name: &str) -> Result<Category> {
        self.store
            .find_categories_by_owners_and_name(&self.visible_owners(user_id), name)?
            .into_iter()
            .find(|c| !c.deleted_flag)
            .ok_or_else(|| Error::NotFound("category not found".to_string()))
    }

    /// Adds an item to a category, or revives a soft-deleted item of the same name.
    pub fn create_item(&self, user_id: i64, request: &ItemRequest) -> Result<Item> {
        let category = self.resolve_category(user_id, &request.category_name)?;
        let items = self
            .store
            .list_category_items_by_owners(&self.visible_owners(user_id), &category.id)?;

        let mut revivable = None;
        for existing in items.into_iter().filter(|i| i.name == request.name) {
            if !existing.deleted_flag {
                return Err(name_taken(&request.name));
            }
            revivable.get_or_insert(existing);
        }

        if let Some(mut item) = revivable {
            item.user_id = user_id;
            item.deleted_flag = false;
            item.quantity = request.quantity;
            item.updated_at = Utc::now();
            self.store.update_item(&item)?;

            tracing::info!(user_id, item_id = %item.id, "revived item");
            return Ok(item);
        }

        let item = Item {
            id: Uuid::new_v4().to_string(),
            name: request.name.clone(),
            user_id,
            category_id: category.id,
            category_name: category.name,
            quantity: request.quantity,
            deleted_flag: false,
            updated_at: Utc::now(),
        };
        self.store.create_item(&item)?;

        tracing::info!(user_id, item_id = %item.id, "created item");
        Ok(item)
    }

    /// Live items of a category, most recently updated first.
    pub fn get_items(&self, user_id: i64, category_name: &str) -> Result<Vec<ItemView>> {
        let category = self.resolve_category(user_id, category_name)?;

        let mut items: Vec<Item> = self
            .store
            .list_category_items_by_owners(&self.visible_owners(user_id), &category.id)?
            .into_iter()
            .filter(|i| !i.deleted_flag)
            .collect();

        if items.is_empty() {
            return Err(Error::ItemsNotRegistered);
        }

        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(items.iter().map(ItemView::from).collect())
    }

    pub fn update_item(&self, user_id: i64, item_id: &str, request: &ItemRequest) -> Result<Item> {
        let items = self
            .store
            .list_items_by_owners_and_category_name(
                &self.visible_owners(user_id),
                &request.category_name,
            )?;

        let mut item = items
            .iter()
            .find(|i| i.id == item_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("item not found".to_string()))?;

        if items
            .iter()
            .any(|i| i.id != item_id && i.name == request.name)
        {
            return Err(name_taken(&request.name));
        }

        item.name = request.name.clone();
        item.quantity = request.quantity;
        item.updated_at = Utc::now();
        self.store.update_item(&item)?;

        tracing::info!(user_id, item_id, "updated item");
        Ok(item)
    }

    pub fn delete_item(&self, user_id: i64, item_id: &str) -> Result<()> {
        let mut item = self
            .store
            .find_item_by_owners_and_id(&self.visible_owners(user_id), item_id)?
            .ok_or_else(|| Error::NotFound("item not found".to_string()))?;

        item.deleted_flag = true;
        item.updated_at = Utc::now();
        self.store.update_item(&item)?;

        tracing::info!(user_id, item_id, "deleted item");
        Ok(())
    }
}
