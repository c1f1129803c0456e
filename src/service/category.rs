use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Category, CategoryRequest, CategoryView, Item};

/// Upper bound on live categories a single user may own. Defaults don't count.
pub const MAX_CATEGORIES_PER_USER: usize = 50;

/// Categories seeded for the system user and shared with everyone.
pub const DEFAULT_CATEGORY_NAMES: [&str; 5] = ["Children", "Food", "Electronics", "Books", "Kitchen"];

/// Per-user category rules: uniqueness, capacity, ownership and soft deletion.
pub struct CategoryService {
    store: Arc<dyn Store>,
    system_user_id: i64,
}

impl CategoryService {
    pub fn new(store: Arc<dyn Store>, system_user_id: i64) -> Self {
        Self {
            store,
            system_user_id,
        }
    }

    fn visible_owners(&self, user_id: i64) -> [i64; 2] {
        [user_id, self.system_user_id]
    }

    /// Live categories visible to the user, sorted by name.
    pub fn list_categories(&self, user_id: i64) -> Result<Vec<CategoryView>> {
        let owners = self.visible_owners(user_id);
        let mut categories = self.store.list_categories_by_owners(&owners)?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        categories
            .into_iter()
            .map(|category| -> Result<CategoryView> {
                let items = self
                    .store
                    .list_category_items_by_owners(&owners, &category.id)?;
                Ok(CategoryView {
                    name: category.name,
                    items,
                })
            })
            .collect()
    }

    /// Items of a visible category. An unknown id yields an empty list.
    pub fn get_category_items(&self, user_id: i64, category_id: &str) -> Result<Vec<Item>> {
        let owners = self.visible_owners(user_id);
        let categories = self.store.list_categories_by_owners(&owners)?;

        match categories.iter().find(|c| c.id == category_id) {
            Some(category) => self
                .store
                .list_category_items_by_owners(&owners, &category.id),
            None => Ok(Vec::new()),
        }
    }

    pub fn create_category(&self, request: &CategoryRequest, user_id: i64) -> Result<Category> {
        let categories = self
            .store
            .list_categories_by_owners(&self.visible_owners(user_id))?;

        let owned = categories.iter().filter(|c| c.is_owned_by(user_id)).count();
        if owned >= MAX_CATEGORIES_PER_USER {
            return Err(Error::CapacityExceeded);
        }

        if categories.iter().any(|c| c.name == request.name) {
            return Err(Error::NameConflict(
                "category name already exists".to_string(),
            ));
        }

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: request.name.clone(),
            user_id,
            deleted_flag: false,
        };
        self.store.create_category(&category)?;

        tracing::info!(user_id, category_id = %category.id, "created category");
        Ok(category)
    }

    /// Renames a category the caller owns.
    ///
    /// A shared default category is reported as forbidden rather than missing.
    pub fn update_category(
        &self,
        category_id: &str,
        request: &CategoryRequest,
        user_id: i64,
    ) -> Result<Category> {
        let visible = self
            .store
            .list_categories_by_owners(&self.visible_owners(user_id))?;

        let Some(mut category) = self
            .store
            .find_category_by_owner_and_id(user_id, category_id)?
        else {
            if visible.iter().any(|c| c.id == category_id) {
                return Err(Error::Forbidden(
                    "default category cannot be edited".to_string(),
                ));
            }
            return Err(Error::NotFound("category not found".to_string()));
        };

        if !category.is_owned_by(user_id) {
            return Err(Error::Forbidden(
                "default category cannot be edited".to_string(),
            ));
        }

        if visible
            .iter()
            .any(|c| c.id != category.id && c.name == request.name)
        {
            return Err(Error::NameConflict(
                "category name already exists".to_string(),
            ));
        }

        category.name = request.name.clone();
        self.store.update_category(&category)?;

        tracing::info!(user_id, category_id, "renamed category");
        Ok(category)
    }

    /// Soft-deletes an empty category the caller owns.
    pub fn delete_category(&self, category_id: &str, user_id: i64) -> Result<()> {
        let categories = self
            .store
            .list_categories_by_owners(&self.visible_owners(user_id))?;

        let mut category = categories
            .into_iter()
            .find(|c| c.id == category_id)
            .ok_or_else(|| Error::NotFound("category not found".to_string()))?;

        if !category.is_owned_by(user_id) {
            return Err(Error::Forbidden(
                "default category cannot be deleted".to_string(),
            ));
        }

        // Soft-deleted items still block deletion.
        if !self.store.list_category_items(&category.id)?.is_empty() {
            return Err(Error::CategoryNotEmpty);
        }

        category.deleted_flag = true;
        self.store.update_category(&category)?;

        tracing::info!(user_id, category_id, "deleted category");
        Ok(())
    }

    /// Creates any missing default categories for the system user.
    /// Returns how many were created.
    pub fn seed_default_categories(&self) -> Result<usize> {
        let mut created = 0;

        for name in DEFAULT_CATEGORY_NAMES {
            if self.store.category_exists(self.system_user_id, name)? {
                continue;
            }

            self.store.create_category(&Category {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                user_id: self.system_user_id,
                deleted_flag: false,
            })?;
            created += 1;
        }

        if created > 0 {
            tracing::info!(created, system_user_id = self.system_user_id, "seeded default categories");
        }
        Ok(created)
    }
}
