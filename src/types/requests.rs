/// Validated input for creating or renaming a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRequest {
    pub name: String,
}

/// Validated input for creating or updating an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequest {
    pub name: String,
    pub quantity: i64,
    pub category_name: String,
}
