//! Business rules for categories and items.
//!
//! Both services scope every read to the caller plus the configured system
//! user, whose categories are the shared defaults.

mod category;
mod item;

pub use category::{CategoryService, DEFAULT_CATEGORY_NAMES, MAX_CATEGORIES_PER_USER};
pub use item::ItemService;
