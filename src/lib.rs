//! # Stockroom
//!
//! A multi-tenant inventory catalog: users keep items in categories, and a
//! configured system user owns a set of default categories shared with all.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! stockroom = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockroom::server::{AppState, create_router};
//! use stockroom::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/stockroom.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), 999));
//! state.categories.seed_default_categories().unwrap();
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `stockroom` binary. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod service;
pub mod store;
pub mod types;
