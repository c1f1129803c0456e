use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};

use super::{categories, items};
use crate::service::{CategoryService, ItemService};
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub categories: CategoryService,
    pub items: ItemService,
}

impl AppState {
    /// Wires both rule engines to the store, scoped by `system_user_id`.
    pub fn new(store: Arc<dyn Store>, system_user_id: i64) -> Self {
        Self {
            categories: CategoryService::new(store.clone(), system_user_id),
            items: ItemService::new(store.clone(), system_user_id),
            store,
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/category",
            get(categories::list_categories)
                .post(categories::create_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/category/items", get(categories::list_category_items))
        .route(
            "/item",
            get(items::list_items)
                .post(items::create_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
