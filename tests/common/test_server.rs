use std::sync::Arc;

use reqwest::{Client, RequestBuilder};
use tempfile::TempDir;

use stockroom::auth::TokenGenerator;
use stockroom::server::{AppState, create_router};
use stockroom::store::{SqliteStore, Store};

pub const SYSTEM_USER_ID: i64 = 999;

/// An in-process server bound to an ephemeral port, backed by a throwaway database.
pub struct TestServer {
    pub temp_dir: TempDir,
    pub base_url: String,
    pub store: Arc<SqliteStore>,
    client: Client,
}

impl TestServer {
    pub async fn start() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = Arc::new(
            SqliteStore::new(temp_dir.path().join("stockroom.db")).expect("open store"),
        );
        store.initialize().expect("initialize store");

        let state = Arc::new(AppState::new(store.clone(), SYSTEM_USER_ID));
        state
            .categories
            .seed_default_categories()
            .expect("seed defaults");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("local addr").port();

        tokio::spawn(async move {
            axum::serve(listener, create_router(state))
                .await
                .expect("serve");
        });

        Self {
            temp_dir,
            base_url: format!("http://127.0.0.1:{port}"),
            store,
            client: Client::new(),
        }
    }

    /// Issues a bearer token for `user_id` directly through the store.
    pub fn token_for(&self, user_id: i64) -> String {
        let (token, raw) = TokenGenerator::new()
            .issue(user_id, None)
            .expect("issue token");
        self.store.create_token(&token).expect("store token");
        raw
    }

    pub fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(token)
    }

    pub fn post(&self, path: &str, token: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(token)
    }

    pub fn put(&self, path: &str, token: &str) -> RequestBuilder {
        self.client
            .put(format!("{}{path}", self.base_url))
            .bearer_auth(token)
    }

    pub fn delete(&self, path: &str, token: &str) -> RequestBuilder {
        self.client
            .delete(format!("{}{path}", self.base_url))
            .bearer_auth(token)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
