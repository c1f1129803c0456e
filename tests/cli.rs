//! CLI integration tests for stockroom admin commands.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::Path;

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;
use serde_json::Value;
use stockroom::store::{SqliteStore, Store};

const SYSTEM_USER_ID: &str = "999";

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    fn data_dir_str(&self) -> String {
        self.data_dir().to_string_lossy().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("stockroom").expect("failed to find binary");
        cmd.env("NO_COLOR", "1")
            .env_remove("STOCKROOM_SYSTEM_USER_ID");
        cmd
    }

    fn init(&self) -> assert_cmd::assert::Assert {
        self.cmd()
            .args([
                "admin",
                "init",
                "--data-dir",
                &self.data_dir_str(),
                "--system-user-id",
                SYSTEM_USER_ID,
                "--non-interactive",
            ])
            .assert()
    }

    fn create_token(&self, user_id: &str) -> assert_cmd::assert::Assert {
        self.cmd()
            .args([
                "admin",
                "token",
                "create",
                "--data-dir",
                &self.data_dir_str(),
                "--user-id",
                user_id,
                "--system-user-id",
                SYSTEM_USER_ID,
            ])
            .assert()
    }

    fn list_tokens_json(&self, user_id: &str) -> Value {
        let output = self
            .cmd()
            .args([
                "admin",
                "token",
                "list",
                "--data-dir",
                &self.data_dir_str(),
                "--user-id",
                user_id,
                "--json",
            ])
            .output()
            .expect("failed to run token list");
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).expect("failed to parse token list")
    }

    fn store(&self) -> SqliteStore {
        SqliteStore::new(self.data_dir().join("stockroom.db")).expect("failed to open store")
    }
}

#[test]
fn test_init_creates_database_and_defaults() {
    let ctx = TestContext::new();

    ctx.init()
        .success()
        .stdout(predicate::str::contains("Initialized"))
        .stdout(predicate::str::contains("5 default categories created"));

    assert!(ctx.data_dir().join("stockroom.db").exists());

    let categories = ctx
        .store()
        .list_categories_by_owners(&[999])
        .expect("failed to list categories");
    assert_eq!(categories.len(), 5);
}

#[test]
fn test_init_is_idempotent() {
    let ctx = TestContext::new();

    ctx.init().success();
    ctx.init()
        .success()
        .stdout(predicate::str::contains("0 default categories created"));

    let categories = ctx.store().list_categories_by_owners(&[999]).unwrap();
    assert_eq!(categories.len(), 5);
}

#[test]
fn test_init_requires_system_user_id() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args([
            "admin",
            "init",
            "--data-dir",
            &ctx.data_dir_str(),
            "--non-interactive",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--system-user-id"));
}

#[test]
fn test_token_commands_require_init() {
    let ctx = TestContext::new();

    ctx.create_token("111")
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_token_create_and_list() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.create_token("111")
        .success()
        .stdout(predicate::str::contains("stockroom_"))
        .stdout(predicate::str::contains("Token for user 111"));

    let tokens = ctx.list_tokens_json("111");
    let tokens = tokens.as_array().expect("token list is an array");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0]["user_id"], 111);
    assert!(tokens[0].get("token_hash").is_none());

    let others = ctx.list_tokens_json("222");
    assert!(others.as_array().unwrap().is_empty());
}

#[test]
fn test_token_create_rejects_system_user() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.create_token(SYSTEM_USER_ID)
        .failure()
        .stderr(predicate::str::contains("Cannot issue a token for the system user"));

    assert!(ctx.list_tokens_json(SYSTEM_USER_ID).as_array().unwrap().is_empty());
}

#[test]
fn test_token_create_rejects_non_positive_expiry() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.cmd()
        .args([
            "admin",
            "token",
            "create",
            "--data-dir",
            &ctx.data_dir_str(),
            "--user-id",
            "111",
            "--system-user-id",
            SYSTEM_USER_ID,
            "--expires-in-days",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be positive"));
}

#[test]
fn test_token_revoke() {
    let ctx = TestContext::new();
    ctx.init().success();
    ctx.create_token("111").success();

    let tokens = ctx.list_tokens_json("111");
    let id = tokens[0]["id"].as_str().unwrap().to_string();

    ctx.cmd()
        .args([
            "admin",
            "token",
            "revoke",
            "--data-dir",
            &ctx.data_dir_str(),
            "--id",
            &id,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Revoked"));

    assert!(ctx.list_tokens_json("111").as_array().unwrap().is_empty());

    ctx.cmd()
        .args([
            "admin",
            "token",
            "revoke",
            "--data-dir",
            &ctx.data_dir_str(),
            "--id",
            &id,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Token not found"));
}

#[test]
fn test_serve_requires_system_user_id() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.cmd()
        .args(["serve", "--data-dir", &ctx.data_dir_str(), "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("system user id"));
}

#[test]
fn test_serve_requires_init() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args([
            "serve",
            "--data-dir",
            &ctx.data_dir_str(),
            "--system-user-id",
            SYSTEM_USER_ID,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}
