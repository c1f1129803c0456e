use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const CATEGORY_COLUMNS: &str = "id, name, user_id, deleted_flag";

const ITEM_SELECT: &str = "SELECT i.id, i.name, i.user_id, i.category_id, c.name, i.quantity, i.deleted_flag, i.updated_at
     FROM items i JOIN categories c ON c.id = i.category_id";

const TOKEN_COLUMNS: &str =
    "id, token_hash, token_lookup, user_id, created_at, expires_at, last_used_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database. Mostly useful in tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Comma-separated positional placeholders for an `IN (...)` list.
fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn owner_args(owner_ids: &[i64]) -> Vec<&dyn ToSql> {
    owner_ids.iter().map(|id| id as &dyn ToSql).collect()
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        user_id: row.get(2)?,
        deleted_flag: row.get(3)?,
    })
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        user_id: row.get(2)?,
        category_id: row.get(3)?,
        category_name: row.get(4)?,
        quantity: row.get(5)?,
        deleted_flag: row.get(6)?,
        updated_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

fn token_from_row(row: &Row<'_>) -> rusqlite::Result<Token> {
    Ok(Token {
        id: row.get(0)?,
        token_hash: row.get(1)?,
        token_lookup: row.get(2)?,
        user_id: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        expires_at: row
            .get::<_, Option<String>>(5)?
            .map(|s| parse_datetime(&s)),
        last_used_at: row
            .get::<_, Option<String>>(6)?
            .map(|s| parse_datetime(&s)),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Category operations

    fn create_category(&self, category: &Category) -> Result<()> {
        self.conn().execute(
            "INSERT INTO categories (id, name, user_id, deleted_flag, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                category.id,
                category.name,
                category.user_id,
                category.deleted_flag,
                format_datetime(&Utc::now()),
            ],
        )?;
        Ok(())
    }

    fn list_categories_by_owners(&self, owner_ids: &[i64]) -> Result<Vec<Category>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories
             WHERE user_id IN ({}) AND deleted_flag = 0 ORDER BY rowid",
            placeholders(owner_ids.len())
        ))?;

        let rows = stmt.query_map(owner_args(owner_ids).as_slice(), category_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn find_category_by_owner_and_id(&self, owner_id: i64, id: &str) -> Result<Option<Category>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {CATEGORY_COLUMNS} FROM categories
                 WHERE user_id = ?1 AND id = ?2 AND deleted_flag = 0"
            ),
            params![owner_id, id],
            category_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn find_categories_by_owners_and_name(
        &self,
        owner_ids: &[i64],
        name: &str,
    ) -> Result<Vec<Category>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories
             WHERE user_id IN ({}) AND name = ? ORDER BY rowid",
            placeholders(owner_ids.len())
        ))?;

        let mut args = owner_args(owner_ids);
        args.push(&name);
        let rows = stmt.query_map(args.as_slice(), category_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn category_exists(&self, owner_id: i64, name: &str) -> Result<bool> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE user_id = ?1 AND name = ?2",
            params![owner_id, name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn update_category(&self, category: &Category) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE categories SET name = ?1, deleted_flag = ?2 WHERE id = ?3",
            params![category.name, category.deleted_flag, category.id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound("category not found".to_string()));
        }
        Ok(())
    }

    // Item operations

    fn list_category_items(&self, category_id: &str) -> Result<Vec<Item>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{ITEM_SELECT} WHERE i.category_id = ?1 ORDER BY i.rowid"
        ))?;

        let rows = stmt.query_map(params![category_id], item_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_category_items_by_owners(
        &self,
        owner_ids: &[i64],
        category_id: &str,
    ) -> Result<Vec<Item>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{ITEM_SELECT} WHERE i.user_id IN ({}) AND i.category_id = ? ORDER BY i.rowid",
            placeholders(owner_ids.len())
        ))?;

        let mut args = owner_args(owner_ids);
        args.push(&category_id);
        let rows = stmt.query_map(args.as_slice(), item_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn create_item(&self, item: &Item) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let parent_deleted: Option<bool> = tx
            .query_row(
                "SELECT deleted_flag FROM categories WHERE id = ?1",
                params![item.category_id],
                |row| row.get(0),
            )
            .optional()?;

        if parent_deleted != Some(false) {
            return Err(Error::NotFound("category not found".to_string()));
        }

        tx.execute(
            "INSERT INTO items (id, name, user_id, category_id, quantity, deleted_flag, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                item.id,
                item.name,
                item.user_id,
                item.category_id,
                item.quantity,
                item.deleted_flag,
                format_datetime(&item.updated_at),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn update_item(&self, item: &Item) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE items SET name = ?1, user_id = ?2, quantity = ?3, deleted_flag = ?4,
                 updated_at = ?5
             WHERE id = ?6",
            params![
                item.name,
                item.user_id,
                item.quantity,
                item.deleted_flag,
                format_datetime(&item.updated_at),
                item.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound("item not found".to_string()));
        }
        Ok(())
    }

    fn list_items_by_owners_and_category_name(
        &self,
        owner_ids: &[i64],
        category_name: &str,
    ) -> Result<Vec<Item>> {
        let conn = self.conn();
        let owners = placeholders(owner_ids.len());
        let mut stmt = conn.prepare(&format!(
            "{ITEM_SELECT}
             WHERE i.user_id IN ({owners}) AND c.user_id IN ({owners})
               AND c.name = ? AND i.deleted_flag = 0 AND c.deleted_flag = 0
             ORDER BY i.rowid"
        ))?;

        let mut args = owner_args(owner_ids);
        args.extend(owner_args(owner_ids));
        args.push(&category_name);
        let rows = stmt.query_map(args.as_slice(), item_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn find_item_by_owners_and_id(&self, owner_ids: &[i64], id: &str) -> Result<Option<Item>> {
        let conn = self.conn();
        let mut args = owner_args(owner_ids);
        args.push(&id);

        conn.query_row(
            &format!(
                "{ITEM_SELECT} WHERE i.user_id IN ({}) AND i.id = ? AND i.deleted_flag = 0",
                placeholders(owner_ids.len())
            ),
            args.as_slice(),
            item_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    // Token operations

    fn create_token(&self, token: &Token) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO tokens (id, token_hash, token_lookup, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                token.id,
                token.token_hash,
                token.token_lookup,
                token.user_id,
                format_datetime(&token.created_at),
                token.expires_at.as_ref().map(format_datetime),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::TokenLookupCollision)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {TOKEN_COLUMNS} FROM tokens WHERE token_lookup = ?1"),
            params![lookup],
            token_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_user_tokens(&self, user_id: i64) -> Result<Vec<Token>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TOKEN_COLUMNS} FROM tokens WHERE user_id = ?1 ORDER BY created_at"
        ))?;

        let rows = stmt.query_map(params![user_id], token_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_token(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM tokens WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn update_token_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE tokens SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }
}
