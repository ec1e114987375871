use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use axum::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::recipes::dto::Recipe;

/// Document-store seam. Recipes are always read as the full collection and
/// filtered in memory by the caller; user documents are whole-document
/// reads and replaces keyed by uid.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_recipes(&self) -> anyhow::Result<Vec<Recipe>>;
    async fn insert_recipe(&self, id: &str, doc: &Value) -> anyhow::Result<()>;
    async fn get_user(&self, uid: &str) -> anyhow::Result<Option<Value>>;
    async fn put_user(&self, uid: &str, doc: &Value) -> anyhow::Result<()>;
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn list_recipes(&self) -> anyhow::Result<Vec<Recipe>> {
        // Order makes "first match" deterministic across calls.
        let rows = sqlx::query_as::<_, (String, Value)>(
            r#"SELECT id, doc FROM recipes ORDER BY created_at, id"#,
        )
        .fetch_all(&self.pool)
        .await
        .context("list recipes")?;

        let mut recipes = Vec::with_capacity(rows.len());
        for (id, doc) in rows {
            let mut recipe: Recipe = serde_json::from_value(doc).context("decode recipe doc")?;
            recipe.id = Some(id);
            recipes.push(recipe);
        }
        Ok(recipes)
    }

    async fn insert_recipe(&self, id: &str, doc: &Value) -> anyhow::Result<()> {
        sqlx::query(
            r#"INSERT INTO recipes (id, doc) VALUES ($1, $2)
               ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc"#,
        )
        .bind(id)
        .bind(doc)
        .execute(&self.pool)
        .await
        .context("insert recipe")?;
        Ok(())
    }

    async fn get_user(&self, uid: &str) -> anyhow::Result<Option<Value>> {
        let row = sqlx::query_as::<_, (Value,)>(r#"SELECT doc FROM users WHERE uid = $1"#)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await
            .context("get user")?;
        Ok(row.map(|(doc,)| doc))
    }

    async fn put_user(&self, uid: &str, doc: &Value) -> anyhow::Result<()> {
        sqlx::query(
            r#"INSERT INTO users (uid, doc) VALUES ($1, $2)
               ON CONFLICT (uid) DO UPDATE SET doc = EXCLUDED.doc, updated_at = now()"#,
        )
        .bind(uid)
        .bind(doc)
        .execute(&self.pool)
        .await
        .context("put user")?;
        Ok(())
    }
}

/// In-memory store for `AppState::fake()` and tests. Counts collection
/// scans so memoization behavior can be asserted.
#[derive(Default)]
pub struct MemoryStore {
    recipes: RwLock<Vec<(String, Value)>>,
    users: RwLock<HashMap<String, Value>>,
    recipe_scans: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recipe_scans(&self) -> u64 {
        self.recipe_scans.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_recipes(&self) -> anyhow::Result<Vec<Recipe>> {
        self.recipe_scans.fetch_add(1, Ordering::Relaxed);
        let rows = self.recipes.read().await;
        let mut recipes = Vec::with_capacity(rows.len());
        for (id, doc) in rows.iter() {
            let mut recipe: Recipe =
                serde_json::from_value(doc.clone()).context("decode recipe doc")?;
            recipe.id = Some(id.clone());
            recipes.push(recipe);
        }
        Ok(recipes)
    }

    async fn insert_recipe(&self, id: &str, doc: &Value) -> anyhow::Result<()> {
        let mut rows = self.recipes.write().await;
        if let Some(row) = rows.iter_mut().find(|row| row.0 == id) {
            row.1 = doc.clone();
        } else {
            rows.push((id.to_string(), doc.clone()));
        }
        Ok(())
    }

    async fn get_user(&self, uid: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.users.read().await.get(uid).cloned())
    }

    async fn put_user(&self, uid: &str, doc: &Value) -> anyhow::Result<()> {
        self.users
            .write()
            .await
            .insert(uid.to_string(), doc.clone());
        Ok(())
    }
}
