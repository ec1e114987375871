use std::collections::HashMap;

use anyhow::{bail, Context};
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use rasoi::store::{DocumentStore, PgStore};

#[derive(Default)]
struct SeedStats {
    added: usize,
    updated: usize,
    skipped: usize,
    failed: usize,
}

/// Flatten newlines out of the free-text fields, the way scraped recipe
/// text tends to arrive.
fn clean_record(doc: &mut Value) {
    for key in ["title", "nutritionalBenefits"] {
        if let Some(s) = doc.get(key).and_then(Value::as_str) {
            let cleaned = s.replace('\n', " ").trim().to_string();
            doc[key] = Value::String(cleaned);
        }
    }
    if let Some(steps) = doc.get_mut("steps").and_then(Value::as_array_mut) {
        for step in steps {
            if let Some(s) = step.as_str() {
                *step = Value::String(s.replace('\n', " ").trim().to_string());
            }
        }
    }
}

fn validate_record(doc: &Value) -> Result<(), String> {
    for field in ["title", "day", "mealTime"] {
        if doc
            .get(field)
            .and_then(Value::as_str)
            .map_or(true, str::is_empty)
        {
            return Err(format!("missing required field: {field}"));
        }
    }
    for field in ["ingredients", "steps"] {
        match doc.get(field).and_then(Value::as_array) {
            Some(items) if !items.is_empty() => {}
            _ => return Err(format!("{field} must be a non-empty array")),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "seed_recipes=info,rasoi=info".to_string());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "data/recipes.json".to_string());
    let update_existing = args.any(|a| a == "--update" || a == "--force");

    let raw = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
    let mut records: Vec<Value> =
        serde_json::from_str(&raw).with_context(|| format!("parse {path}"))?;
    info!(count = records.len(), %path, "loaded recipe records");

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;
    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::warn!(error = %e, "migrations folder not found or migration failed; continuing");
    }
    let store = PgStore::new(pool);

    // A record with the same day, meal time and title counts as already
    // uploaded, matching within the input file as well as the store.
    let mut seen: HashMap<(String, String, String), String> = HashMap::new();
    for recipe in store.list_recipes().await? {
        if let Some(id) = recipe.id.clone() {
            seen.insert((recipe.day, recipe.meal_time, recipe.title), id);
        }
    }

    let mut stats = SeedStats::default();
    for doc in &mut records {
        clean_record(doc);
        let title = doc
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("(untitled)")
            .to_string();

        if let Err(reason) = validate_record(doc) {
            error!(%title, %reason, "rejected recipe record");
            stats.failed += 1;
            continue;
        }

        let key = (
            doc["day"].as_str().unwrap_or_default().to_string(),
            doc["mealTime"].as_str().unwrap_or_default().to_string(),
            title.clone(),
        );
        match seen.get(&key) {
            Some(id) if update_existing => {
                store.insert_recipe(id, doc).await?;
                info!(%title, "updated existing recipe");
                stats.updated += 1;
            }
            Some(_) => {
                info!(%title, day = %key.0, meal_time = %key.1, "already uploaded; skipping");
                stats.skipped += 1;
            }
            None => {
                let id = Uuid::new_v4().to_string();
                store.insert_recipe(&id, doc).await?;
                seen.insert(key, id);
                info!(%title, "uploaded recipe");
                stats.added += 1;
            }
        }
    }

    info!(
        total = records.len(),
        added = stats.added,
        updated = stats.updated,
        skipped = stats.skipped,
        failed = stats.failed,
        "seed complete"
    );
    if stats.failed > 0 {
        bail!("{} record(s) failed validation", stats.failed);
    }
    Ok(())
}
