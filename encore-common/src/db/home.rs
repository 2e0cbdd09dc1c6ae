//! Landing-page aggregation: recently added artists and venues
//!
//! The merge deliberately mixes two orderings: each type contributes its
//! ten most recently created records, but the merged list is re-sorted by
//! id descending before truncation. When creation order and id order
//! diverge the result is non-monotonic in creation time. That is the
//! documented behavior and is preserved exactly.

use crate::db::models::parse_timestamp;
use crate::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// One entry on the landing page, tagged with its entity type
#[derive(Debug, Clone, Serialize)]
pub struct LatestEntry {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id: i64,
    pub name: String,
    #[serde(skip)]
    pub created_at: NaiveDateTime,
}

/// Ten most recently created artists (id descending breaks created_at ties)
pub async fn recent_artists(pool: &SqlitePool) -> Result<Vec<LatestEntry>> {
    recent_entries(pool, "artists", "artist").await
}

/// Ten most recently created venues
pub async fn recent_venues(pool: &SqlitePool) -> Result<Vec<LatestEntry>> {
    recent_entries(pool, "venues", "venue").await
}

async fn recent_entries(
    pool: &SqlitePool,
    table: &str,
    entity_type: &str,
) -> Result<Vec<LatestEntry>> {
    // table name is a compile-time constant, never user input
    let sql = format!(
        "SELECT id, name, created_at FROM {} ORDER BY created_at DESC, id DESC LIMIT 10",
        table
    );

    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    rows.iter()
        .map(|row| {
            let created_at: String = row.get("created_at");
            Ok(LatestEntry {
                entity_type: entity_type.to_string(),
                id: row.get("id"),
                name: row.get("name"),
                created_at: parse_timestamp(&created_at)?,
            })
        })
        .collect()
}

/// Merge the per-type recents into the landing list: venues first, then
/// artists, stable-sorted by id descending, truncated to ten.
pub fn merge_latest(venues: Vec<LatestEntry>, artists: Vec<LatestEntry>) -> Vec<LatestEntry> {
    let mut merged = venues;
    merged.extend(artists);
    // stable sort keeps venues ahead of artists on id ties
    merged.sort_by(|a, b| b.id.cmp(&a.id));
    merged.truncate(10);
    merged
}
