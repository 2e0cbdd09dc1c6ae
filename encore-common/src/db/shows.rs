//! Show database operations
//!
//! Shows have no update or delete path; they exist from creation until
//! their venue or artist is deleted (cascade).

use crate::db::models::{format_start_time, parse_timestamp, NewShow};
use crate::Result;
use chrono::NaiveDateTime;
use sqlx::{Row, SqlitePool};

/// One show with the denormalized display fields for both endpoints
#[derive(Debug, Clone)]
pub struct ShowDetails {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

/// Create a show, returning the assigned id.
///
/// The caller is expected to have resolved artist_id and venue_id already
/// (the referential pre-check lives in the submission handler); the
/// foreign keys are a backstop, not the user-facing error path.
pub async fn create_show(pool: &SqlitePool, show: &NewShow) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO shows (artist_id, venue_id, start_time) VALUES (?, ?, ?)",
    )
    .bind(show.artist_id)
    .bind(show.venue_id)
    .bind(format_start_time(show.start_time))
    .execute(&mut *tx)
    .await?;

    let id = result.last_insert_rowid();
    tx.commit().await?;

    Ok(id)
}

/// All shows with artist and venue display fields, in storage order
pub async fn list_shows(pool: &SqlitePool) -> Result<Vec<ShowDetails>> {
    let rows = sqlx::query(
        r#"
        SELECT s.venue_id, v.name AS venue_name,
               s.artist_id, a.name AS artist_name, a.image_link AS artist_image_link,
               s.start_time
        FROM shows s
        JOIN artists a ON a.id = s.artist_id
        JOIN venues v ON v.id = s.venue_id
        ORDER BY s.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(show_details_from_row).collect()
}

/// Shows whose artist name OR venue name contains the search term
/// (case-insensitive substring)
pub async fn search_shows(pool: &SqlitePool, search_term: &str) -> Result<Vec<ShowDetails>> {
    let rows = sqlx::query(
        r#"
        SELECT s.venue_id, v.name AS venue_name,
               s.artist_id, a.name AS artist_name, a.image_link AS artist_image_link,
               s.start_time
        FROM shows s
        JOIN artists a ON a.id = s.artist_id
        JOIN venues v ON v.id = s.venue_id
        WHERE a.name LIKE '%' || ?1 || '%' COLLATE NOCASE
           OR v.name LIKE '%' || ?1 || '%' COLLATE NOCASE
        ORDER BY s.id
        "#,
    )
    .bind(search_term)
    .fetch_all(pool)
    .await?;

    rows.iter().map(show_details_from_row).collect()
}

/// Total number of shows (used by tests and the delete protocol's
/// zero-mutation assertions)
pub async fn count_shows(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

fn show_details_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ShowDetails> {
    let start_time: String = row.get("start_time");
    Ok(ShowDetails {
        venue_id: row.get("venue_id"),
        venue_name: row.get("venue_name"),
        artist_id: row.get("artist_id"),
        artist_name: row.get("artist_name"),
        artist_image_link: row.get("artist_image_link"),
        start_time: parse_timestamp(&start_time)?,
    })
}
