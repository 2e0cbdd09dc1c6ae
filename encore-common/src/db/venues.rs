//! Venue database operations
//!
//! Listing and search both count upcoming shows through an outer join, so
//! venues with no shows still appear with a count of zero.

use crate::db::models::{format_created_at, parse_timestamp, NewVenue, Venue};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// One venue in a listing or search result, with its upcoming-show count
#[derive(Debug, Clone, Serialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

/// Listing row before grouping: summary plus the grouping key fields
#[derive(Debug, Clone)]
pub struct VenueListRow {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub num_upcoming_shows: i64,
}

/// One (state, city) group in the venues listing
#[derive(Debug, Clone, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// One show at a venue, with the artist display fields joined in
#[derive(Debug, Clone)]
pub struct VenueShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

/// Create a venue, returning the assigned id
pub async fn create_venue(pool: &SqlitePool, venue: &NewVenue) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO venues (
            name, city, state, address, phone, genres,
            image_link, facebook_link, website,
            seeking_talent, seeking_description, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&venue.name)
    .bind(&venue.city)
    .bind(&venue.state)
    .bind(&venue.address)
    .bind(&venue.phone)
    .bind(&venue.genres)
    .bind(&venue.image_link)
    .bind(&venue.facebook_link)
    .bind(&venue.website)
    .bind(venue.seeking_talent as i64)
    .bind(&venue.seeking_description)
    .bind(format_created_at(Utc::now().naive_utc()))
    .execute(&mut *tx)
    .await?;

    let id = result.last_insert_rowid();
    tx.commit().await?;

    Ok(id)
}

/// Replace all mutable fields of an existing venue.
/// `id` and `created_at` are left untouched.
pub async fn update_venue(pool: &SqlitePool, id: i64, venue: &NewVenue) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE venues SET
            name = ?, city = ?, state = ?, address = ?, phone = ?, genres = ?,
            image_link = ?, facebook_link = ?, website = ?,
            seeking_talent = ?, seeking_description = ?
        WHERE id = ?
        "#,
    )
    .bind(&venue.name)
    .bind(&venue.city)
    .bind(&venue.state)
    .bind(&venue.address)
    .bind(&venue.phone)
    .bind(&venue.genres)
    .bind(&venue.image_link)
    .bind(&venue.facebook_link)
    .bind(&venue.website)
    .bind(venue.seeking_talent as i64)
    .bind(&venue.seeking_description)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Venue {} not found", id)));
    }

    tx.commit().await?;
    Ok(())
}

/// Delete a venue (shows cascade via the schema's foreign key)
pub async fn delete_venue(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM venues WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Venue {} not found", id)));
    }

    Ok(())
}

/// Load a venue by id
pub async fn get_venue(pool: &SqlitePool, id: i64) -> Result<Option<Venue>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, city, state, address, phone, genres,
               image_link, facebook_link, website,
               seeking_talent, seeking_description, created_at
        FROM venues
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(venue_from_row(&row)?)),
        None => Ok(None),
    }
}

/// True when a venue with this id exists
pub async fn venue_exists(pool: &SqlitePool, id: i64) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM venues WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// All venues with their upcoming-show counts, ordered by id.
///
/// "Upcoming" means `start_time` strictly after the start of `today`, so
/// a show later today still counts.
pub async fn list_with_upcoming_counts(
    pool: &SqlitePool,
    today: NaiveDate,
) -> Result<Vec<VenueListRow>> {
    let rows = sqlx::query(
        r#"
        SELECT v.id, v.name, v.city, v.state, COUNT(s.id) AS num_upcoming_shows
        FROM venues v
        LEFT JOIN shows s ON s.venue_id = v.id AND s.start_time > ?
        GROUP BY v.id
        ORDER BY v.id
        "#,
    )
    .bind(start_of_day(today))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| VenueListRow {
            id: row.get("id"),
            name: row.get("name"),
            city: row.get("city"),
            state: row.get("state"),
            num_upcoming_shows: row.get("num_upcoming_shows"),
        })
        .collect())
}

/// Case-insensitive substring search over venue names, with upcoming-show
/// counts (zero-show venues included via the outer join)
pub async fn search_venues(
    pool: &SqlitePool,
    search_term: &str,
    today: NaiveDate,
) -> Result<Vec<VenueSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT v.id, v.name, COUNT(s.id) AS num_upcoming_shows
        FROM venues v
        LEFT JOIN shows s ON s.venue_id = v.id AND s.start_time > ?
        WHERE v.name LIKE '%' || ? || '%' COLLATE NOCASE
        GROUP BY v.id
        ORDER BY v.id
        "#,
    )
    .bind(start_of_day(today))
    .bind(search_term)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| VenueSummary {
            id: row.get("id"),
            name: row.get("name"),
            num_upcoming_shows: row.get("num_upcoming_shows"),
        })
        .collect())
}

/// Group listing rows by (state, city).
///
/// Group order is the insertion order of each key's first occurrence, so
/// with the id-ordered input this is deterministic.
pub fn group_by_city_state(rows: Vec<VenueListRow>) -> Vec<Area> {
    let mut areas: Vec<Area> = Vec::new();

    for row in rows {
        let summary = VenueSummary {
            id: row.id,
            name: row.name,
            num_upcoming_shows: row.num_upcoming_shows,
        };

        match areas
            .iter_mut()
            .find(|a| a.state == row.state && a.city == row.city)
        {
            Some(area) => area.venues.push(summary),
            None => areas.push(Area {
                city: row.city,
                state: row.state,
                venues: vec![summary],
            }),
        }
    }

    areas
}

/// All shows at a venue with artist display fields, ordered by start time
pub async fn shows_for_venue(pool: &SqlitePool, venue_id: i64) -> Result<Vec<VenueShow>> {
    let rows = sqlx::query(
        r#"
        SELECT s.artist_id, a.name AS artist_name, a.image_link AS artist_image_link,
               s.start_time
        FROM shows s
        JOIN artists a ON a.id = s.artist_id
        WHERE s.venue_id = ?
        ORDER BY s.start_time
        "#,
    )
    .bind(venue_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let start_time: String = row.get("start_time");
            Ok(VenueShow {
                artist_id: row.get("artist_id"),
                artist_name: row.get("artist_name"),
                artist_image_link: row.get("artist_image_link"),
                start_time: parse_timestamp(&start_time)?,
            })
        })
        .collect()
}

fn venue_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Venue> {
    let seeking_talent: i64 = row.get("seeking_talent");
    let created_at: String = row.get("created_at");

    Ok(Venue {
        id: row.get("id"),
        name: row.get("name"),
        city: row.get("city"),
        state: row.get("state"),
        address: row.get("address"),
        phone: row.get("phone"),
        genres: row.get("genres"),
        image_link: row.get("image_link"),
        facebook_link: row.get("facebook_link"),
        website: row.get("website"),
        seeking_talent: seeking_talent != 0,
        seeking_description: row.get("seeking_description"),
        created_at: parse_timestamp(&created_at)?,
    })
}

pub(crate) fn start_of_day(today: NaiveDate) -> String {
    format!("{} 00:00:00", today.format("%Y-%m-%d"))
}
