//! Artist database operations

use crate::db::models::{format_created_at, parse_timestamp, Artist, NewArtist};
use crate::db::venues::start_of_day;
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// One artist in the flat listing: id and name only
#[derive(Debug, Clone, Serialize)]
pub struct ArtistName {
    pub id: i64,
    pub name: String,
}

/// One artist in a search result, with its upcoming-show count
#[derive(Debug, Clone, Serialize)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

/// One show by an artist, with the venue display fields joined in
#[derive(Debug, Clone)]
pub struct ArtistShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

/// Create an artist, returning the assigned id
pub async fn create_artist(pool: &SqlitePool, artist: &NewArtist) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO artists (
            name, city, state, phone, genres,
            image_link, facebook_link, website,
            seeking_venue, seeking_description, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&artist.name)
    .bind(&artist.city)
    .bind(&artist.state)
    .bind(&artist.phone)
    .bind(&artist.genres)
    .bind(&artist.image_link)
    .bind(&artist.facebook_link)
    .bind(&artist.website)
    .bind(artist.seeking_venue as i64)
    .bind(&artist.seeking_description)
    .bind(format_created_at(Utc::now().naive_utc()))
    .execute(&mut *tx)
    .await?;

    let id = result.last_insert_rowid();
    tx.commit().await?;

    Ok(id)
}

/// Replace all mutable fields of an existing artist
pub async fn update_artist(pool: &SqlitePool, id: i64, artist: &NewArtist) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE artists SET
            name = ?, city = ?, state = ?, phone = ?, genres = ?,
            image_link = ?, facebook_link = ?, website = ?,
            seeking_venue = ?, seeking_description = ?
        WHERE id = ?
        "#,
    )
    .bind(&artist.name)
    .bind(&artist.city)
    .bind(&artist.state)
    .bind(&artist.phone)
    .bind(&artist.genres)
    .bind(&artist.image_link)
    .bind(&artist.facebook_link)
    .bind(&artist.website)
    .bind(artist.seeking_venue as i64)
    .bind(&artist.seeking_description)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Artist {} not found", id)));
    }

    tx.commit().await?;
    Ok(())
}

/// Delete an artist (shows cascade via the schema's foreign key)
pub async fn delete_artist(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM artists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Artist {} not found", id)));
    }

    Ok(())
}

/// Load an artist by id
pub async fn get_artist(pool: &SqlitePool, id: i64) -> Result<Option<Artist>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, city, state, phone, genres,
               image_link, facebook_link, website,
               seeking_venue, seeking_description, created_at
        FROM artists
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(artist_from_row(&row)?)),
        None => Ok(None),
    }
}

/// True when an artist with this id exists
pub async fn artist_exists(pool: &SqlitePool, id: i64) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artists WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// All artists projected to {id, name}, ordered by id
pub async fn list_names(pool: &SqlitePool) -> Result<Vec<ArtistName>> {
    let rows = sqlx::query("SELECT id, name FROM artists ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| ArtistName {
            id: row.get("id"),
            name: row.get("name"),
        })
        .collect())
}

/// Case-insensitive substring search over artist names, with upcoming-show
/// counts (zero-show artists included via the outer join)
pub async fn search_artists(
    pool: &SqlitePool,
    search_term: &str,
    today: NaiveDate,
) -> Result<Vec<ArtistSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.name, COUNT(s.id) AS num_upcoming_shows
        FROM artists a
        LEFT JOIN shows s ON s.artist_id = a.id AND s.start_time > ?
        WHERE a.name LIKE '%' || ? || '%' COLLATE NOCASE
        GROUP BY a.id
        ORDER BY a.id
        "#,
    )
    .bind(start_of_day(today))
    .bind(search_term)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| ArtistSummary {
            id: row.get("id"),
            name: row.get("name"),
            num_upcoming_shows: row.get("num_upcoming_shows"),
        })
        .collect())
}

/// All shows by an artist with venue display fields, ordered by start time
pub async fn shows_for_artist(pool: &SqlitePool, artist_id: i64) -> Result<Vec<ArtistShow>> {
    let rows = sqlx::query(
        r#"
        SELECT s.venue_id, v.name AS venue_name, v.image_link AS venue_image_link,
               s.start_time
        FROM shows s
        JOIN venues v ON v.id = s.venue_id
        WHERE s.artist_id = ?
        ORDER BY s.start_time
        "#,
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let start_time: String = row.get("start_time");
            Ok(ArtistShow {
                venue_id: row.get("venue_id"),
                venue_name: row.get("venue_name"),
                venue_image_link: row.get("venue_image_link"),
                start_time: parse_timestamp(&start_time)?,
            })
        })
        .collect()
}

fn artist_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Artist> {
    let seeking_venue: i64 = row.get("seeking_venue");
    let created_at: String = row.get("created_at");

    Ok(Artist {
        id: row.get("id"),
        name: row.get("name"),
        city: row.get("city"),
        state: row.get("state"),
        phone: row.get("phone"),
        genres: row.get("genres"),
        image_link: row.get("image_link"),
        facebook_link: row.get("facebook_link"),
        website: row.get("website"),
        seeking_venue: seeking_venue != 0,
        seeking_description: row.get("seeking_description"),
        created_at: parse_timestamp(&created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_in_memory;

    fn sample_artist(name: &str, fb: Option<&str>) -> NewArtist {
        NewArtist {
            name: name.to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            genres: "Rock n Roll".to_string(),
            facebook_link: fb.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let pool = init_in_memory().await.expect("schema");

        let id = create_artist(&pool, &sample_artist("Guns N Petals", None))
            .await
            .expect("create");

        let artist = get_artist(&pool, id).await.expect("get").expect("exists");
        assert_eq!(artist.name, "Guns N Petals");
        assert!(!artist.seeking_venue);
    }

    #[tokio::test]
    async fn list_names_is_id_ordered() {
        let pool = init_in_memory().await.expect("schema");
        create_artist(&pool, &sample_artist("B", None)).await.unwrap();
        create_artist(&pool, &sample_artist("A", None)).await.unwrap();

        let names = list_names(&pool).await.unwrap();
        assert_eq!(names.len(), 2);
        assert!(names[0].id < names[1].id);
        assert_eq!(names[0].name, "B");
    }

    #[tokio::test]
    async fn duplicate_facebook_link_is_classified() {
        let pool = init_in_memory().await.expect("schema");
        create_artist(&pool, &sample_artist("A", Some("https://fb.com/a")))
            .await
            .unwrap();

        let err = create_artist(&pool, &sample_artist("B", Some("https://fb.com/a")))
            .await
            .expect_err("duplicate should fail");
        assert!(err.is_duplicate_link());
    }
}
