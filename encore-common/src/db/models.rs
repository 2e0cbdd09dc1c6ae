//! Typed models for venues, artists, and shows
//!
//! Genres are persisted as one comma-joined string (the original schema's
//! encoding). Timestamps are persisted as TEXT in formats that compare
//! correctly as strings, so SQL `ORDER BY` and range predicates work
//! without a date type.

use crate::{Error, Result};
use chrono::NaiveDateTime;

/// Venue record
#[derive(Debug, Clone)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: String,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Artist record
#[derive(Debug, Clone)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: String,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Show record: one scheduled performance linking an artist to a venue
#[derive(Debug, Clone)]
pub struct Show {
    pub id: i64,
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: NaiveDateTime,
}

/// Mutable venue fields, populated from a create or edit submission.
/// `id` and `created_at` are never part of this set.
#[derive(Debug, Clone, Default)]
pub struct NewVenue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: String,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Mutable artist fields (see [`NewVenue`])
#[derive(Debug, Clone, Default)]
pub struct NewArtist {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: String,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// Fields for a new show
#[derive(Debug, Clone)]
pub struct NewShow {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: NaiveDateTime,
}

/// Join a multi-select genre list into the stored encoding.
///
/// A comma inside a genre name is not escaped, so it cannot be
/// distinguished from the separator on the way back out. Inherited
/// limitation of the stored format.
pub fn join_genres(genres: &[String]) -> String {
    genres.join(",")
}

/// Split the stored genre string back into a list
pub fn split_genres(genres: &str) -> Vec<String> {
    genres
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Storage format for `created_at`: microsecond precision keeps recency
/// ordering total in practice
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Storage format for `start_time`
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp for the `created_at` column
pub fn format_created_at(ts: NaiveDateTime) -> String {
    ts.format(CREATED_AT_FORMAT).to_string()
}

/// Format a timestamp for the `start_time` column and for display
pub fn format_start_time(ts: NaiveDateTime) -> String {
    ts.format(START_TIME_FORMAT).to_string()
}

/// Parse a timestamp from the database (either storage format)
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, CREATED_AT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, START_TIME_FORMAT))
        .map_err(|e| Error::Internal(format!("Malformed timestamp '{}': {}", s, e)))
}

/// Parse a user-submitted start time.
///
/// Accepts the HTML `datetime-local` shape (`2026-09-01T20:00`) with or
/// without seconds, and the space-separated equivalents.
pub fn parse_start_time(s: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    for format in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(ts);
        }
    }

    Err(Error::InvalidInput(format!("Invalid start time: '{}'", s)))
}
