//! Typed form payloads and validation
//!
//! Every create/edit operation has an explicit request struct; there is no
//! dynamic key-value lookup past this boundary. Validation collects
//! per-field errors rather than failing on the first problem, and a failed
//! validation never reaches storage.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDateTime;
use encore_common::db::models::{join_genres, parse_start_time, NewArtist, NewVenue};
use encore_common::token::{validate_token, TokenError};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;

/// Flash shown when field validation fails
pub const FLASH_INVALID: &str = "Oops!, input data not valid. please check your input!";
/// Flash shown when the anti-forgery token is stale
pub const FLASH_EXPIRED: &str = "Your session is expired. please try again";
/// Flash shown for any unclassified persistence failure
pub const FLASH_GENERIC: &str = "Oops!, Something went wrong!";

/// Per-field error messages, keyed by field name.
/// BTreeMap keeps the serialized order deterministic.
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

/// A rejected submission: per-field errors plus the flash to display.
/// Renders as HTTP 422 so the shell re-renders the form with annotations.
#[derive(Debug)]
pub struct FormRejection {
    pub flash: &'static str,
    pub errors: FieldErrors,
}

impl FormRejection {
    pub fn new(flash: &'static str, errors: FieldErrors) -> Self {
        Self { flash, errors }
    }

    /// Single-field rejection (referential checks on show creation)
    pub fn field(field: &'static str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field, vec![message.to_string()]);
        Self::new(FLASH_INVALID, errors)
    }
}

impl IntoResponse for FormRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "status": "invalid",
                "flash": self.flash,
                "errors": self.errors,
            })),
        )
            .into_response()
    }
}

/// 409 response for a duplicate facebook_link, rolled back upstream
pub fn conflict(flash: &str) -> Response {
    (
        StatusCode::CONFLICT,
        Json(json!({ "status": "conflict", "flash": flash })),
    )
        .into_response()
}

/// 500 response for any other persistence failure; the cause is logged,
/// never echoed
pub fn storage_failure(err: &encore_common::Error) -> Response {
    tracing::error!("Persistence failure: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "flash": FLASH_GENERIC })),
    )
        .into_response()
}

/// Venue create/edit request
#[derive(Debug, Deserialize)]
pub struct VenuePayload {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub facebook_link: String,
    #[serde(default)]
    pub website: String,
    /// Checkbox: seeking is true iff the key arrived non-empty
    #[serde(default)]
    pub seeking_talent: Option<String>,
    #[serde(default)]
    pub seeking_description: String,
}

/// Artist create/edit request
#[derive(Debug, Deserialize)]
pub struct ArtistPayload {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub facebook_link: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub seeking_venue: Option<String>,
    #[serde(default)]
    pub seeking_description: String,
}

/// Show create request; ids arrive as form strings and are parsed here
#[derive(Debug, Deserialize)]
pub struct ShowPayload {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub artist_id: String,
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub start_time: String,
}

/// A show submission that passed field validation (referential checks
/// against the database still pending)
#[derive(Debug, Clone)]
pub struct ValidShow {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: NaiveDateTime,
}

/// Validate and populate a venue from its payload
pub fn validate_venue(payload: &VenuePayload, secret: i64) -> Result<NewVenue, FormRejection> {
    let mut errors = FieldErrors::new();
    let flash = check_token(&payload.csrf_token, secret, &mut errors);

    require(&mut errors, "name", &payload.name);
    require(&mut errors, "city", &payload.city);
    require(&mut errors, "state", &payload.state);
    require_genres(&mut errors, &payload.genres);

    if !errors.is_empty() {
        return Err(FormRejection::new(flash, errors));
    }

    Ok(NewVenue {
        name: payload.name.clone(),
        city: payload.city.clone(),
        state: payload.state.clone(),
        address: none_if_empty(&payload.address),
        phone: none_if_empty(&payload.phone),
        genres: join_genres(&payload.genres),
        image_link: none_if_empty(&payload.image_link),
        facebook_link: none_if_empty(&payload.facebook_link),
        website: none_if_empty(&payload.website),
        seeking_talent: checkbox(&payload.seeking_talent),
        seeking_description: none_if_empty(&payload.seeking_description),
    })
}

/// Validate and populate an artist from its payload
pub fn validate_artist(payload: &ArtistPayload, secret: i64) -> Result<NewArtist, FormRejection> {
    let mut errors = FieldErrors::new();
    let flash = check_token(&payload.csrf_token, secret, &mut errors);

    require(&mut errors, "name", &payload.name);
    require(&mut errors, "city", &payload.city);
    require(&mut errors, "state", &payload.state);
    require_genres(&mut errors, &payload.genres);

    if !errors.is_empty() {
        return Err(FormRejection::new(flash, errors));
    }

    Ok(NewArtist {
        name: payload.name.clone(),
        city: payload.city.clone(),
        state: payload.state.clone(),
        phone: none_if_empty(&payload.phone),
        genres: join_genres(&payload.genres),
        image_link: none_if_empty(&payload.image_link),
        facebook_link: none_if_empty(&payload.facebook_link),
        website: none_if_empty(&payload.website),
        seeking_venue: checkbox(&payload.seeking_venue),
        seeking_description: none_if_empty(&payload.seeking_description),
    })
}

/// Validate a show submission's fields
pub fn validate_show(payload: &ShowPayload, secret: i64) -> Result<ValidShow, FormRejection> {
    let mut errors = FieldErrors::new();
    let flash = check_token(&payload.csrf_token, secret, &mut errors);

    let artist_id = parse_id(&mut errors, "artist_id", &payload.artist_id);
    let venue_id = parse_id(&mut errors, "venue_id", &payload.venue_id);

    let start_time = if payload.start_time.is_empty() {
        errors
            .entry("start_time")
            .or_default()
            .push("This field is required".to_string());
        None
    } else {
        match parse_start_time(&payload.start_time) {
            Ok(ts) => Some(ts),
            Err(_) => {
                errors
                    .entry("start_time")
                    .or_default()
                    .push("Not a valid datetime value".to_string());
                None
            }
        }
    };

    match (artist_id, venue_id, start_time) {
        (Some(artist_id), Some(venue_id), Some(start_time)) if errors.is_empty() => {
            Ok(ValidShow {
                artist_id,
                venue_id,
                start_time,
            })
        }
        _ => Err(FormRejection::new(flash, errors)),
    }
}

/// Token check; returns the flash appropriate to the failure kind
fn check_token(token: &str, secret: i64, errors: &mut FieldErrors) -> &'static str {
    match validate_token(token, secret) {
        Ok(()) => FLASH_INVALID,
        Err(TokenError::Stale) => {
            errors
                .entry("csrf_token")
                .or_default()
                .push("Form token expired".to_string());
            FLASH_EXPIRED
        }
        Err(e) => {
            errors.entry("csrf_token").or_default().push(e.to_string());
            FLASH_INVALID
        }
    }
}

fn require(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors
            .entry(field)
            .or_default()
            .push("This field is required".to_string());
    }
}

fn require_genres(errors: &mut FieldErrors, genres: &[String]) {
    if genres.iter().all(|g| g.trim().is_empty()) {
        errors
            .entry("genres")
            .or_default()
            .push("This field is required".to_string());
    }
}

fn parse_id(errors: &mut FieldErrors, field: &'static str, value: &str) -> Option<i64> {
    match value.parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            let message = if value.is_empty() {
                "This field is required"
            } else {
                "Not a valid id"
            };
            errors.entry(field).or_default().push(message.to_string());
            None
        }
    }
}

fn none_if_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn checkbox(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_common::token::mint_token;

    const SECRET: i64 = 42;

    fn venue_payload() -> VenuePayload {
        VenuePayload {
            csrf_token: mint_token(SECRET),
            name: "The Dueling Pianos Bar".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "335 Delancey Street".to_string(),
            phone: String::new(),
            genres: vec!["Classical".to_string(), "R&B".to_string()],
            image_link: String::new(),
            facebook_link: "https://facebook.com/dueling".to_string(),
            website: String::new(),
            seeking_talent: None,
            seeking_description: String::new(),
        }
    }

    #[test]
    fn valid_venue_populates_model() {
        let venue = validate_venue(&venue_payload(), SECRET).expect("valid");
        assert_eq!(venue.name, "The Dueling Pianos Bar");
        assert_eq!(venue.genres, "Classical,R&B");
        assert!(!venue.seeking_talent);
        assert_eq!(venue.phone, None);
        assert_eq!(
            venue.facebook_link.as_deref(),
            Some("https://facebook.com/dueling")
        );
    }

    #[test]
    fn checkbox_present_and_non_empty_is_true() {
        let mut payload = venue_payload();
        payload.seeking_talent = Some("y".to_string());
        assert!(validate_venue(&payload, SECRET).unwrap().seeking_talent);

        // present but empty stays false
        payload.seeking_talent = Some(String::new());
        assert!(!validate_venue(&payload, SECRET).unwrap().seeking_talent);
    }

    #[test]
    fn missing_required_fields_collect_errors() {
        let mut payload = venue_payload();
        payload.name = String::new();
        payload.genres = vec![];

        let rejection = validate_venue(&payload, SECRET).expect_err("invalid");
        assert_eq!(rejection.flash, FLASH_INVALID);
        assert!(rejection.errors.contains_key("name"));
        assert!(rejection.errors.contains_key("genres"));
        assert!(!rejection.errors.contains_key("city"));
    }

    #[test]
    fn bad_token_rejects_even_valid_fields() {
        let mut payload = venue_payload();
        payload.csrf_token = "bogus".to_string();

        let rejection = validate_venue(&payload, SECRET).expect_err("invalid");
        assert!(rejection.errors.contains_key("csrf_token"));
    }

    #[test]
    fn show_ids_parse_or_error() {
        let payload = ShowPayload {
            csrf_token: mint_token(SECRET),
            artist_id: "7".to_string(),
            venue_id: "not-a-number".to_string(),
            start_time: "2026-09-01T20:00".to_string(),
        };

        let rejection = validate_show(&payload, SECRET).expect_err("invalid");
        assert!(rejection.errors.contains_key("venue_id"));
        assert!(!rejection.errors.contains_key("artist_id"));
    }

    #[test]
    fn valid_show_parses_start_time() {
        let payload = ShowPayload {
            csrf_token: mint_token(SECRET),
            artist_id: "7".to_string(),
            venue_id: "3".to_string(),
            start_time: "2026-09-01 20:00:00".to_string(),
        };

        let show = validate_show(&payload, SECRET).expect("valid");
        assert_eq!(show.artist_id, 7);
        assert_eq!(show.venue_id, 3);
    }
}
