//! Show listing, search, and creation
//!
//! Show creation carries the one referential check the generic form
//! validator cannot perform: artist_id and venue_id must resolve to
//! existing records before anything is written.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use encore_common::db::models::NewShow;
use encore_common::db::{artists, shows, venues};
use encore_common::token::mint_token;

use crate::api::venues::SearchQuery;
use crate::api::{forms, ApiError};
use crate::views::{FormToken, SearchResults, ShowView, SubmissionAccepted};
use crate::AppState;

/// GET /api/shows
///
/// All shows with denormalized artist/venue display fields, storage order.
pub async fn list_shows(State(state): State<AppState>) -> Result<Json<Vec<ShowView>>, ApiError> {
    let shows = shows::list_shows(&state.db).await?;
    Ok(Json(shows.into_iter().map(Into::into).collect()))
}

/// GET /api/shows/search?search_term=
///
/// Matches when the artist name OR the venue name contains the term.
pub async fn search_shows(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults<ShowView>>, ApiError> {
    let matches = shows::search_shows(&state.db, &query.search_term).await?;
    Ok(Json(SearchResults::new(
        matches.into_iter().map(Into::into).collect(),
    )))
}

/// GET /api/shows/new
pub async fn new_show_form(State(state): State<AppState>) -> Json<FormToken> {
    Json(FormToken {
        csrf_token: mint_token(state.form_secret),
    })
}

/// POST /api/shows
pub async fn create_show(
    State(state): State<AppState>,
    Json(payload): Json<forms::ShowPayload>,
) -> Result<Response, ApiError> {
    let valid = match forms::validate_show(&payload, state.form_secret) {
        Ok(valid) => valid,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    // Referential checks before any write
    if !artists::artist_exists(&state.db, valid.artist_id).await? {
        return Ok(
            forms::FormRejection::field("artist_id", "Id is not associated with any artist")
                .into_response(),
        );
    }
    if !venues::venue_exists(&state.db, valid.venue_id).await? {
        return Ok(
            forms::FormRejection::field("venue_id", "Id is not associated with any venue")
                .into_response(),
        );
    }

    let show = NewShow {
        artist_id: valid.artist_id,
        venue_id: valid.venue_id,
        start_time: valid.start_time,
    };

    Ok(match shows::create_show(&state.db, &show).await {
        Ok(id) => Json(SubmissionAccepted {
            status: "created",
            id,
            redirect: "/shows".to_string(),
            flash: "Show was successfully listed!".to_string(),
        })
        .into_response(),
        Err(e) => forms::storage_failure(&e),
    })
}
