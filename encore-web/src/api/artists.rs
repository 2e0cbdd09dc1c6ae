//! Artist pages and form submissions

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use encore_common::db::artists::{self, ArtistName, ArtistSummary};
use encore_common::db::schedule::partition_by_date;
use encore_common::token::mint_token;

use crate::api::venues::SearchQuery;
use crate::api::{forms, ApiError};
use crate::views::{
    ArtistDetail, ArtistFormView, DeleteOutcome, EditForm, FormToken, SearchResults,
    SubmissionAccepted,
};
use crate::AppState;

/// GET /api/artists
///
/// Flat listing projected to {id, name}, ordered by id.
pub async fn list_artists(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArtistName>>, ApiError> {
    Ok(Json(artists::list_names(&state.db).await?))
}

/// GET /api/artists/search?search_term=
pub async fn search_artists(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults<ArtistSummary>>, ApiError> {
    let today = Local::now().date_naive();
    let data = artists::search_artists(&state.db, &query.search_term, today).await?;
    Ok(Json(SearchResults::new(data)))
}

/// GET /api/artists/:id
///
/// Artist detail with shows partitioned into past and upcoming.
pub async fn artist_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ArtistDetail>, ApiError> {
    let artist = artists::get_artist(&state.db, id)
        .await?
        .ok_or_else(|| encore_common::Error::NotFound(format!("Artist {} not found", id)))?;

    let shows = artists::shows_for_artist(&state.db, id).await?;
    let today = Local::now().date_naive();
    let (past, upcoming) = partition_by_date(shows, |s| s.start_time, today);

    Ok(Json(ArtistDetail::new(artist, past, upcoming)))
}

/// GET /api/artists/new
pub async fn new_artist_form(State(state): State<AppState>) -> Json<FormToken> {
    Json(FormToken {
        csrf_token: mint_token(state.form_secret),
    })
}

/// GET /api/artists/:id/edit
pub async fn edit_artist_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EditForm<ArtistFormView>>, ApiError> {
    let artist = artists::get_artist(&state.db, id)
        .await?
        .ok_or_else(|| encore_common::Error::NotFound(format!("Artist {} not found", id)))?;

    Ok(Json(EditForm {
        entity: artist.into(),
        csrf_token: mint_token(state.form_secret),
    }))
}

/// POST /api/artists
pub async fn create_artist(
    State(state): State<AppState>,
    Json(payload): Json<forms::ArtistPayload>,
) -> Response {
    let artist = match forms::validate_artist(&payload, state.form_secret) {
        Ok(artist) => artist,
        Err(rejection) => return rejection.into_response(),
    };

    match artists::create_artist(&state.db, &artist).await {
        Ok(id) => Json(SubmissionAccepted {
            status: "created",
            id,
            redirect: format!("/artists/{}", id),
            flash: format!("Artist {} was successfully listed!", artist.name),
        })
        .into_response(),
        Err(e) if e.is_duplicate_link() => {
            forms::conflict("Oops!, looks like another artist uses this facebook link!")
        }
        Err(e) => forms::storage_failure(&e),
    }
}

/// POST /api/artists/:id
pub async fn edit_artist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<forms::ArtistPayload>,
) -> Result<Response, ApiError> {
    if !artists::artist_exists(&state.db, id).await? {
        return Err(encore_common::Error::NotFound(format!("Artist {} not found", id)).into());
    }

    let artist = match forms::validate_artist(&payload, state.form_secret) {
        Ok(artist) => artist,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    Ok(match artists::update_artist(&state.db, id, &artist).await {
        Ok(()) => Json(SubmissionAccepted {
            status: "updated",
            id,
            redirect: format!("/artists/{}", id),
            flash: format!("Artist {} was successfully updated!", artist.name),
        })
        .into_response(),
        Err(e) if e.is_duplicate_link() => {
            forms::conflict("Oops!, looks like another artist uses this facebook link!")
        }
        Err(e) => forms::storage_failure(&e),
    })
}

/// DELETE /api/artists/:id
pub async fn delete_artist(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let artist = match artists::get_artist(&state.db, id).await {
        Ok(artist) => artist,
        Err(e) => return forms::storage_failure(&e),
    };

    let Some(artist) = artist else {
        return Json(DeleteOutcome {
            status: "not_found",
            redirect: "/",
            flash: "Artist not found".to_string(),
        })
        .into_response();
    };

    match artists::delete_artist(&state.db, id).await {
        Ok(()) => Json(DeleteOutcome {
            status: "deleted",
            redirect: "/",
            flash: format!("Artist {} was successfully deleted!", artist.name),
        })
        .into_response(),
        Err(e) => forms::storage_failure(&e),
    }
}
