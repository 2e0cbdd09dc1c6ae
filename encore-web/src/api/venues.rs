//! Venue pages and form submissions
//!
//! Listing groups venues by (state, city); detail partitions the venue's
//! shows into past and upcoming. Create/edit follow the
//! validate-then-commit protocol in `forms`; delete redirects home on both
//! the found and not-found paths (deliberate asymmetry with create/edit,
//! which redirect to the detail view).

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use encore_common::db::schedule::partition_by_date;
use encore_common::db::venues::{self, Area, VenueSummary};
use encore_common::token::mint_token;
use serde::Deserialize;

use crate::api::{forms, ApiError};
use crate::views::{
    DeleteOutcome, EditForm, FormToken, SearchResults, SubmissionAccepted, VenueDetail,
    VenueFormView,
};
use crate::AppState;

/// Search query string: `?search_term=...`
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search_term: String,
}

/// GET /api/venues
///
/// All venues grouped by (state, city), each with its upcoming-show count.
pub async fn list_venues(State(state): State<AppState>) -> Result<Json<Vec<Area>>, ApiError> {
    let today = Local::now().date_naive();
    let rows = venues::list_with_upcoming_counts(&state.db, today).await?;
    Ok(Json(venues::group_by_city_state(rows)))
}

/// GET /api/venues/search?search_term=
pub async fn search_venues(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults<VenueSummary>>, ApiError> {
    let today = Local::now().date_naive();
    let data = venues::search_venues(&state.db, &query.search_term, today).await?;
    Ok(Json(SearchResults::new(data)))
}

/// GET /api/venues/:id
///
/// Venue detail with shows partitioned into past and upcoming.
pub async fn venue_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<VenueDetail>, ApiError> {
    let venue = venues::get_venue(&state.db, id)
        .await?
        .ok_or_else(|| encore_common::Error::NotFound(format!("Venue {} not found", id)))?;

    let shows = venues::shows_for_venue(&state.db, id).await?;
    let today = Local::now().date_naive();
    let (past, upcoming) = partition_by_date(shows, |s| s.start_time, today);

    Ok(Json(VenueDetail::new(venue, past, upcoming)))
}

/// GET /api/venues/new
pub async fn new_venue_form(State(state): State<AppState>) -> Json<FormToken> {
    Json(FormToken {
        csrf_token: mint_token(state.form_secret),
    })
}

/// GET /api/venues/:id/edit
pub async fn edit_venue_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EditForm<VenueFormView>>, ApiError> {
    let venue = venues::get_venue(&state.db, id)
        .await?
        .ok_or_else(|| encore_common::Error::NotFound(format!("Venue {} not found", id)))?;

    Ok(Json(EditForm {
        entity: venue.into(),
        csrf_token: mint_token(state.form_secret),
    }))
}

/// POST /api/venues
///
/// Create submission: validate, populate, persist; atomic per submission.
pub async fn create_venue(
    State(state): State<AppState>,
    Json(payload): Json<forms::VenuePayload>,
) -> Response {
    let venue = match forms::validate_venue(&payload, state.form_secret) {
        Ok(venue) => venue,
        Err(rejection) => return rejection.into_response(),
    };

    match venues::create_venue(&state.db, &venue).await {
        Ok(id) => Json(SubmissionAccepted {
            status: "created",
            id,
            redirect: format!("/venues/{}", id),
            flash: format!("Venue {} was successfully listed!", venue.name),
        })
        .into_response(),
        Err(e) if e.is_duplicate_link() => {
            forms::conflict("Oops!, looks like another venue uses this facebook link!")
        }
        Err(e) => forms::storage_failure(&e),
    }
}

/// POST /api/venues/:id
///
/// Edit submission: full replace of the mutable fields.
pub async fn edit_venue(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<forms::VenuePayload>,
) -> Result<Response, ApiError> {
    // 404 before validation, matching detail/edit semantics
    if !venues::venue_exists(&state.db, id).await? {
        return Err(encore_common::Error::NotFound(format!("Venue {} not found", id)).into());
    }

    let venue = match forms::validate_venue(&payload, state.form_secret) {
        Ok(venue) => venue,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    Ok(match venues::update_venue(&state.db, id, &venue).await {
        Ok(()) => Json(SubmissionAccepted {
            status: "updated",
            id,
            redirect: format!("/venues/{}", id),
            flash: format!("Venue {} was successfully updated!", venue.name),
        })
        .into_response(),
        Err(e) if e.is_duplicate_link() => {
            forms::conflict("Oops!, looks like another venue uses this facebook link!")
        }
        Err(e) => forms::storage_failure(&e),
    })
}

/// DELETE /api/venues/:id
///
/// Both outcomes redirect home; a missing venue is a flash message, not an
/// error page.
pub async fn delete_venue(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let venue = match venues::get_venue(&state.db, id).await {
        Ok(venue) => venue,
        Err(e) => return forms::storage_failure(&e),
    };

    let Some(venue) = venue else {
        return Json(DeleteOutcome {
            status: "not_found",
            redirect: "/",
            flash: "Venue not found".to_string(),
        })
        .into_response();
    };

    match venues::delete_venue(&state.db, id).await {
        Ok(()) => Json(DeleteOutcome {
            status: "deleted",
            redirect: "/",
            flash: format!("Venue {} was successfully deleted!", venue.name),
        })
        .into_response(),
        Err(e) => forms::storage_failure(&e),
    }
}
