//! Landing page aggregation

use axum::extract::State;
use axum::Json;
use encore_common::db::home::{merge_latest, recent_artists, recent_venues, LatestEntry};

use crate::api::ApiError;
use crate::AppState;

/// GET /api/home/latest
///
/// Up to ten recently added venues and artists, merged and ordered by id
/// descending.
pub async fn latest(State(state): State<AppState>) -> Result<Json<Vec<LatestEntry>>, ApiError> {
    let venues = recent_venues(&state.db).await?;
    let artists = recent_artists(&state.db).await?;
    Ok(Json(merge_latest(venues, artists)))
}
