//! Integration tests for the encore-web API
//!
//! Each test drives the full router against an in-memory database via
//! `tower::ServiceExt::oneshot`, covering the listing/search/detail
//! payload shapes and the whole validate-then-commit submission protocol.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Local};
use encore_common::db;
use encore_common::token::{mint_token, mint_token_at};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method

use encore_web::{build_router, AppState};

/// Fixed secret so tests can mint their own tokens
const SECRET: i64 = 987_654_321;

async fn setup() -> (axum::Router, SqlitePool) {
    let pool = db::init_in_memory().await.expect("in-memory schema");
    let state = AppState::new(pool.clone(), SECRET);
    (build_router(state), pool)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn venue_body(name: &str, facebook_link: &str) -> Value {
    json!({
        "csrf_token": mint_token(SECRET),
        "name": name,
        "city": "San Francisco",
        "state": "CA",
        "address": "335 Delancey Street",
        "genres": ["Classical", "R&B"],
        "facebook_link": facebook_link,
    })
}

fn artist_body(name: &str, facebook_link: &str) -> Value {
    json!({
        "csrf_token": mint_token(SECRET),
        "name": name,
        "city": "San Francisco",
        "state": "CA",
        "genres": ["Rock n Roll"],
        "facebook_link": facebook_link,
    })
}

/// Create a venue through the API, returning its id
async fn create_venue(app: &axum::Router, name: &str, facebook_link: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(post_json("/api/venues", venue_body(name, facebook_link)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    body["id"].as_i64().unwrap()
}

async fn create_artist(app: &axum::Router, name: &str, facebook_link: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(post_json("/api/artists", artist_body(name, facebook_link)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    body["id"].as_i64().unwrap()
}

async fn create_show(app: &axum::Router, artist_id: i64, venue_id: i64, start_time: &str) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/shows",
            json!({
                "csrf_token": mint_token(SECRET),
                "artist_id": artist_id.to_string(),
                "venue_id": venue_id.to_string(),
                "start_time": start_time,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

fn days_from_today(days: i64) -> String {
    let date = Local::now().date_naive() + Duration::days(days);
    format!("{} 20:00:00", date.format("%Y-%m-%d"))
}

// =============================================================================
// Health and fallback
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _pool) = setup().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "encore-web");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (app, _pool) = setup().await;

    let response = app.oneshot(get("/api/nonsense")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Not found");
}

// =============================================================================
// Venue create protocol
// =============================================================================

#[tokio::test]
async fn test_create_venue_with_served_token() {
    let (app, _pool) = setup().await;

    // Token comes from the form endpoint, exactly as the shell would do it
    let response = app.clone().oneshot(get("/api/venues/new")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let form = extract_json(response.into_body()).await;
    let token = form["csrf_token"].as_str().unwrap().to_string();

    let mut body = venue_body("The Dueling Pianos Bar", "https://facebook.com/dueling");
    body["csrf_token"] = json!(token);

    let response = app
        .clone()
        .oneshot(post_json("/api/venues", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "created");
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["redirect"], format!("/venues/{}", id));
    assert_eq!(
        body["flash"],
        "Venue The Dueling Pianos Bar was successfully listed!"
    );

    // Queryable at the returned id, with the checkbox defaulted to false
    // and genres round-tripped
    let response = app
        .oneshot(get(&format!("/api/venues/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let detail = extract_json(response.into_body()).await;
    assert_eq!(detail["name"], "The Dueling Pianos Bar");
    assert_eq!(detail["seeking_talent"], false);
    assert_eq!(detail["genres"], json!(["Classical", "R&B"]));
    assert_eq!(detail["past_shows_count"], 0);
    assert_eq!(detail["upcoming_shows_count"], 0);
}

#[tokio::test]
async fn test_create_venue_missing_fields_is_422() {
    let (app, pool) = setup().await;

    let response = app
        .oneshot(post_json(
            "/api/venues",
            json!({ "csrf_token": mint_token(SECRET), "genres": ["Jazz"] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "invalid");
    assert!(body["errors"]["name"].is_array());
    assert!(body["errors"]["city"].is_array());

    // storage untouched
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM venues")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_stale_token_reports_expired_session() {
    let (app, _pool) = setup().await;

    let two_hours_ago = chrono::Utc::now().timestamp_millis() - 2 * 60 * 60 * 1000;
    let mut body = venue_body("Late Venue", "");
    body["csrf_token"] = json!(mint_token_at(SECRET, two_hours_ago));

    let response = app.oneshot(post_json("/api/venues", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["flash"], "Your session is expired. please try again");
    assert!(body["errors"]["csrf_token"].is_array());
}

#[tokio::test]
async fn test_duplicate_facebook_link_conflict_leaves_count_unchanged() {
    let (app, pool) = setup().await;

    create_venue(&app, "First", "https://facebook.com/same").await;

    let response = app
        .oneshot(post_json(
            "/api/venues",
            venue_body("Second", "https://facebook.com/same"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "conflict");
    assert_eq!(
        body["flash"],
        "Oops!, looks like another venue uses this facebook link!"
    );

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM venues")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

// =============================================================================
// Venue edit and delete
// =============================================================================

#[tokio::test]
async fn test_edit_venue_replaces_fields() {
    let (app, _pool) = setup().await;
    let id = create_venue(&app, "Old Name", "").await;

    let mut body = venue_body("New Name", "");
    body["seeking_talent"] = json!("y");
    body["seeking_description"] = json!("Looking for a jazz trio");

    let response = app
        .clone()
        .oneshot(post_json(&format!("/api/venues/{}", id), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "updated");
    assert_eq!(body["flash"], "Venue New Name was successfully updated!");

    let response = app
        .oneshot(get(&format!("/api/venues/{}", id)))
        .await
        .unwrap();
    let detail = extract_json(response.into_body()).await;
    assert_eq!(detail["name"], "New Name");
    assert_eq!(detail["seeking_talent"], true);
    assert_eq!(detail["seeking_description"], "Looking for a jazz trio");
}

#[tokio::test]
async fn test_edit_nonexistent_venue_is_404() {
    let (app, _pool) = setup().await;

    let response = app
        .clone()
        .oneshot(get("/api/venues/999/edit"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(post_json("/api/venues/999", venue_body("Ghost", "")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_nonexistent_venue_redirects_home() {
    let (app, pool) = setup().await;
    create_venue(&app, "Bystander", "").await;

    let response = app.oneshot(delete("/api/venues/999")).await.unwrap();
    // not an error page: flash plus home redirect
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "not_found");
    assert_eq!(body["redirect"], "/");
    assert_eq!(body["flash"], "Venue not found");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM venues")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_delete_venue_cascades_to_shows() {
    let (app, pool) = setup().await;
    let venue_id = create_venue(&app, "Doomed", "").await;
    let artist_id = create_artist(&app, "Performer", "").await;
    create_show(&app, artist_id, venue_id, &days_from_today(10)).await;

    let response = app
        .oneshot(delete(&format!("/api/venues/{}", venue_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "deleted");
    assert_eq!(body["redirect"], "/");

    let shows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(shows, 0);
}

// =============================================================================
// Listing, search, detail partitions
// =============================================================================

#[tokio::test]
async fn test_venue_listing_groups_by_city_state() {
    let (app, _pool) = setup().await;

    let mut sf = venue_body("Hop A", "");
    sf["city"] = json!("San Francisco");
    let mut ny = venue_body("Hop B", "");
    ny["city"] = json!("New York");
    ny["state"] = json!("NY");
    let mut sf2 = venue_body("Hop C", "");
    sf2["city"] = json!("San Francisco");

    for body in [sf, ny, sf2] {
        let response = app.clone().oneshot(post_json("/api/venues", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/api/venues")).await.unwrap();
    let areas = extract_json(response.into_body()).await;
    let areas = areas.as_array().unwrap();

    assert_eq!(areas.len(), 2);
    // first-occurrence order: SF group first, with both SF venues
    assert_eq!(areas[0]["city"], "San Francisco");
    assert_eq!(areas[0]["venues"].as_array().unwrap().len(), 2);
    assert_eq!(areas[1]["state"], "NY");
    assert_eq!(areas[0]["venues"][0]["num_upcoming_shows"], 0);
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_counts_zero_shows() {
    let (app, _pool) = setup().await;
    create_venue(&app, "The Musical Hop", "").await;
    create_venue(&app, "Park Square Live Music & Coffee", "").await;

    for term in ["Hop", "hop"] {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/venues/search?search_term={}", term)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = extract_json(response.into_body()).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["name"], "The Musical Hop");
        assert_eq!(body["data"][0]["num_upcoming_shows"], 0);
    }
}

#[tokio::test]
async fn test_detail_partitions_past_and_upcoming() {
    let (app, _pool) = setup().await;
    let venue_id = create_venue(&app, "The Musical Hop", "").await;
    let artist_id = create_artist(&app, "Guns N Petals", "").await;

    create_show(&app, artist_id, venue_id, &days_from_today(-30)).await;
    create_show(&app, artist_id, venue_id, &days_from_today(30)).await;
    // later today counts as upcoming (strict date comparison)
    create_show(&app, artist_id, venue_id, &days_from_today(0)).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/api/venues/{}", venue_id)))
        .await
        .unwrap();
    let venue = extract_json(response.into_body()).await;
    assert_eq!(venue["past_shows_count"], 1);
    assert_eq!(venue["upcoming_shows_count"], 2);
    assert_eq!(venue["past_shows"][0]["artist_name"], "Guns N Petals");

    // same shows seen from the artist side
    let response = app
        .clone()
        .oneshot(get(&format!("/api/artists/{}", artist_id)))
        .await
        .unwrap();
    let artist = extract_json(response.into_body()).await;
    assert_eq!(artist["past_shows_count"], 1);
    assert_eq!(artist["upcoming_shows_count"], 2);
    assert_eq!(artist["upcoming_shows"][0]["venue_name"], "The Musical Hop");

    // listing reflects the upcoming count
    let response = app.oneshot(get("/api/venues")).await.unwrap();
    let areas = extract_json(response.into_body()).await;
    assert_eq!(areas[0]["venues"][0]["num_upcoming_shows"], 2);
}

#[tokio::test]
async fn test_artist_listing_is_id_and_name_only() {
    let (app, _pool) = setup().await;
    create_artist(&app, "Zeta", "").await;
    create_artist(&app, "Alpha", "").await;

    let response = app.oneshot(get("/api/artists")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    let list = body.as_array().unwrap();

    assert_eq!(list.len(), 2);
    // storage (id) order, not name order
    assert_eq!(list[0]["name"], "Zeta");
    assert!(list[0]["id"].as_i64().unwrap() < list[1]["id"].as_i64().unwrap());
    assert!(list[0].get("city").is_none());
}

// =============================================================================
// Shows
// =============================================================================

#[tokio::test]
async fn test_create_show_with_unknown_artist_attaches_field_error() {
    let (app, pool) = setup().await;
    let venue_id = create_venue(&app, "The Musical Hop", "").await;

    let response = app
        .oneshot(post_json(
            "/api/shows",
            json!({
                "csrf_token": mint_token(SECRET),
                "artist_id": "999",
                "venue_id": venue_id.to_string(),
                "start_time": days_from_today(5),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(
        body["errors"]["artist_id"][0],
        "Id is not associated with any artist"
    );

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_show_listing_and_search_by_either_name() {
    let (app, _pool) = setup().await;
    let venue_id = create_venue(&app, "The Musical Hop", "").await;
    let artist_id = create_artist(&app, "Guns N Petals", "").await;
    create_show(&app, artist_id, venue_id, &days_from_today(5)).await;

    let response = app.clone().oneshot(get("/api/shows")).await.unwrap();
    let shows = extract_json(response.into_body()).await;
    assert_eq!(shows.as_array().unwrap().len(), 1);
    assert_eq!(shows[0]["venue_name"], "The Musical Hop");
    assert_eq!(shows[0]["artist_name"], "Guns N Petals");

    for term in ["hop", "petals"] {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/shows/search?search_term={}", term)))
            .await
            .unwrap();
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["count"], 1, "term {}", term);
    }

    let response = app
        .oneshot(get("/api/shows/search?search_term=nomatch"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_show_create_redirects_to_listing() {
    let (app, _pool) = setup().await;
    let venue_id = create_venue(&app, "The Musical Hop", "").await;
    let artist_id = create_artist(&app, "Guns N Petals", "").await;

    let response = app
        .oneshot(post_json(
            "/api/shows",
            json!({
                "csrf_token": mint_token(SECRET),
                "artist_id": artist_id.to_string(),
                "venue_id": venue_id.to_string(),
                "start_time": days_from_today(5),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["redirect"], "/shows");
    assert_eq!(body["flash"], "Show was successfully listed!");
}

// =============================================================================
// Home aggregation
// =============================================================================

#[tokio::test]
async fn test_home_latest_is_capped_and_id_descending() {
    let (app, _pool) = setup().await;

    for i in 0..8 {
        create_venue(&app, &format!("Venue {}", i), "").await;
    }
    for i in 0..8 {
        create_artist(&app, &format!("Artist {}", i), "").await;
    }

    let response = app.oneshot(get("/api/home/latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let latest = body.as_array().unwrap();
    assert_eq!(latest.len(), 10);

    let ids: Vec<i64> = latest.iter().map(|e| e["id"].as_i64().unwrap()).collect();
    for pair in ids.windows(2) {
        assert!(pair[0] >= pair[1]);
    }

    // every entry is tagged with its type
    for entry in latest {
        let t = entry["type"].as_str().unwrap();
        assert!(t == "venue" || t == "artist");
        assert!(entry["name"].is_string());
    }
}

#[tokio::test]
async fn test_home_latest_on_empty_database() {
    let (app, _pool) = setup().await;

    let response = app.oneshot(get("/api/home/latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

// =============================================================================
// UI shell
// =============================================================================

#[tokio::test]
async fn test_index_and_app_js_are_served() {
    let (app, _pool) = setup().await;

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/static/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/javascript"
    );
}
