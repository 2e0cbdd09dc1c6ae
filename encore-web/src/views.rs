//! View payloads: the JSON shapes handed to the presentation shell
//!
//! These structs are the rendering contract. Timestamps are formatted to
//! display strings here so the shell never parses dates.

use encore_common::db::artists::ArtistShow;
use encore_common::db::models::{format_start_time, split_genres, Artist, Venue};
use encore_common::db::shows::ShowDetails;
use encore_common::db::venues::VenueShow;
use serde::Serialize;

/// Search results envelope: total match count plus the matching rows
#[derive(Debug, Serialize)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> SearchResults<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// One show row in the shows listing and show search
#[derive(Debug, Serialize)]
pub struct ShowView {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

impl From<ShowDetails> for ShowView {
    fn from(d: ShowDetails) -> Self {
        Self {
            venue_id: d.venue_id,
            venue_name: d.venue_name,
            artist_id: d.artist_id,
            artist_name: d.artist_name,
            artist_image_link: d.artist_image_link,
            start_time: format_start_time(d.start_time),
        }
    }
}

/// One show on a venue detail page (artist side denormalized)
#[derive(Debug, Serialize)]
pub struct VenueShowView {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

impl From<VenueShow> for VenueShowView {
    fn from(s: VenueShow) -> Self {
        Self {
            artist_id: s.artist_id,
            artist_name: s.artist_name,
            artist_image_link: s.artist_image_link,
            start_time: format_start_time(s.start_time),
        }
    }
}

/// One show on an artist detail page (venue side denormalized)
#[derive(Debug, Serialize)]
pub struct ArtistShowView {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

impl From<ArtistShow> for ArtistShowView {
    fn from(s: ArtistShow) -> Self {
        Self {
            venue_id: s.venue_id,
            venue_name: s.venue_name,
            venue_image_link: s.venue_image_link,
            start_time: format_start_time(s.start_time),
        }
    }
}

/// Venue detail page payload
#[derive(Debug, Serialize)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<VenueShowView>,
    pub upcoming_shows: Vec<VenueShowView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl VenueDetail {
    pub fn new(venue: Venue, past: Vec<VenueShow>, upcoming: Vec<VenueShow>) -> Self {
        Self {
            id: venue.id,
            name: venue.name,
            genres: split_genres(&venue.genres),
            address: venue.address,
            city: venue.city,
            state: venue.state,
            phone: venue.phone,
            website: venue.website,
            facebook_link: venue.facebook_link,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
            image_link: venue.image_link,
            past_shows_count: past.len(),
            upcoming_shows_count: upcoming.len(),
            past_shows: past.into_iter().map(Into::into).collect(),
            upcoming_shows: upcoming.into_iter().map(Into::into).collect(),
        }
    }
}

/// Artist detail page payload
#[derive(Debug, Serialize)]
pub struct ArtistDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<ArtistShowView>,
    pub upcoming_shows: Vec<ArtistShowView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl ArtistDetail {
    pub fn new(artist: Artist, past: Vec<ArtistShow>, upcoming: Vec<ArtistShow>) -> Self {
        Self {
            id: artist.id,
            name: artist.name,
            genres: split_genres(&artist.genres),
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            website: artist.website,
            facebook_link: artist.facebook_link,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
            image_link: artist.image_link,
            past_shows_count: past.len(),
            upcoming_shows_count: upcoming.len(),
            past_shows: past.into_iter().map(Into::into).collect(),
            upcoming_shows: upcoming.into_iter().map(Into::into).collect(),
        }
    }
}

/// Fresh form token for a create form
#[derive(Debug, Serialize)]
pub struct FormToken {
    pub csrf_token: String,
}

/// Venue fields for pre-populating an edit form
#[derive(Debug, Serialize)]
pub struct VenueFormView {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl From<Venue> for VenueFormView {
    fn from(v: Venue) -> Self {
        Self {
            id: v.id,
            name: v.name,
            city: v.city,
            state: v.state,
            address: v.address,
            phone: v.phone,
            genres: split_genres(&v.genres),
            image_link: v.image_link,
            facebook_link: v.facebook_link,
            website: v.website,
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description,
        }
    }
}

/// Artist fields for pre-populating an edit form
#[derive(Debug, Serialize)]
pub struct ArtistFormView {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl From<Artist> for ArtistFormView {
    fn from(a: Artist) -> Self {
        Self {
            id: a.id,
            name: a.name,
            city: a.city,
            state: a.state,
            phone: a.phone,
            genres: split_genres(&a.genres),
            image_link: a.image_link,
            facebook_link: a.facebook_link,
            website: a.website,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
        }
    }
}

/// Edit form payload: current values plus a fresh token
#[derive(Debug, Serialize)]
pub struct EditForm<T> {
    pub entity: T,
    pub csrf_token: String,
}

/// Successful form submission: where to go and what to flash
#[derive(Debug, Serialize)]
pub struct SubmissionAccepted {
    pub status: &'static str,
    pub id: i64,
    pub redirect: String,
    pub flash: String,
}

/// Delete outcome: both paths redirect home, only the flash differs
#[derive(Debug, Serialize)]
pub struct DeleteOutcome {
    pub status: &'static str,
    pub redirect: &'static str,
    pub flash: String,
}
