use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateActorRequest {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub actor_ids: Vec<i32>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub genre_ids: Vec<i32>,
    pub actor_ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCinemaHallRequest {
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieSessionRequest {
    pub show_time: DateTime<Utc>,
    pub cinema_hall_id: i32,
    pub movie_id: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovieSessionFilter {
    /// Sessions starting on this UTC calendar day.
    pub date: Option<NaiveDate>,
    pub movie_id: Option<i32>,
}
