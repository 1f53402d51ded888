use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::{actors, cinema_halls, genres, movie_sessions, movies, orders, tickets, users};

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub actors: Vec<Actor>,
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CinemaHall {
    pub id: i32,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
}

impl CinemaHall {
    pub fn capacity(&self) -> i64 {
        i64::from(self.rows) * i64::from(self.seats_in_row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieSession {
    pub id: i32,
    pub show_time: DateTime<Utc>,
    pub cinema_hall_id: i32,
    pub movie_id: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieSessionDetail {
    pub id: i32,
    pub show_time: DateTime<Utc>,
    pub movie: Movie,
    pub cinema_hall: CinemaHall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub user_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub id: i32,
    pub movie_session_id: i32,
    pub order_id: i32,
    pub row: i32,
    pub seat: i32,
}

impl Ticket {
    /// Human readable label, e.g. `Alien 2025-01-01 20:00:00 (row: 3, seat: 4)`.
    pub fn label(&self, session: &MovieSessionDetail) -> String {
        format!("{} (row: {}, seat: {})", session, self.row, self.seat)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderWithTickets {
    pub order: Order,
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeatPosition {
    pub row: i32,
    pub seat: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSeating {
    pub movie_session_id: i32,
    pub capacity: i64,
    pub taken: Vec<SeatPosition>,
}

impl SessionSeating {
    pub fn available(&self) -> i64 {
        self.capacity - self.taken.len() as i64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

impl fmt::Display for CinemaHall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for MovieSessionDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.movie.title,
            self.show_time.format(DISPLAY_TIME_FORMAT)
        )
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.created_at.format(DISPLAY_TIME_FORMAT))
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

impl From<genres::Model> for Genre {
    fn from(model: genres::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<actors::Model> for Actor {
    fn from(model: actors::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
        }
    }
}

impl From<movies::Model> for Movie {
    fn from(model: movies::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
        }
    }
}

impl From<cinema_halls::Model> for CinemaHall {
    fn from(model: cinema_halls::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            rows: model.rows,
            seats_in_row: model.seats_in_row,
        }
    }
}

impl From<movie_sessions::Model> for MovieSession {
    fn from(model: movie_sessions::Model) -> Self {
        Self {
            id: model.id,
            show_time: model.show_time.with_timezone(&Utc),
            cinema_hall_id: model.cinema_hall_id,
            movie_id: model.movie_id,
        }
    }
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            created_at: model.created_at.with_timezone(&Utc),
            user_id: model.user_id,
        }
    }
}

impl From<tickets::Model> for Ticket {
    fn from(model: tickets::Model) -> Self {
        Self {
            id: model.id,
            movie_session_id: model.movie_session_id,
            order_id: model.order_id,
            row: model.row,
            seat: model.seat,
        }
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn session() -> MovieSessionDetail {
        MovieSessionDetail {
            id: 1,
            show_time: Utc.with_ymd_and_hms(2025, 3, 14, 20, 30, 0).unwrap(),
            movie: Movie {
                id: 7,
                title: "Alien".into(),
                description: String::new(),
            },
            cinema_hall: CinemaHall {
                id: 2,
                name: "Blue".into(),
                rows: 10,
                seats_in_row: 15,
            },
        }
    }

    #[test]
    fn hall_capacity_is_rows_times_seats() {
        assert_eq!(session().cinema_hall.capacity(), 150);
    }

    #[test]
    fn ticket_label_names_movie_time_and_seat() {
        let ticket = Ticket {
            id: 1,
            movie_session_id: 1,
            order_id: 1,
            row: 3,
            seat: 4,
        };
        assert_eq!(
            ticket.label(&session()),
            "Alien 2025-03-14 20:30:00 (row: 3, seat: 4)"
        );
    }

    #[test]
    fn display_formats() {
        let actor = Actor {
            id: 1,
            first_name: "Sigourney".into(),
            last_name: "Weaver".into(),
        };
        assert_eq!(actor.to_string(), "Sigourney Weaver");

        let order = Order {
            id: 1,
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
            user_id: 1,
        };
        assert_eq!(order.to_string(), "2025-01-02 03:04:05");
    }

    #[test]
    fn user_json_omits_password_hash() {
        let user = User {
            id: 1,
            username: "alice".into(),
            password_hash: "$argon2id$secret".into(),
            email: None,
            first_name: String::new(),
            last_name: String::new(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "alice");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn seating_reports_remaining_seats() {
        let seating = SessionSeating {
            movie_session_id: 1,
            capacity: 150,
            taken: vec![SeatPosition { row: 1, seat: 1 }],
        };
        assert_eq!(seating.available(), 149);
    }
}
