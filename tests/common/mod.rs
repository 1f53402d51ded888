#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use cinema_booking::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{
        catalog::{CreateCinemaHallRequest, CreateMovieRequest, CreateMovieSessionRequest},
        users::CreateUserRequest,
    },
    models::{CinemaHall, MovieSession, User},
    services::{catalog_service, user_service},
    state::AppState,
};
use sea_orm::{ConnectionTrait, DbBackend, Statement};

/// Fresh store with migrations applied. Uses `TEST_DATABASE_URL` when set
/// (run those with `--test-threads=1`), otherwise a private in-memory SQLite.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let database_url =
        std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let orm = create_orm_conn(&AppConfig::with_database_url(database_url)).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    if backend == DbBackend::Postgres {
        orm.execute(Statement::from_string(
            backend,
            "TRUNCATE TABLE tickets, orders, users, movie_sessions, cinema_halls, movie_actors, movie_genres, movies, actors, genres RESTART IDENTITY CASCADE",
        ))
        .await?;
    }

    Ok(AppState::new(orm))
}

pub async fn create_user(state: &AppState, username: &str) -> anyhow::Result<User> {
    let user =
        user_service::create_user(state, CreateUserRequest::new(username, "password")).await?;
    Ok(user)
}

pub async fn create_hall(
    state: &AppState,
    rows: i32,
    seats_in_row: i32,
) -> anyhow::Result<CinemaHall> {
    let hall = catalog_service::create_cinema_hall(
        state,
        CreateCinemaHallRequest {
            name: "Main".into(),
            rows,
            seats_in_row,
        },
    )
    .await?;
    Ok(hall)
}

/// A session for a fresh movie in a fresh `rows` x `seats_in_row` hall.
pub async fn create_session(
    state: &AppState,
    rows: i32,
    seats_in_row: i32,
) -> anyhow::Result<MovieSession> {
    let hall = create_hall(state, rows, seats_in_row).await?;
    let movie = catalog_service::create_movie(
        state,
        CreateMovieRequest {
            title: "Alien".into(),
            description: "In space no one can hear you scream.".into(),
            ..Default::default()
        },
    )
    .await?;
    let session = catalog_service::create_movie_session(
        state,
        CreateMovieSessionRequest {
            show_time: Utc.with_ymd_and_hms(2025, 3, 14, 20, 30, 0).unwrap(),
            cinema_hall_id: hall.id,
            movie_id: movie.movie.id,
        },
    )
    .await?;
    Ok(session)
}
