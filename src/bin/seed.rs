use chrono::{Duration, Utc};
use cinema_booking::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{
        catalog::{
            CreateActorRequest, CreateCinemaHallRequest, CreateMovieRequest,
            CreateMovieSessionRequest,
        },
        users::CreateUserRequest,
    },
    error::AppError,
    services::{catalog_service, user_service},
    state::AppState,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;
    let state = AppState::new(orm);

    let genre_ids = seed_genres(&state, &["Drama", "Sci-Fi", "Thriller"]).await?;
    seed_user(&state, "admin", "admin123").await?;
    seed_user(&state, "user", "user123").await?;

    if catalog_service::list_cinema_halls(&state).await?.is_empty() {
        seed_catalog(&state, genre_ids).await?;
    } else {
        println!("Cinema halls already present, skipping catalog");
    }

    println!("Seed completed");
    Ok(())
}

async fn seed_genres(state: &AppState, names: &[&str]) -> anyhow::Result<Vec<i32>> {
    for name in names {
        match catalog_service::create_genre(state, name).await {
            Ok(genre) => println!("Created genre {genre}"),
            Err(AppError::Duplicate(_)) => println!("Genre {name} already exists"),
            Err(err) => return Err(err.into()),
        }
    }
    let ids = catalog_service::list_genres(state)
        .await?
        .into_iter()
        .filter(|g| names.contains(&g.name.as_str()))
        .map(|g| g.id)
        .collect();
    Ok(ids)
}

async fn seed_user(state: &AppState, username: &str, password: &str) -> anyhow::Result<()> {
    match user_service::create_user(state, CreateUserRequest::new(username, password)).await {
        Ok(user) => println!("Created user {user} (id={})", user.id),
        Err(AppError::Duplicate(_)) => println!("User {username} already exists"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

async fn seed_catalog(state: &AppState, genre_ids: Vec<i32>) -> anyhow::Result<()> {
    let mut actor_ids = Vec::new();
    for (first_name, last_name) in [("Sigourney", "Weaver"), ("Tom", "Skerritt")] {
        let actor = catalog_service::create_actor(
            state,
            CreateActorRequest {
                first_name: first_name.into(),
                last_name: last_name.into(),
            },
        )
        .await?;
        actor_ids.push(actor.id);
    }

    let movie = catalog_service::create_movie(
        state,
        CreateMovieRequest {
            title: "Alien".into(),
            description: "The crew of a commercial spacecraft meets a deadly lifeform.".into(),
            actor_ids,
            genre_ids,
        },
    )
    .await?;

    let hall = catalog_service::create_cinema_hall(
        state,
        CreateCinemaHallRequest {
            name: "Blue".into(),
            rows: 10,
            seats_in_row: 15,
        },
    )
    .await?;

    let session = catalog_service::create_movie_session(
        state,
        CreateMovieSessionRequest {
            show_time: Utc::now() + Duration::days(1),
            cinema_hall_id: hall.id,
            movie_id: movie.movie.id,
        },
    )
    .await?;

    println!(
        "Seeded movie {} in hall {} (capacity {}), session id {}",
        movie.movie,
        hall,
        hall.capacity(),
        session.id
    );
    Ok(())
}
