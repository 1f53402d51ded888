mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use cinema_booking::{
    dto::catalog::{
        CreateActorRequest, CreateCinemaHallRequest, CreateMovieRequest,
        CreateMovieSessionRequest, MovieFilter, MovieSessionFilter,
    },
    error::AppError,
    services::catalog_service,
};

use common::{create_hall, setup_state};

#[tokio::test]
async fn genre_names_are_unique() -> anyhow::Result<()> {
    let state = setup_state().await?;
    catalog_service::create_genre(&state, "Drama").await?;
    let err = catalog_service::create_genre(&state, "Drama")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Duplicate(_)));
    assert_eq!(catalog_service::list_genres(&state).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn movie_links_actors_and_genres() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let drama = catalog_service::create_genre(&state, "Drama").await?;
    let scifi = catalog_service::create_genre(&state, "Sci-Fi").await?;
    let weaver = catalog_service::create_actor(
        &state,
        CreateActorRequest {
            first_name: "Sigourney".into(),
            last_name: "Weaver".into(),
        },
    )
    .await?;
    let holm = catalog_service::create_actor(
        &state,
        CreateActorRequest {
            first_name: "Ian".into(),
            last_name: "Holm".into(),
        },
    )
    .await?;

    let alien = catalog_service::create_movie(
        &state,
        CreateMovieRequest {
            title: "Alien".into(),
            description: "Space horror".into(),
            actor_ids: vec![weaver.id, holm.id, weaver.id],
            genre_ids: vec![scifi.id],
        },
    )
    .await?;
    catalog_service::create_movie(
        &state,
        CreateMovieRequest {
            title: "Gorillas in the Mist".into(),
            description: "Biography".into(),
            actor_ids: vec![weaver.id],
            genre_ids: vec![drama.id],
        },
    )
    .await?;

    let detail = catalog_service::get_movie(&state, alien.movie.id).await?;
    assert_eq!(detail.actors.len(), 2);
    assert_eq!(detail.genres, vec![scifi.clone()]);
    assert_eq!(detail.movie.to_string(), "Alien");

    let by_title = catalog_service::list_movies(
        &state,
        MovieFilter {
            title: Some("aLi".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].id, alien.movie.id);

    let by_actor = catalog_service::list_movies(
        &state,
        MovieFilter {
            actor_ids: vec![weaver.id],
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(by_actor.len(), 2);

    let by_genre = catalog_service::list_movies(
        &state,
        MovieFilter {
            genre_ids: vec![drama.id],
            actor_ids: vec![weaver.id],
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(by_genre.len(), 1);
    assert_eq!(by_genre[0].title, "Gorillas in the Mist");
    Ok(())
}

#[tokio::test]
async fn title_filter_matches_wildcards_literally() -> anyhow::Result<()> {
    let state = setup_state().await?;
    for title in ["Alien", "File_Not_Found", "100% Wolf"] {
        catalog_service::create_movie(
            &state,
            CreateMovieRequest {
                title: title.into(),
                description: String::new(),
                ..Default::default()
            },
        )
        .await?;
    }

    let titles = |filter: &str| {
        let state = state.clone();
        let filter = filter.to_owned();
        async move {
            let movies = catalog_service::list_movies(
                &state,
                MovieFilter {
                    title: Some(filter),
                    ..Default::default()
                },
            )
            .await?;
            anyhow::Ok(movies.into_iter().map(|m| m.title).collect::<Vec<_>>())
        }
    };

    assert_eq!(titles("_").await?, vec!["File_Not_Found"]);
    assert_eq!(titles("%").await?, vec!["100% Wolf"]);
    assert!(titles("l_e").await?.is_empty());
    assert_eq!(titles("ALIEN").await?, vec!["Alien"]);
    Ok(())
}

#[tokio::test]
async fn movie_with_unknown_actor_is_not_created() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let err = catalog_service::create_movie(
        &state,
        CreateMovieRequest {
            title: "Ghost".into(),
            description: String::new(),
            actor_ids: vec![404],
            genre_ids: vec![],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert!(
        catalog_service::list_movies(&state, MovieFilter::default())
            .await?
            .is_empty()
    );
    Ok(())
}

#[tokio::test]
async fn hall_dimensions_must_be_positive() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let err = catalog_service::create_cinema_hall(
        &state,
        CreateCinemaHallRequest {
            name: "Broken".into(),
            rows: 0,
            seats_in_row: 10,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.range_field(), Some("rows"));

    let err = catalog_service::create_cinema_hall(
        &state,
        CreateCinemaHallRequest {
            name: "Broken".into(),
            rows: 10,
            seats_in_row: -1,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.range_field(), Some("seats_in_row"));

    let hall = create_hall(&state, 10, 15).await?;
    let fetched = catalog_service::get_cinema_hall(&state, hall.id).await?;
    assert_eq!(fetched.capacity(), 150);
    assert_eq!(catalog_service::list_cinema_halls(&state).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn sessions_are_filtered_by_day_and_movie() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let hall = create_hall(&state, 5, 5).await?;
    let alien = catalog_service::create_movie(
        &state,
        CreateMovieRequest {
            title: "Alien".into(),
            description: String::new(),
            ..Default::default()
        },
    )
    .await?;
    let aliens = catalog_service::create_movie(
        &state,
        CreateMovieRequest {
            title: "Aliens".into(),
            description: String::new(),
            ..Default::default()
        },
    )
    .await?;

    let times = [
        (alien.movie.id, Utc.with_ymd_and_hms(2025, 3, 14, 23, 0, 0).unwrap()),
        (alien.movie.id, Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap()),
        (aliens.movie.id, Utc.with_ymd_and_hms(2025, 3, 14, 18, 0, 0).unwrap()),
        (alien.movie.id, Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap()),
    ];
    for (movie_id, show_time) in times {
        catalog_service::create_movie_session(
            &state,
            CreateMovieSessionRequest {
                show_time,
                cinema_hall_id: hall.id,
                movie_id,
            },
        )
        .await?;
    }

    let day = catalog_service::list_movie_sessions(
        &state,
        MovieSessionFilter {
            date: NaiveDate::from_ymd_opt(2025, 3, 14),
            movie_id: None,
        },
    )
    .await?;
    assert_eq!(day.len(), 3);
    assert!(day.windows(2).all(|w| w[0].show_time <= w[1].show_time));

    let alien_that_day = catalog_service::list_movie_sessions(
        &state,
        MovieSessionFilter {
            date: NaiveDate::from_ymd_opt(2025, 3, 14),
            movie_id: Some(alien.movie.id),
        },
    )
    .await?;
    assert_eq!(alien_that_day.len(), 2);
    assert_eq!(
        alien_that_day[0].show_time,
        Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap()
    );

    let all = catalog_service::list_movie_sessions(&state, MovieSessionFilter::default()).await?;
    assert_eq!(all.len(), 4);
    Ok(())
}

#[tokio::test]
async fn session_requires_existing_hall_and_movie() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let hall = create_hall(&state, 5, 5).await?;
    let err = catalog_service::create_movie_session(
        &state,
        CreateMovieSessionRequest {
            show_time: Utc::now(),
            cinema_hall_id: hall.id,
            movie_id: 404,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert!(matches!(
        catalog_service::get_movie_session(&state, 404).await,
        Err(AppError::NotFound)
    ));
    Ok(())
}
