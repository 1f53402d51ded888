use chrono::{Days, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
    sea_query::{Expr, Func, LikeExpr, Query},
};

use crate::{
    dto::catalog::{
        CreateActorRequest, CreateCinemaHallRequest, CreateMovieRequest,
        CreateMovieSessionRequest, MovieFilter, MovieSessionFilter,
    },
    entity::{
        actors::{self, Column as ActorCol, Entity as Actors},
        cinema_halls::{self, Column as HallCol, Entity as CinemaHalls},
        genres::{self, Column as GenreCol, Entity as Genres},
        movie_actors::{self, Column as MovieActorCol, Entity as MovieActors},
        movie_genres::{self, Column as MovieGenreCol, Entity as MovieGenres},
        movie_sessions::{self, Column as SessionCol, Entity as MovieSessions},
        movies::{self, Column as MovieCol, Entity as Movies},
    },
    error::{AppError, AppResult, is_unique_violation},
    models::{Actor, CinemaHall, Genre, Movie, MovieDetail, MovieSession, MovieSessionDetail},
    state::AppState,
};

pub async fn create_genre(state: &AppState, name: &str) -> AppResult<Genre> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Genre name must be set".into()));
    }

    let exist = Genres::find()
        .filter(GenreCol::Name.eq(name))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Duplicate(format!("Genre {name} already exists")));
    }

    let genre = genres::ActiveModel {
        name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(&state.orm)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::Duplicate(format!("Genre {name} already exists"))
        } else {
            AppError::from(err)
        }
    })?;

    tracing::info!(genre_id = genre.id, name = %genre.name, "genre created");
    Ok(genre.into())
}

pub async fn list_genres(state: &AppState) -> AppResult<Vec<Genre>> {
    let genres = Genres::find()
        .order_by_asc(GenreCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Genre::from)
        .collect();
    Ok(genres)
}

pub async fn create_actor(state: &AppState, payload: CreateActorRequest) -> AppResult<Actor> {
    let actor = actors::ActiveModel {
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(actor_id = actor.id, "actor created");
    Ok(actor.into())
}

pub async fn list_actors(state: &AppState) -> AppResult<Vec<Actor>> {
    let actors = Actors::find()
        .order_by_asc(ActorCol::LastName)
        .order_by_asc(ActorCol::FirstName)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Actor::from)
        .collect();
    Ok(actors)
}

/// Create a movie together with its actor and genre links.
pub async fn create_movie(state: &AppState, payload: CreateMovieRequest) -> AppResult<MovieDetail> {
    let CreateMovieRequest {
        title,
        description,
        actor_ids,
        genre_ids,
    } = payload;
    let actor_ids = dedup(actor_ids);
    let genre_ids = dedup(genre_ids);

    let txn = state.orm.begin().await?;

    let actors = Actors::find()
        .filter(ActorCol::Id.is_in(actor_ids.clone()))
        .order_by_asc(ActorCol::Id)
        .all(&txn)
        .await?;
    let genres = Genres::find()
        .filter(GenreCol::Id.is_in(genre_ids.clone()))
        .order_by_asc(GenreCol::Id)
        .all(&txn)
        .await?;
    if actors.len() != actor_ids.len() || genres.len() != genre_ids.len() {
        return Err(AppError::NotFound);
    }

    let movie = movies::ActiveModel {
        title: Set(title),
        description: Set(description),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    link_movie(&txn, movie.id, &actor_ids, &genre_ids).await?;

    txn.commit().await?;

    tracing::info!(
        movie_id = movie.id,
        actors = actors.len(),
        genres = genres.len(),
        "movie created"
    );

    Ok(MovieDetail {
        movie: movie.into(),
        actors: actors.into_iter().map(Actor::from).collect(),
        genres: genres.into_iter().map(Genre::from).collect(),
    })
}

async fn link_movie<C: ConnectionTrait>(
    conn: &C,
    movie_id: i32,
    actor_ids: &[i32],
    genre_ids: &[i32],
) -> AppResult<()> {
    if !actor_ids.is_empty() {
        MovieActors::insert_many(actor_ids.iter().map(|&actor_id| movie_actors::ActiveModel {
            movie_id: Set(movie_id),
            actor_id: Set(actor_id),
        }))
        .exec_without_returning(conn)
        .await?;
    }
    if !genre_ids.is_empty() {
        MovieGenres::insert_many(genre_ids.iter().map(|&genre_id| movie_genres::ActiveModel {
            movie_id: Set(movie_id),
            genre_id: Set(genre_id),
        }))
        .exec_without_returning(conn)
        .await?;
    }
    Ok(())
}

pub async fn get_movie(state: &AppState, id: i32) -> AppResult<MovieDetail> {
    let movie = Movies::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let actors = movie
        .find_related(Actors)
        .order_by_asc(ActorCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Actor::from)
        .collect();
    let genres = movie
        .find_related(Genres)
        .order_by_asc(GenreCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Genre::from)
        .collect();

    Ok(MovieDetail {
        movie: movie.into(),
        actors,
        genres,
    })
}

/// Movies matching every filter that is set: a case-insensitive title
/// substring, any of `genre_ids`, and any of `actor_ids`.
pub async fn list_movies(state: &AppState, filter: MovieFilter) -> AppResult<Vec<Movie>> {
    let mut finder = Movies::find();

    if let Some(title) = filter.title.as_ref().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_like(&title.to_lowercase()));
        finder = finder.filter(
            Expr::expr(Func::lower(Expr::col((Movies, MovieCol::Title))))
                .like(LikeExpr::new(pattern).escape('\\')),
        );
    }
    if !filter.genre_ids.is_empty() {
        finder = finder.filter(
            MovieCol::Id.in_subquery(
                Query::select()
                    .column(MovieGenreCol::MovieId)
                    .from(MovieGenres)
                    .and_where(MovieGenreCol::GenreId.is_in(filter.genre_ids))
                    .to_owned(),
            ),
        );
    }
    if !filter.actor_ids.is_empty() {
        finder = finder.filter(
            MovieCol::Id.in_subquery(
                Query::select()
                    .column(MovieActorCol::MovieId)
                    .from(MovieActors)
                    .and_where(MovieActorCol::ActorId.is_in(filter.actor_ids))
                    .to_owned(),
            ),
        );
    }

    let movies = finder
        .order_by_asc(MovieCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Movie::from)
        .collect();
    Ok(movies)
}

pub async fn create_cinema_hall(
    state: &AppState,
    payload: CreateCinemaHallRequest,
) -> AppResult<CinemaHall> {
    if payload.rows < 1 {
        return Err(AppError::range("rows", "rows must be a positive number"));
    }
    if payload.seats_in_row < 1 {
        return Err(AppError::range(
            "seats_in_row",
            "seats_in_row must be a positive number",
        ));
    }

    let hall = cinema_halls::ActiveModel {
        name: Set(payload.name),
        rows: Set(payload.rows),
        seats_in_row: Set(payload.seats_in_row),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(
        cinema_hall_id = hall.id,
        rows = hall.rows,
        seats_in_row = hall.seats_in_row,
        "cinema hall created"
    );
    Ok(hall.into())
}

pub async fn get_cinema_hall(state: &AppState, id: i32) -> AppResult<CinemaHall> {
    let hall = CinemaHalls::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(hall.into())
}

pub async fn list_cinema_halls(state: &AppState) -> AppResult<Vec<CinemaHall>> {
    let halls = CinemaHalls::find()
        .order_by_asc(HallCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(CinemaHall::from)
        .collect();
    Ok(halls)
}

pub async fn create_movie_session(
    state: &AppState,
    payload: CreateMovieSessionRequest,
) -> AppResult<MovieSession> {
    if CinemaHalls::find_by_id(payload.cinema_hall_id)
        .one(&state.orm)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound);
    }
    if Movies::find_by_id(payload.movie_id)
        .one(&state.orm)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound);
    }

    let session = movie_sessions::ActiveModel {
        show_time: Set(payload.show_time.into()),
        cinema_hall_id: Set(payload.cinema_hall_id),
        movie_id: Set(payload.movie_id),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(
        movie_session_id = session.id,
        movie_id = session.movie_id,
        cinema_hall_id = session.cinema_hall_id,
        "movie session created"
    );
    Ok(session.into())
}

pub async fn get_movie_session(state: &AppState, id: i32) -> AppResult<MovieSessionDetail> {
    let (session, movie) = MovieSessions::find_by_id(id)
        .find_also_related(Movies)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let movie = movie.ok_or(AppError::NotFound)?;
    let hall = session
        .find_related(CinemaHalls)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(MovieSessionDetail {
        id: session.id,
        show_time: session.show_time.with_timezone(&Utc),
        movie: movie.into(),
        cinema_hall: hall.into(),
    })
}

/// Sessions ordered by show time, optionally limited to one day and/or one movie.
pub async fn list_movie_sessions(
    state: &AppState,
    filter: MovieSessionFilter,
) -> AppResult<Vec<MovieSession>> {
    let mut finder = MovieSessions::find();

    if let Some(date) = filter.date {
        let start = date.and_time(Default::default()).and_utc();
        let end = start
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::BadRequest(format!("Invalid date {date}")))?;
        finder = finder
            .filter(SessionCol::ShowTime.gte(start.fixed_offset()))
            .filter(SessionCol::ShowTime.lt(end.fixed_offset()));
    }
    if let Some(movie_id) = filter.movie_id {
        finder = finder.filter(SessionCol::MovieId.eq(movie_id));
    }

    let sessions = finder
        .order_by_asc(SessionCol::ShowTime)
        .order_by_asc(SessionCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(MovieSession::from)
        .collect();
    Ok(sessions)
}

/// Make `%`, `_` and `\\` match literally in a `LIKE ... ESCAPE '\\'` pattern.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn dedup(mut ids: Vec<i32>) -> Vec<i32> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("alien"), "alien");
    }
}
