pub mod actors;
pub mod cinema_halls;
pub mod genres;
pub mod movie_actors;
pub mod movie_genres;
pub mod movie_sessions;
pub mod movies;
pub mod orders;
pub mod tickets;
pub mod users;

pub use actors::Entity as Actors;
pub use cinema_halls::Entity as CinemaHalls;
pub use genres::Entity as Genres;
pub use movie_actors::Entity as MovieActors;
pub use movie_genres::Entity as MovieGenres;
pub use movie_sessions::Entity as MovieSessions;
pub use movies::Entity as Movies;
pub use orders::Entity as Orders;
pub use tickets::Entity as Tickets;
pub use users::Entity as Users;
