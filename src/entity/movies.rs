use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_actors::Entity")]
    MovieActors,
    #[sea_orm(has_many = "super::movie_genres::Entity")]
    MovieGenres,
    #[sea_orm(has_many = "super::movie_sessions::Entity")]
    MovieSessions,
}

impl Related<super::movie_actors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieActors.def()
    }
}

impl Related<super::movie_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieGenres.def()
    }
}

impl Related<super::movie_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieSessions.def()
    }
}

impl Related<super::actors::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_actors::Relation::Actors.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_actors::Relation::Movies.def().rev())
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_genres::Relation::Genres.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_genres::Relation::Movies.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
