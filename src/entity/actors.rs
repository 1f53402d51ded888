use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "actors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_actors::Entity")]
    MovieActors,
}

impl Related<super::movie_actors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieActors.def()
    }
}

impl Related<super::movies::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_actors::Relation::Movies.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_actors::Relation::Actors.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
