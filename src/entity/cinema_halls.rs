use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cinema_halls")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_sessions::Entity")]
    MovieSessions,
}

impl Related<super::movie_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
