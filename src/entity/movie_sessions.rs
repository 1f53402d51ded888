use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movie_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub show_time: DateTimeWithTimeZone,
    pub cinema_hall_id: i32,
    pub movie_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cinema_halls::Entity",
        from = "Column::CinemaHallId",
        to = "super::cinema_halls::Column::Id",
        on_delete = "Cascade"
    )]
    CinemaHalls,
    #[sea_orm(
        belongs_to = "super::movies::Entity",
        from = "Column::MovieId",
        to = "super::movies::Column::Id",
        on_delete = "Cascade"
    )]
    Movies,
    #[sea_orm(has_many = "super::tickets::Entity")]
    Tickets,
}

impl Related<super::cinema_halls::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CinemaHalls.def()
    }
}

impl Related<super::movies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movies.def()
    }
}

impl Related<super::tickets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tickets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
