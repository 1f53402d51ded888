use sea_orm::entity::prelude::*;

/// One sold seat. `(row, seat, movie_session_id)` is unique in the store
/// (`unique_ticket_per_seat`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub movie_session_id: i32,
    pub order_id: i32,
    pub row: i32,
    pub seat: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie_sessions::Entity",
        from = "Column::MovieSessionId",
        to = "super::movie_sessions::Column::Id",
        on_delete = "Cascade"
    )]
    MovieSessions,
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id",
        on_delete = "Cascade"
    )]
    Orders,
}

impl Related<super::movie_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieSessions.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
