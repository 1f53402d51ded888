use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len_uniq(Users::Username, 150))
                    .col(string(Users::PasswordHash))
                    .col(string_len_null(Users::Email, 254))
                    .col(string_len(Users::FirstName, 150))
                    .col(string_len(Users::LastName, 150))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(pk_auto(Orders::Id))
                    .col(timestamp_with_time_zone(Orders::CreatedAt))
                    .col(integer(Orders::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_user_id")
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_user_created_at")
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .col(Orders::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(pk_auto(Tickets::Id))
                    .col(integer(Tickets::MovieSessionId))
                    .col(integer(Tickets::OrderId))
                    .col(integer(Tickets::Row))
                    .col(integer(Tickets::Seat))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_movie_session_id")
                            .from(Tickets::Table, Tickets::MovieSessionId)
                            .to(MovieSessions::Table, MovieSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_order_id")
                            .from(Tickets::Table, Tickets::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One ticket per seat per session. Ticket saves rely on this index
        // to reject concurrent double bookings.
        manager
            .create_index(
                Index::create()
                    .name("unique_ticket_per_seat")
                    .table(Tickets::Table)
                    .col(Tickets::Row)
                    .col(Tickets::Seat)
                    .col(Tickets::MovieSessionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Tickets::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Orders::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Email,
    FirstName,
    LastName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    CreatedAt,
    UserId,
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    Id,
    MovieSessionId,
    OrderId,
    Row,
    Seat,
}

#[derive(DeriveIden)]
enum MovieSessions {
    Table,
    Id,
}
