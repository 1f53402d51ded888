use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::orders::{CreateOrderRequest, NewTicket},
    entity::{
        cinema_halls::{Entity as CinemaHalls, Model as CinemaHallModel},
        movie_sessions::Entity as MovieSessions,
        orders::{self, Column as OrderCol, Entity as Orders},
        tickets::{self, Column as TicketCol, Entity as Tickets},
        users::Entity as Users,
    },
    error::{AppError, AppResult, is_foreign_key_violation, is_unique_violation},
    models::{CinemaHall, Order, OrderWithTickets, SeatPosition, SessionSeating, Ticket},
    pagination::{Meta, Page, Pagination},
    state::AppState,
};

/// Check that the ticket's seat exists in `hall`. Rows are checked before seats.
pub fn validate(ticket: &NewTicket, hall: &CinemaHallModel) -> AppResult<()> {
    if ticket.row < 1 || ticket.row > hall.rows {
        return Err(AppError::range(
            "row",
            format!(
                "row number must be in available range: (1, rows): (1, {})",
                hall.rows
            ),
        ));
    }
    if ticket.seat < 1 || ticket.seat > hall.seats_in_row {
        return Err(AppError::range(
            "seat",
            format!(
                "seat number must be in available range: (1, seats_in_row): (1, {})",
                hall.seats_in_row
            ),
        ));
    }
    Ok(())
}

/// Validate and persist a single ticket in its own transaction.
pub async fn save_ticket(state: &AppState, ticket: NewTicket) -> AppResult<Ticket> {
    let txn = state.orm.begin().await?;
    let saved = insert_ticket(&txn, ticket).await?;
    txn.commit().await?;
    Ok(saved)
}

async fn insert_ticket<C: ConnectionTrait>(conn: &C, ticket: NewTicket) -> AppResult<Ticket> {
    let (session, hall) = MovieSessions::find_by_id(ticket.movie_session_id)
        .find_also_related(CinemaHalls)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;
    let hall = hall.ok_or(AppError::NotFound)?;

    if let Err(err) = validate(&ticket, &hall) {
        tracing::warn!(
            movie_session_id = session.id,
            row = ticket.row,
            seat = ticket.seat,
            error = %err,
            "ticket rejected"
        );
        return Err(err);
    }

    let inserted = tickets::ActiveModel {
        movie_session_id: Set(session.id),
        order_id: Set(ticket.order_id),
        row: Set(ticket.row),
        seat: Set(ticket.seat),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            tracing::warn!(
                movie_session_id = session.id,
                row = ticket.row,
                seat = ticket.seat,
                "seat already taken"
            );
            AppError::Conflict(format!(
                "row {} seat {} is already taken for session {}",
                ticket.row, ticket.seat, session.id
            ))
        } else if is_foreign_key_violation(&err) {
            AppError::NotFound
        } else {
            AppError::from(err)
        }
    })?;

    Ok(inserted.into())
}

/// Create an order and all of its tickets atomically.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<OrderWithTickets> {
    let CreateOrderRequest { user_id, tickets } = payload;
    if tickets.is_empty() {
        return Err(AppError::BadRequest("Order has no tickets".into()));
    }

    let txn = state.orm.begin().await?;

    if Users::find_by_id(user_id).one(&txn).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let order = orders::ActiveModel {
        user_id: Set(user_id),
        ..orders::ActiveModel::new()
    }
    .insert(&txn)
    .await?;

    let mut saved = Vec::with_capacity(tickets.len());
    for request in tickets {
        saved.push(insert_ticket(&txn, request.for_order(order.id)).await?);
    }

    txn.commit().await?;

    tracing::info!(
        order_id = order.id,
        user_id,
        tickets = saved.len(),
        "order created"
    );

    Ok(OrderWithTickets {
        order: order.into(),
        tickets: saved,
    })
}

pub async fn get_order(state: &AppState, id: i32) -> AppResult<OrderWithTickets> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let tickets = order
        .find_related(Tickets)
        .order_by_asc(TicketCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Ticket::from)
        .collect();

    Ok(OrderWithTickets {
        order: order.into(),
        tickets,
    })
}

/// A user's orders, newest first.
pub async fn list_orders(
    state: &AppState,
    user_id: i32,
    pagination: Pagination,
) -> AppResult<Page<Order>> {
    let (page, per_page, offset) = pagination.normalize();

    let finder = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .order_by_desc(OrderCol::Id);

    let total = finder.clone().count(&state.orm).await?;

    let items = finder
        .limit(per_page)
        .offset(offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(Page {
        items,
        meta: Meta::new(page, per_page, total),
    })
}

/// Seats already sold for a session, ordered by row then seat.
pub async fn taken_seats(state: &AppState, movie_session_id: i32) -> AppResult<SessionSeating> {
    let (session, hall) = MovieSessions::find_by_id(movie_session_id)
        .find_also_related(CinemaHalls)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let hall = CinemaHall::from(hall.ok_or(AppError::NotFound)?);

    let taken = Tickets::find()
        .filter(TicketCol::MovieSessionId.eq(session.id))
        .order_by_asc(TicketCol::Row)
        .order_by_asc(TicketCol::Seat)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|t| SeatPosition {
            row: t.row,
            seat: t.seat,
        })
        .collect();

    Ok(SessionSeating {
        movie_session_id: session.id,
        capacity: hall.capacity(),
        taken,
    })
}
