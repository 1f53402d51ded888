use serde::Deserialize;

/// A seat requested as part of an order.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TicketRequest {
    pub movie_session_id: i32,
    pub row: i32,
    pub seat: i32,
}

impl TicketRequest {
    pub fn for_order(self, order_id: i32) -> NewTicket {
        NewTicket {
            movie_session_id: self.movie_session_id,
            order_id,
            row: self.row,
            seat: self.seat,
        }
    }
}

/// A ticket ready to be validated and saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTicket {
    pub movie_session_id: i32,
    pub order_id: i32,
    pub row: i32,
    pub seat: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: i32,
    pub tickets: Vec<TicketRequest>,
}
