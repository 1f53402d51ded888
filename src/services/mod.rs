pub mod catalog_service;
pub mod ticket_service;
pub mod user_service;
