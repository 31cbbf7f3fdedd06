pub mod badge;
pub mod dto;
pub mod routes;
