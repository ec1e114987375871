use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod matcher;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::read_routes()
}
