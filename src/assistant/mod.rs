use crate::state::AppState;
use axum::Router;

pub mod client;
pub mod dto;
pub mod handlers;
pub mod prompt;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::ask_routes()
}
