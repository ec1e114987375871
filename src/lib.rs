pub mod app;
pub mod assistant;
pub mod auth;
pub mod config;
pub mod error;
pub mod recipes;
pub mod schedule;
pub mod session;
pub mod state;
pub mod store;
pub mod users;
