pub mod backend;
pub mod cache;
pub mod controller;
pub mod gate;

pub use backend::{Backend, LocalBackend};
pub use controller::{ChatTurn, FetchTicket, LoadPlan, MealTab, SessionController, DAYS};
pub use gate::{SessionEvent, SessionState};
