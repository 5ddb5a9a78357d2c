pub mod app;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod source;
pub mod state;
pub mod ui;
pub mod wages;

pub use app::router;
pub use config::Config;
pub use state::AppState;
