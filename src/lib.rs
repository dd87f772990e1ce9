pub mod app;
pub mod clock;
pub mod config;
pub mod errors;
pub mod filters;
pub mod goals;
pub mod handlers;
pub mod models;
pub mod nutrition;
pub mod progress;
pub mod recognition;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{load_log, persist_log};
pub use store::FoodStore;
