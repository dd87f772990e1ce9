use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, patch, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/today", get(handlers::get_today))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/history", get(handlers::get_history))
        .route("/api/entries", get(handlers::list_entries).post(handlers::create_entry))
        .route("/api/entries/:id", patch(handlers::update_entry).delete(handlers::delete_entry))
        .route("/api/goals", get(handlers::get_goals).put(handlers::put_goals))
        .route("/api/onboarding", post(handlers::onboarding))
        .route("/api/water", get(handlers::get_water).post(handlers::water))
        .route("/api/scan", post(handlers::scan))
        .with_state(state)
}
