use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/summary", get(handlers::summary_page))
        .route("/api/session", get(handlers::get_session))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/signin", post(handlers::sign_in))
        .route("/api/logout", post(handlers::logout))
        .route("/api/save", post(handlers::save))
        .route("/api/day", post(handlers::edit_day))
        .route("/api/week", post(handlers::edit_week))
        .route("/api/start-date", post(handlers::set_start_date))
        .route("/api/navigate", post(handlers::navigate))
        .with_state(state)
}
