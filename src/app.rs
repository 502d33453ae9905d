use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/ring.svg", get(handlers::ring_svg))
        .route("/click/smile", post(handlers::click_smile))
        .route("/api/today", get(handlers::get_today))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/smile", post(handlers::add_smile))
        .route("/api/widget", post(handlers::widget_click))
        .route("/api/settings", get(handlers::get_settings))
        .route("/api/settings/goal", post(handlers::update_goal))
        .route("/api/settings/color", post(handlers::update_color))
        .route("/api/settings/notifications", post(handlers::update_notifications))
        .route("/api/settings/times", post(handlers::add_time))
        .route("/api/settings/times/remove", post(handlers::remove_time))
        .route("/api/settings/times/preset", post(handlers::apply_preset))
        .route("/api/settings/times/available", get(handlers::available_times))
        .route("/api/notifications", get(handlers::get_notifications))
        .route("/api/notifications/schedule", post(handlers::schedule_notifications))
        .with_state(state)
}
