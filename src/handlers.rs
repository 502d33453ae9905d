use crate::config::Appearance;
use crate::errors::{AppError, SettingsError};
use crate::models::{
    ClickOutcome, ColorRequest, GoalRequest, NotificationsRequest, PresetRequest, Reminder,
    Settings, StatsResponse, TimeRequest, TodayResponse, WidgetClickResponse,
};
use crate::notifications::{DocumentNotifier, Notifier, schedule_reminders};
use crate::ring::{DEFAULT_RING_SIZE, background_color, progress_color, render_ring_svg};
use crate::settings;
use crate::state::AppState;
use crate::stats::{
    build_stats, build_today, goal_achieved_message, progress_percent, today_count,
};
use crate::storage::{EventStore, load_settings, load_settings_for_update, save_settings};
use crate::ui::{ClickDialog, WidgetView, render_widget};
use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
};
use chrono::{Local, Utc};
use serde::Deserialize;
use tracing::{error, info};

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub appearance: Option<String>,
    pub action: Option<String>,
    pub size: Option<f64>,
}

impl ViewQuery {
    fn appearance(&self, fallback: Appearance) -> Appearance {
        self.appearance
            .as_deref()
            .and_then(Appearance::parse)
            .unwrap_or(fallback)
    }
}

pub async fn index(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Html<String> {
    let appearance = query.appearance(state.appearance);
    let settings = load_settings(state.store.as_ref()).await;
    let events = EventStore::new(state.store.as_ref()).load().await;
    let now = Local::now();

    let today = build_today(&state.config, &events, &settings, &now);
    let stats = build_stats(&events, &settings, &now);
    let dialog = match query.action.as_deref() {
        Some("widget") => Some(click_dialog(&state, today.count, settings.daily_goal)),
        _ => None,
    };

    // Rendering the widget refreshes the reminder schedule in the background.
    let background = state.clone();
    tokio::spawn(async move {
        if let Err(err) = reschedule(&background).await {
            error!("failed to schedule reminders: {}", err.message);
        }
    });

    Html(render_widget(&WidgetView {
        ring_svg: render_ring_svg(
            &state.config,
            settings.color,
            appearance,
            today.progress,
            DEFAULT_RING_SIZE,
        ),
        accent: progress_color(&state.config, settings.color, appearance).to_css(),
        background: background_color(&state.config, settings.color, appearance, today.progress)
            .to_css(),
        dark: appearance.is_dark(),
        today,
        stats,
        dialog,
    }))
}

pub async fn ring_svg(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    let appearance = query.appearance(state.appearance);
    let size = query
        .size
        .filter(|size| size.is_finite() && *size > 0.0)
        .unwrap_or(DEFAULT_RING_SIZE);
    let settings = load_settings(state.store.as_ref()).await;
    let events = EventStore::new(state.store.as_ref()).load().await;
    let progress = progress_percent(today_count(&events, &Local::now()), settings.daily_goal);

    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        render_ring_svg(&state.config, settings.color, appearance, progress, size),
    )
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let settings = load_settings(state.store.as_ref()).await;
    let events = EventStore::new(state.store.as_ref()).load().await;
    Ok(Json(build_today(&state.config, &events, &settings, &Local::now())))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let settings = load_settings(state.store.as_ref()).await;
    let events = EventStore::new(state.store.as_ref()).load().await;
    Ok(Json(build_stats(&events, &settings, &Local::now())))
}

pub async fn add_smile(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    Ok(Json(record_smile(&state).await?))
}

pub async fn click_smile(State(state): State<AppState>) -> Result<Redirect, AppError> {
    record_smile(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn widget_click(
    State(state): State<AppState>,
) -> Result<Json<WidgetClickResponse>, AppError> {
    let settings = load_settings(state.store.as_ref()).await;
    let events = EventStore::new(state.store.as_ref()).load().await;
    let count = today_count(&events, &Local::now());
    let dialog = click_dialog(&state, count, settings.daily_goal);

    Ok(Json(WidgetClickResponse {
        outcome: dialog.outcome,
        title: dialog.title,
        message: dialog.message,
    }))
}

pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(load_settings(state.store.as_ref()).await)
}

pub async fn update_goal(
    State(state): State<AppState>,
    Json(payload): Json<GoalRequest>,
) -> Result<Json<Settings>, AppError> {
    let settings = update_settings(&state, |current| {
        Ok(settings::set_daily_goal(current, payload.goal))
    })
    .await?;
    Ok(Json(settings))
}

pub async fn update_color(
    State(state): State<AppState>,
    Json(payload): Json<ColorRequest>,
) -> Result<Json<Settings>, AppError> {
    let settings = update_settings(&state, |current| {
        settings::set_color(current, &payload.color).map(|_| true)
    })
    .await?;
    Ok(Json(settings))
}

pub async fn update_notifications(
    State(state): State<AppState>,
    Json(payload): Json<NotificationsRequest>,
) -> Result<Json<Settings>, AppError> {
    let settings = update_settings(&state, |current| {
        settings::set_notifications_enabled(current, payload.enabled);
        Ok(true)
    })
    .await?;
    Ok(Json(settings))
}

pub async fn add_time(
    State(state): State<AppState>,
    Json(payload): Json<TimeRequest>,
) -> Result<Json<Settings>, AppError> {
    let settings = update_settings(&state, |current| {
        settings::add_notification_time(current, &payload.time)
    })
    .await?;
    Ok(Json(settings))
}

pub async fn remove_time(
    State(state): State<AppState>,
    Json(payload): Json<TimeRequest>,
) -> Result<Json<Settings>, AppError> {
    let settings = update_settings(&state, |current| {
        Ok(settings::remove_notification_time(current, &payload.time))
    })
    .await?;
    Ok(Json(settings))
}

pub async fn apply_preset(
    State(state): State<AppState>,
    Json(payload): Json<PresetRequest>,
) -> Result<Json<Settings>, AppError> {
    let config = state.config.clone();
    let settings = update_settings(&state, |current| {
        settings::apply_preset_schedule(&config, current, payload.preset).map(|_| true)
    })
    .await?;
    Ok(Json(settings))
}

pub async fn available_times(State(state): State<AppState>) -> Json<Vec<String>> {
    let settings = load_settings(state.store.as_ref()).await;
    Json(settings::available_preset_times(&state.config, &settings))
}

pub async fn get_notifications(State(state): State<AppState>) -> Json<Vec<Reminder>> {
    Json(DocumentNotifier::new(state.store.as_ref()).pending().await)
}

pub async fn schedule_notifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<Reminder>>, AppError> {
    reschedule(&state).await?;
    Ok(Json(DocumentNotifier::new(state.store.as_ref()).pending().await))
}

async fn record_smile(state: &AppState) -> Result<TodayResponse, AppError> {
    let _guard = state.write_lock.lock().await;
    let events = EventStore::new(state.store.as_ref());
    let total = events.append(Utc::now()).await?;
    info!("recorded smile, {total} in log");

    let settings = load_settings(state.store.as_ref()).await;
    let logged = events.load().await;
    Ok(build_today(&state.config, &logged, &settings, &Local::now()))
}

/// Loads settings, applies one edit and persists the result when it changed.
/// A settings file that cannot be decoded is left alone and reported as a 500.
async fn update_settings<F>(state: &AppState, apply: F) -> Result<Settings, AppError>
where
    F: FnOnce(&mut Settings) -> Result<bool, SettingsError>,
{
    let _guard = state.write_lock.lock().await;
    let mut settings = load_settings_for_update(state.store.as_ref()).await?;
    if apply(&mut settings)? {
        save_settings(state.store.as_ref(), &settings).await?;
        info!("settings updated: {settings:?}");
    }
    Ok(settings)
}

async fn reschedule(state: &AppState) -> Result<usize, AppError> {
    let _guard = state.write_lock.lock().await;
    let settings = load_settings(state.store.as_ref()).await;
    let notifier = DocumentNotifier::new(state.store.as_ref());
    let now = Local::now();
    Ok(schedule_reminders(&notifier, &state.config, &settings, &now).await?)
}

fn click_dialog(state: &AppState, today_count: usize, daily_goal: u32) -> ClickDialog {
    if today_count >= daily_goal as usize {
        let seed = Utc::now().timestamp_millis().unsigned_abs();
        ClickDialog {
            outcome: ClickOutcome::GoalAchieved,
            title: "Daily Goal Achieved! 🎯".to_string(),
            message: goal_achieved_message(&state.config, seed).to_string(),
        }
    } else {
        ClickDialog {
            outcome: ClickOutcome::Confirm,
            title: "Smile Moment! 😊".to_string(),
            message: "Did you take a moment to smile?".to_string(),
        }
    }
}
