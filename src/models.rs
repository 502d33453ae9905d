use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Green,
    Blue,
    Orange,
    Yellow,
}

impl ColorTheme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "green" => Some(Self::Green),
            "blue" => Some(Self::Blue),
            "orange" => Some(Self::Orange),
            "yellow" => Some(Self::Yellow),
            _ => None,
        }
    }
}

/// Persisted user settings. Keys missing from `settings.json` fall back to
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub daily_goal: u32,
    pub color: ColorTheme,
    pub notifications_enabled: bool,
    pub notification_times: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_goal: 2,
            color: ColorTheme::Green,
            notifications_enabled: true,
            notification_times: vec!["09:00".to_string(), "15:00".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub today: usize,
    pub yesterday: usize,
    pub week: usize,
    pub month: usize,
    pub year: usize,
    pub current_streak: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
    pub count: usize,
    pub daily_goal: u32,
    pub progress: f64,
    pub emoji: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub daily_goal: u32,
    pub progress: f64,
    #[serde(flatten)]
    pub snapshot: StatsSnapshot,
    pub goal_days_last_7: usize,
    pub goal_days_last_30: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickOutcome {
    Confirm,
    GoalAchieved,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WidgetClickResponse {
    pub outcome: ClickOutcome,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub goal: i64,
}

#[derive(Debug, Deserialize)]
pub struct ColorRequest {
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct NotificationsRequest {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct TimeRequest {
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct PresetRequest {
    pub preset: usize,
}

/// A reminder handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub identifier: String,
    pub title: String,
    pub body: String,
    pub trigger_at: DateTime<Utc>,
    pub open_url: String,
}
