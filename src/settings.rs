use crate::config::WidgetConfig;
use crate::errors::SettingsError;
use crate::models::{ColorTheme, Settings};
use tracing::warn;

pub const MIN_DAILY_GOAL: i64 = 1;
pub const MAX_DAILY_GOAL: i64 = 20;

/// Returns whether the goal changed. Values outside `1..=20` are ignored.
pub fn set_daily_goal(settings: &mut Settings, goal: i64) -> bool {
    if !(MIN_DAILY_GOAL..=MAX_DAILY_GOAL).contains(&goal) {
        return false;
    }
    let goal = goal as u32;
    let changed = settings.daily_goal != goal;
    settings.daily_goal = goal;
    changed
}

pub fn set_color(settings: &mut Settings, color: &str) -> Result<ColorTheme, SettingsError> {
    let theme = ColorTheme::parse(color).ok_or_else(|| SettingsError::UnknownColor(color.to_string()))?;
    settings.color = theme;
    Ok(theme)
}

pub fn set_notifications_enabled(settings: &mut Settings, enabled: bool) {
    settings.notifications_enabled = enabled;
}

/// Accepts `H:MM` or `HH:MM` on a 24-hour clock and returns the zero-padded form.
pub fn normalize_time(text: &str) -> Result<String, SettingsError> {
    let text = text.trim();
    let invalid = || SettingsError::InvalidTime(text.to_string());

    let (hours, minutes) = text.split_once(':').ok_or_else(invalid)?;
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !(1..=2).contains(&hours.len()) || minutes.len() != 2 || !digits(hours) || !digits(minutes) {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    Ok(format!("{hours:02}:{minutes:02}"))
}

/// Adds a reminder time, keeping the list sorted and free of duplicates.
/// Returns whether the time was new.
pub fn add_notification_time(settings: &mut Settings, text: &str) -> Result<bool, SettingsError> {
    let time = normalize_time(text)?;
    if settings.notification_times.contains(&time) {
        return Ok(false);
    }
    settings.notification_times.push(time);
    settings.notification_times.sort();
    Ok(true)
}

pub fn remove_notification_time(settings: &mut Settings, time: &str) -> bool {
    let Ok(time) = normalize_time(time) else {
        return false;
    };
    let before = settings.notification_times.len();
    settings.notification_times.retain(|existing| *existing != time);
    settings.notification_times.len() != before
}

/// Brings hand-edited reminder times back to zero-padded, unique and sorted.
/// Malformed entries are dropped.
pub fn normalize(settings: &mut Settings) {
    let mut times: Vec<String> = settings
        .notification_times
        .iter()
        .filter_map(|time| match normalize_time(time) {
            Ok(time) => Some(time),
            Err(_) => {
                warn!("dropping malformed notification time {time:?}");
                None
            }
        })
        .collect();
    times.sort();
    times.dedup();
    settings.notification_times = times;
}

/// Preset times not yet configured, in preset order.
pub fn available_preset_times(config: &WidgetConfig, settings: &Settings) -> Vec<String> {
    config
        .preset_times
        .iter()
        .filter(|time| !settings.notification_times.iter().any(|existing| existing == *time))
        .map(|time| time.to_string())
        .collect()
}

pub fn apply_preset_schedule(
    config: &WidgetConfig,
    settings: &mut Settings,
    preset: usize,
) -> Result<&'static str, SettingsError> {
    let schedule = config
        .preset_schedules
        .get(preset)
        .ok_or(SettingsError::UnknownPreset(preset))?;
    settings.notification_times = schedule.times.iter().map(|time| time.to_string()).collect();
    Ok(schedule.name)
}
