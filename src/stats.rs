use crate::config::WidgetConfig;
use crate::models::{Settings, StatsResponse, StatsSnapshot, TodayResponse};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};
use std::collections::HashMap;

/// Streaks are only looked for within the last year.
pub const STREAK_LOOKBACK_DAYS: i64 = 365;

pub const WEEK_DAYS: i64 = 7;
pub const MONTH_DAYS: i64 = 30;
pub const YEAR_DAYS: i64 = 365;

pub fn count_on_date<Tz: TimeZone>(events: &[DateTime<Utc>], day: NaiveDate, tz: &Tz) -> usize {
    events
        .iter()
        .filter(|event| event.with_timezone(tz).date_naive() == day)
        .count()
}

pub fn today_count<Tz: TimeZone>(events: &[DateTime<Utc>], now: &DateTime<Tz>) -> usize {
    count_on_date(events, now.date_naive(), &now.timezone())
}

/// Previous calendar day, not the last 24 hours.
pub fn yesterday_count<Tz: TimeZone>(events: &[DateTime<Utc>], now: &DateTime<Tz>) -> usize {
    count_on_date(events, now.date_naive() - Duration::days(1), &now.timezone())
}

/// Events at or after `now - window_days` days.
pub fn rolling_count<Tz: TimeZone>(
    events: &[DateTime<Utc>],
    now: &DateTime<Tz>,
    window_days: i64,
) -> usize {
    let cutoff = now.with_timezone(&Utc) - Duration::days(window_days);
    events.iter().filter(|event| **event >= cutoff).count()
}

fn day_counts<Tz: TimeZone>(events: &[DateTime<Utc>], tz: &Tz) -> HashMap<NaiveDate, usize> {
    let mut counts = HashMap::new();
    for event in events {
        *counts.entry(event.with_timezone(tz).date_naive()).or_insert(0) += 1;
    }
    counts
}

/// Consecutive days, ending today, on which the goal was met.
pub fn current_streak<Tz: TimeZone>(
    events: &[DateTime<Utc>],
    now: &DateTime<Tz>,
    daily_goal: u32,
) -> usize {
    let counts = day_counts(events, &now.timezone());
    let today = now.date_naive();
    (0..STREAK_LOOKBACK_DAYS)
        .map(|offset| today - Duration::days(offset))
        .take_while(|day| counts.get(day).copied().unwrap_or(0) >= daily_goal as usize)
        .count()
}

/// How many of the last `days_back` days (today included) met the goal.
pub fn goal_achievements<Tz: TimeZone>(
    events: &[DateTime<Utc>],
    now: &DateTime<Tz>,
    daily_goal: u32,
    days_back: i64,
) -> usize {
    let counts = day_counts(events, &now.timezone());
    let today = now.date_naive();
    (0..days_back)
        .map(|offset| today - Duration::days(offset))
        .filter(|day| counts.get(day).copied().unwrap_or(0) >= daily_goal as usize)
        .count()
}

pub fn progress_percent(today_count: usize, daily_goal: u32) -> f64 {
    if daily_goal == 0 {
        return 100.0;
    }
    (today_count as f64 / f64::from(daily_goal) * 100.0).min(100.0)
}

pub fn progress_emoji(config: &WidgetConfig, progress: f64) -> &'static str {
    let last = config.emojis.len() - 1;
    let tier = (progress.max(0.0) / 25.0).floor() as usize;
    config.emojis[tier.min(last)]
}

pub fn message_pool(config: &WidgetConfig, today_count: usize, daily_goal: u32) -> &'static [&'static str] {
    if today_count == 0 {
        config.no_smiles_messages
    } else if today_count < daily_goal as usize {
        config.progress_messages
    } else {
        config.goal_reached_messages
    }
}

/// Rotates through the pool by day of month, hour and count so the text
/// changes during the day without any stored state.
pub fn motivational_message<Tz: TimeZone>(
    config: &WidgetConfig,
    today_count: usize,
    daily_goal: u32,
    now: &DateTime<Tz>,
) -> &'static str {
    let pool = message_pool(config, today_count, daily_goal);
    let seed = now.day() as usize + now.hour() as usize + today_count;
    pool[seed % pool.len()]
}

pub fn goal_achieved_message(config: &WidgetConfig, seed: u64) -> &'static str {
    let lines = config.goal_achieved_lines;
    lines[(seed % lines.len() as u64) as usize]
}

pub fn snapshot<Tz: TimeZone>(
    events: &[DateTime<Utc>],
    now: &DateTime<Tz>,
    daily_goal: u32,
) -> StatsSnapshot {
    StatsSnapshot {
        today: today_count(events, now),
        yesterday: yesterday_count(events, now),
        week: rolling_count(events, now, WEEK_DAYS),
        month: rolling_count(events, now, MONTH_DAYS),
        year: rolling_count(events, now, YEAR_DAYS),
        current_streak: current_streak(events, now, daily_goal),
    }
}

pub fn build_stats<Tz: TimeZone>(
    events: &[DateTime<Utc>],
    settings: &Settings,
    now: &DateTime<Tz>,
) -> StatsResponse {
    let snapshot = snapshot(events, now, settings.daily_goal);
    StatsResponse {
        daily_goal: settings.daily_goal,
        progress: progress_percent(snapshot.today, settings.daily_goal),
        goal_days_last_7: goal_achievements(events, now, settings.daily_goal, WEEK_DAYS),
        goal_days_last_30: goal_achievements(events, now, settings.daily_goal, MONTH_DAYS),
        snapshot,
    }
}

pub fn build_today<Tz: TimeZone>(
    config: &WidgetConfig,
    events: &[DateTime<Utc>],
    settings: &Settings,
    now: &DateTime<Tz>,
) -> TodayResponse {
    let count = today_count(events, now);
    let progress = progress_percent(count, settings.daily_goal);
    TodayResponse {
        date: now.date_naive().to_string(),
        count,
        daily_goal: settings.daily_goal,
        progress,
        emoji: progress_emoji(config, progress).to_string(),
        message: motivational_message(config, count, settings.daily_goal, now).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    fn at(day: u32, hour: u32, minute: u32, second: u32) -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(2026, 3, day, hour, minute, second).unwrap()
    }

    fn utc(local: DateTime<FixedOffset>) -> DateTime<Utc> {
        local.with_timezone(&Utc)
    }

    /// `per_day` goal-meeting events on each of the `days` days ending at `now`.
    fn history(now: DateTime<FixedOffset>, days: i64, per_day: usize) -> Vec<DateTime<Utc>> {
        let mut events = Vec::new();
        for offset in 0..days {
            for _ in 0..per_day {
                events.push(utc(now - Duration::days(offset)));
            }
        }
        events
    }

    #[test]
    fn midnight_boundary_splits_days() {
        let now = at(10, 12, 0, 0);
        let events = vec![utc(at(9, 23, 59, 59)), utc(at(10, 0, 0, 0))];
        assert_eq!(today_count(&events, &now), 1);
        assert_eq!(yesterday_count(&events, &now), 1);
    }

    #[test]
    fn yesterday_is_a_calendar_day_not_a_window() {
        let now = at(10, 1, 0, 0);
        // 20 hours ago is yesterday; 30 hours ago is two days back.
        let events = vec![utc(now - Duration::hours(20)), utc(now - Duration::hours(30))];
        assert_eq!(yesterday_count(&events, &now), 1);
        assert_eq!(rolling_count(&events, &now, 1), 1);
    }

    #[test]
    fn rolling_windows_use_continuous_cutoff() {
        let now = at(20, 12, 0, 0);
        let events = vec![
            utc(now - Duration::days(7)),
            utc(now - Duration::days(7) - Duration::seconds(1)),
            utc(now - Duration::days(29)),
            utc(now - Duration::days(200)),
            utc(now - Duration::days(400)),
        ];
        assert_eq!(rolling_count(&events, &now, WEEK_DAYS), 1);
        assert_eq!(rolling_count(&events, &now, MONTH_DAYS), 3);
        assert_eq!(rolling_count(&events, &now, YEAR_DAYS), 4);
    }

    #[test]
    fn streak_is_zero_when_today_misses_goal() {
        let now = at(15, 18, 0, 0);
        let mut events = history(now - Duration::days(1), 10, 3);
        events.push(utc(now));
        assert_eq!(current_streak(&events, &now, 2), 0);
    }

    #[test]
    fn streak_counts_consecutive_days_until_first_miss() {
        let now = at(15, 18, 0, 0);
        let mut events = history(now, 4, 2);
        // Day five back has a single event, day six back would qualify again.
        events.push(utc(now - Duration::days(4)));
        events.extend(history(now - Duration::days(5), 1, 2));
        assert_eq!(current_streak(&events, &now, 2), 4);
    }

    #[test]
    fn streak_is_capped_at_a_year() {
        let now = tz().with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let events = history(now, 400, 1);
        assert_eq!(current_streak(&events, &now, 1), 365);
    }

    #[test]
    fn goal_achievements_ignore_gaps() {
        let now = at(15, 18, 0, 0);
        let mut events = history(now, 1, 2);
        events.extend(history(now - Duration::days(2), 1, 2));
        events.extend(history(now - Duration::days(6), 1, 5));
        events.extend(history(now - Duration::days(7), 1, 5));
        assert_eq!(goal_achievements(&events, &now, 2, 7), 3);
        assert_eq!(goal_achievements(&events, &now, 2, 30), 4);
        assert_eq!(current_streak(&events, &now, 2), 1);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress_percent(0, 4), 0.0);
        assert_eq!(progress_percent(1, 4), 25.0);
        assert_eq!(progress_percent(4, 4), 100.0);
        assert_eq!(progress_percent(9, 4), 100.0);
        assert_eq!(progress_percent(3, 0), 100.0);
    }

    #[test]
    fn emoji_tiers() {
        let config = WidgetConfig::default();
        assert_eq!(progress_emoji(&config, 0.0), "🙂");
        assert_eq!(progress_emoji(&config, 24.9), "🙂");
        assert_eq!(progress_emoji(&config, 25.0), "☺️");
        assert_eq!(progress_emoji(&config, 49.0), "☺️");
        assert_eq!(progress_emoji(&config, 50.0), "😊");
        assert_eq!(progress_emoji(&config, 99.0), "😁");
        assert_eq!(progress_emoji(&config, 100.0), "🥳");
    }

    #[test]
    fn message_rotation_follows_day_hour_and_count() {
        let config = WidgetConfig::default();
        // day 10 + hour 5 + count 1 = 16, 16 % 6 = 4
        let now = at(10, 5, 0, 0);
        assert_eq!(motivational_message(&config, 1, 3, &now), "Almost smiling! 🚀");
        // day 10 + hour 5 + count 3 = 18, 18 % 6 = 0
        assert_eq!(motivational_message(&config, 3, 3, &now), "Smile goal! 🌟");
    }

    #[test]
    fn two_smiles_today_meet_default_goal() {
        let config = WidgetConfig::default();
        let settings = Settings::default();
        let now = at(12, 10, 0, 0);
        let events = vec![utc(at(12, 8, 0, 0)), utc(at(12, 9, 0, 0))];

        let today = build_today(&config, &events, &settings, &now);
        assert_eq!(today.count, 2);
        assert_eq!(today.progress, 100.0);
        assert_eq!(today.emoji, "🥳");
        assert!(config.goal_reached_messages.contains(&today.message.as_str()));

        let stats = build_stats(&events, &settings, &now);
        assert_eq!(stats.snapshot.current_streak, 1);
        assert_eq!(stats.goal_days_last_7, 1);
    }

    #[test]
    fn empty_log_starts_from_zero() {
        let config = WidgetConfig::default();
        let settings = Settings::default();
        let now = at(12, 10, 0, 0);

        let today = build_today(&config, &[], &settings, &now);
        assert_eq!(today.count, 0);
        assert_eq!(today.progress, 0.0);
        assert!(config.no_smiles_messages.contains(&today.message.as_str()));

        let snapshot = snapshot(&[], &now, settings.daily_goal);
        assert_eq!(snapshot.current_streak, 0);
        assert_eq!(snapshot.year, 0);
    }

    #[test]
    fn goal_achieved_message_is_seedable() {
        let config = WidgetConfig::default();
        assert_eq!(goal_achieved_message(&config, 0), config.goal_achieved_lines[0]);
        assert_eq!(goal_achieved_message(&config, 17), config.goal_achieved_lines[1]);
    }
}
