use crate::config::WidgetConfig;
use crate::errors::StoreError;
use crate::models::{Reminder, Settings};
use crate::settings::normalize_time;
use crate::storage::{DocumentStore, REMINDERS_FILE, load_json, save_json};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use std::future::Future;
use tracing::{debug, info, warn};

pub const REMINDER_PREFIX: &str = "smile-reminder";
pub const SCHEDULE_DAYS: i64 = 7;
pub const REMINDER_OPEN_URL: &str = "/?action=widget";

/// Local-notification capability.
pub trait Notifier: Send + Sync {
    fn pending(&self) -> impl Future<Output = Vec<Reminder>> + Send;
    fn cancel(&self, identifier: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
    fn schedule(&self, reminder: Reminder) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Keeps the pending reminder table as a JSON document.
pub struct DocumentNotifier<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore> DocumentNotifier<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

impl<S: DocumentStore> Notifier for DocumentNotifier<'_, S> {
    async fn pending(&self) -> Vec<Reminder> {
        load_json(self.store, REMINDERS_FILE).await.unwrap_or_default()
    }

    async fn cancel(&self, identifier: &str) -> Result<(), StoreError> {
        let mut reminders = self.pending().await;
        reminders.retain(|reminder| reminder.identifier != identifier);
        save_json(self.store, REMINDERS_FILE, &reminders).await?;
        debug!("cancelled reminder {identifier}");
        Ok(())
    }

    async fn schedule(&self, reminder: Reminder) -> Result<(), StoreError> {
        let mut reminders = self.pending().await;
        reminders.retain(|existing| existing.identifier != reminder.identifier);
        info!(
            "scheduled reminder {} at {}",
            reminder.identifier, reminder.trigger_at
        );
        reminders.push(reminder);
        reminders.sort_by_key(|reminder| reminder.trigger_at);
        save_json(self.store, REMINDERS_FILE, &reminders).await
    }
}

/// Reminders for today and the following six days at every configured time
/// that is still in the future.
pub fn plan_reminders<Tz: TimeZone>(
    config: &WidgetConfig,
    settings: &Settings,
    now: &DateTime<Tz>,
) -> Vec<Reminder> {
    let tz = now.timezone();
    let mut planned = Vec::new();

    for offset in 0..SCHEDULE_DAYS {
        let date = now.date_naive() + Duration::days(offset);
        for time in &settings.notification_times {
            let Ok(time) = normalize_time(time) else {
                warn!("ignoring malformed notification time {time:?}");
                continue;
            };
            let (hours, minutes) = parse_hh_mm(&time);
            let Some(naive) = date.and_hms_opt(hours, minutes, 0) else {
                continue;
            };
            // Skipped wall-clock times (DST gaps) get no reminder.
            let Some(trigger) = tz.from_local_datetime(&naive).earliest() else {
                continue;
            };
            if trigger <= *now {
                continue;
            }

            let seed = date.ordinal() as usize + hours as usize + offset as usize;
            let emoji = config.reminder_title_emojis[seed % config.reminder_title_emojis.len()];
            let body = config.reminder_messages
                [(seed * 7 + minutes as usize) % config.reminder_messages.len()];

            planned.push(Reminder {
                identifier: format!("{REMINDER_PREFIX}-{offset}-{time}"),
                title: format!("Smily {emoji}"),
                body: body.to_string(),
                trigger_at: trigger.with_timezone(&Utc),
                open_url: REMINDER_OPEN_URL.to_string(),
            });
        }
    }

    planned
}

fn parse_hh_mm(time: &str) -> (u32, u32) {
    let (hours, minutes) = time.split_once(':').unwrap_or(("0", "0"));
    (hours.parse().unwrap_or(0), minutes.parse().unwrap_or(0))
}

/// Replaces every pending smile reminder with a fresh week of reminders.
/// Does nothing while notifications are turned off.
pub async fn schedule_reminders<N, Tz>(
    notifier: &N,
    config: &WidgetConfig,
    settings: &Settings,
    now: &DateTime<Tz>,
) -> Result<usize, StoreError>
where
    N: Notifier,
    Tz: TimeZone,
{
    if !settings.notifications_enabled {
        debug!("notifications disabled, not scheduling reminders");
        return Ok(0);
    }

    for reminder in notifier.pending().await {
        if reminder.identifier.starts_with(REMINDER_PREFIX) {
            notifier.cancel(&reminder.identifier).await?;
        }
    }

    let planned = plan_reminders(config, settings, now);
    let count = planned.len();
    for reminder in planned {
        notifier.schedule(reminder).await?;
    }
    info!("scheduled {count} smile reminders");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDocumentStore;
    use chrono::FixedOffset;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2026, 4, 10, 12, 0, 0)
            .unwrap()
    }

    #[test]
    fn plans_only_future_times_for_a_week() {
        let config = WidgetConfig::default();
        let settings = Settings::default();
        let planned = plan_reminders(&config, &settings, &now());

        // 09:00 today has passed, 15:00 today has not.
        assert_eq!(planned.len(), 13);
        assert_eq!(planned[0].identifier, "smile-reminder-0-15:00");
        assert_eq!(
            planned[0].trigger_at,
            Utc.with_ymd_and_hms(2026, 4, 10, 14, 0, 0).unwrap()
        );
        assert_eq!(planned.last().unwrap().identifier, "smile-reminder-6-15:00");
        assert!(planned.iter().all(|reminder| reminder.title.starts_with("Smily ")));
        assert!(planned.iter().all(|reminder| reminder.open_url == REMINDER_OPEN_URL));
    }

    #[test]
    fn planning_is_deterministic() {
        let config = WidgetConfig::default();
        let settings = Settings::default();
        assert_eq!(
            plan_reminders(&config, &settings, &now()),
            plan_reminders(&config, &settings, &now())
        );
    }

    #[tokio::test]
    async fn rescheduling_replaces_smile_reminders_only() {
        let store = MemoryDocumentStore::new();
        let notifier = DocumentNotifier::new(&store);
        let config = WidgetConfig::default();
        let other = Reminder {
            identifier: "dentist".into(),
            title: "Dentist".into(),
            body: "Checkup".into(),
            trigger_at: Utc.with_ymd_and_hms(2026, 4, 11, 8, 0, 0).unwrap(),
            open_url: "/".into(),
        };
        let stale = Reminder {
            identifier: "smile-reminder-3-21:00".into(),
            ..other.clone()
        };
        notifier.schedule(other.clone()).await.unwrap();
        notifier.schedule(stale).await.unwrap();

        let settings = Settings {
            notification_times: vec!["19:00".into()],
            ..Settings::default()
        };
        let count = schedule_reminders(&notifier, &config, &settings, &now()).await.unwrap();
        assert_eq!(count, 7);

        let pending = notifier.pending().await;
        assert_eq!(pending.len(), 8);
        assert!(pending.contains(&other));
        assert!(!pending.iter().any(|r| r.identifier == "smile-reminder-3-21:00"));
        assert!(pending.windows(2).all(|pair| pair[0].trigger_at <= pair[1].trigger_at));
    }

    #[tokio::test]
    async fn disabled_notifications_schedule_nothing() {
        let store = MemoryDocumentStore::new();
        let notifier = DocumentNotifier::new(&store);
        let settings = Settings {
            notifications_enabled: false,
            ..Settings::default()
        };
        let count = schedule_reminders(&notifier, &WidgetConfig::default(), &settings, &now())
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(notifier.pending().await.is_empty());
    }
}
