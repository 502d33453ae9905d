use crate::models::ColorTheme;
use std::{env, path::PathBuf};

/// Light/dark appearance reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

impl Appearance {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Light and dark variants of one theme color, as `#RRGGBB`.
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub light: &'static str,
    pub dark: &'static str,
}

impl ThemeColors {
    pub fn for_appearance(&self, appearance: Appearance) -> &'static str {
        if appearance.is_dark() { self.dark } else { self.light }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PresetSchedule {
    pub name: &'static str,
    pub times: &'static [&'static str],
}

/// Compiled-in widget tables. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub emojis: &'static [&'static str],
    pub no_smiles_messages: &'static [&'static str],
    pub progress_messages: &'static [&'static str],
    pub goal_reached_messages: &'static [&'static str],
    pub goal_achieved_lines: &'static [&'static str],
    pub reminder_messages: &'static [&'static str],
    pub reminder_title_emojis: &'static [&'static str],
    pub preset_times: &'static [&'static str],
    pub preset_schedules: &'static [PresetSchedule],
}

impl WidgetConfig {
    pub fn theme_colors(&self, theme: ColorTheme) -> ThemeColors {
        match theme {
            ColorTheme::Green => ThemeColors { light: "#00D787", dark: "#00A65F" },
            ColorTheme::Blue => ThemeColors { light: "#007AFF", dark: "#0A84FF" },
            ColorTheme::Orange => ThemeColors { light: "#FF9500", dark: "#FF9F0A" },
            ColorTheme::Yellow => ThemeColors { light: "#FFD60A", dark: "#FFD700" },
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            emojis: &["🙂", "☺️", "😊", "😁", "🥳"],
            no_smiles_messages: &[
                "Time to smile! ☀️",
                "First smile? 😊",
                "Share a smile! ✨",
                "Smile moment! 🌟",
                "Spread smiles! 💫",
                "Smile break! 🌈",
            ],
            progress_messages: &[
                "More smiles! 🎉",
                "Keep smiling! 👏",
                "Smile streak! 💪",
                "Smiles shared! ✨",
                "Almost smiling! 🚀",
                "Smile power! 🔥",
            ],
            goal_reached_messages: &[
                "Smile goal! 🌟",
                "Smile master! 🎯",
                "Smile star! ⭐",
                "Smile joy! 💫",
                "Smile bright! 🌞",
                "Smile champ! 🏆",
            ],
            goal_achieved_lines: &[
                "Amazing! You've reached your daily goal! 🌟",
                "Goal achieved! Your smile made someone's day better 💫",
                "Fantastic! You're spreading joy today! ✨",
                "Daily goal complete! Keep that beautiful smile! 😄",
                "Well done! Your positive energy is contagious! 🎉",
                "Incredible! You're a smile superstar today! ⭐",
                "Mission accomplished! Your happiness is infectious! 🚀",
                "Brilliant! You've mastered the art of smiling! 🎨",
                "Outstanding! Your joy is lighting up the world! 💡",
                "Spectacular! You're a happiness ambassador! 🌈",
                "Magnificent! Your smile streak is on fire! 🔥",
                "Wonderful! You've unlocked maximum joy today! 🔓",
                "Excellent! Your positivity meter is maxed out! 📊",
                "Superb! You're spreading sunshine everywhere! ☀️",
                "Phenomenal! Your smile game is absolutely legendary! 🏆",
                "Marvelous! You've achieved smile perfection today! 💎",
            ],
            reminder_messages: &[
                "Your teeth deserve to be seen! 😁",
                "Little smile makes you happy and people around too! 🌟",
                "Psst... your smile is your secret weapon! 😉",
                "Warning: Smiling may cause contagious happiness! ⚠️😄",
                "Your face called - it's missing a smile! 📞😊",
                "Smile delivery service: One grin please! 🚚😁",
                "Breaking news: You look 10x better when smiling! 📰",
                "Free happiness upgrade: Just add smile! 🎆",
                "Your smile is trending today! Don't disappoint your fans 😎",
                "Reminder: Smiles have zero calories but infinite benefits! 🍰",
                "Emergency smile needed - deploy immediately! 🚑😄",
                "Your smile just made someone's day (even if it's just yours)! ✨",
                "Smile status: Currently offline. Please reconnect! 🔌😊",
                "Fun fact: Smiling uses fewer muscles than frowning! Lazy? Perfect! 😴😁",
                "Your smile is like WiFi - everyone wants to connect! 📶😄",
                "Smile quota for today: Still accepting applications! 📝",
                "Plot twist: You're the reason someone smiled today! 🎭😊",
                "Smile insurance claim: Happiness coverage activated! 🛡️",
                "Your dentist would be proud - show those pearly whites! 🦷",
                "Attention: Smile shortage detected in your area! 🚨😄",
                "Today's weather: 100% chance of smiles with scattered giggles! 🌤️",
                "Smile banking: Make a deposit, get instant happiness returns! 🏦😊",
            ],
            reminder_title_emojis: &["😊", "😇", "☺️", "😁", "🤭"],
            preset_times: &[
                "07:00", "08:00", "09:00", "12:00", "15:00", "17:00", "19:00", "21:00",
            ],
            preset_schedules: &[
                PresetSchedule { name: "Morning & Afternoon", times: &["09:00", "15:00"] },
                PresetSchedule { name: "Three Times Daily", times: &["09:00", "13:00", "17:00"] },
                PresetSchedule { name: "Work Hours", times: &["08:00", "12:00", "16:00"] },
                PresetSchedule { name: "Evening Only", times: &["19:00"] },
            ],
        }
    }
}

/// Process configuration resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub appearance: Appearance,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        let data_dir = env::var("SMILO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/Smilo"));

        let appearance = env::var("SMILO_APPEARANCE")
            .ok()
            .and_then(|value| Appearance::parse(&value))
            .unwrap_or_default();

        Self {
            port,
            data_dir,
            appearance,
        }
    }
}
