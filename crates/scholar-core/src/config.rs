use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REFRESH_BUFFER: usize = 64;
pub const DATA_FILE_NAME: &str = "reminder_data.json";

/// Top-level config (scholar.toml + SCHOLAR_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScholarConfig {
    #[serde(default)]
    pub reminders: RemindersConfig,
    #[serde(default)]
    pub sound: SoundConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    /// JSON file holding the active reminder list.
    #[serde(default = "default_data_path")]
    pub data_path: String,
    /// Directory for `backup_*` copies. Defaults to the data file's directory.
    #[serde(default)]
    pub backup_dir: Option<String>,
    /// Seconds between scheduler ticks (minimum 1).
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
    /// Upper bound for a single notifier call; 0 disables the bound.
    #[serde(default = "default_notify_timeout_secs")]
    pub notify_timeout_secs: u64,
    /// Capacity of the scheduler → foreground refresh channel.
    #[serde(default = "default_refresh_buffer")]
    pub refresh_buffer: usize,
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            backup_dir: None,
            tick_interval_secs: DEFAULT_TICK_INTERVAL_SECS,
            notify_timeout_secs: DEFAULT_NOTIFY_TIMEOUT_SECS,
            refresh_buffer: DEFAULT_REFRESH_BUFFER,
        }
    }
}

impl RemindersConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs.max(1))
    }

    pub fn notify_timeout(&self) -> Option<Duration> {
        (self.notify_timeout_secs > 0).then(|| Duration::from_secs(self.notify_timeout_secs))
    }

    pub fn backup_dir(&self) -> PathBuf {
        match &self.backup_dir {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(&self.data_path)
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Shell commands used to play the notification chime on each platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    #[serde(default = "default_macos_sound")]
    pub macos: String,
    #[serde(default = "default_linux_sound")]
    pub linux: String,
    #[serde(default = "default_windows_sound")]
    pub windows: String,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            macos: default_macos_sound(),
            linux: default_linux_sound(),
            windows: default_windows_sound(),
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_tick_interval_secs() -> u64 {
    DEFAULT_TICK_INTERVAL_SECS
}
fn default_notify_timeout_secs() -> u64 {
    DEFAULT_NOTIFY_TIMEOUT_SECS
}
fn default_refresh_buffer() -> usize {
    DEFAULT_REFRESH_BUFFER
}
fn default_macos_sound() -> String {
    "afplay /System/Library/Sounds/Ping.aiff".to_string()
}
fn default_linux_sound() -> String {
    "paplay /usr/share/sounds/freedesktop/stereo/complete.oga".to_string()
}
fn default_windows_sound() -> String {
    "[System.Media.SystemSounds]::Beep.Play()".to_string()
}
fn default_data_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.scholar/{}", home, DATA_FILE_NAME)
}

impl ScholarConfig {
    /// Load config from a TOML file with SCHOLAR_* env var overrides.
    ///
    /// Nested keys use a double underscore, e.g.
    /// `SCHOLAR_REMINDERS__TICK_INTERVAL_SECS=5`.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.scholar/scholar.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: ScholarConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("SCHOLAR_").split("__"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.scholar/scholar.toml", home)
}
