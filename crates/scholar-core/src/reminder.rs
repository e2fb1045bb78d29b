//! Reminder records - shared between the scheduler engine, the store and the CLI.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::time::format_due;

/// Messages longer than this are cut in list views.
pub const DISPLAY_MESSAGE_CHARS: usize = 50;

/// How a reminder recurs after it fires.
///
/// Persisted as a lowercase string. Values written by a newer client that
/// this build does not understand are kept verbatim in [`Repeat::Other`] so
/// they survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Repeat {
    /// Fires once, then leaves the active list.
    None,
    /// Fires every day at the same wall-clock time.
    Daily,
    /// Fires every seven days at the same wall-clock time.
    Weekly,
    /// Unrecognised repeat kind, preserved as-is.
    Other(String),
}

impl Repeat {
    pub fn label(&self) -> &str {
        match self {
            Repeat::None => "none",
            Repeat::Daily => "daily",
            Repeat::Weekly => "weekly",
            Repeat::Other(s) => s,
        }
    }

    /// Fixed recurrence period, or `None` for one-shot and unknown kinds.
    pub fn period(&self) -> Option<Duration> {
        match self {
            Repeat::Daily => Some(Duration::days(1)),
            Repeat::Weekly => Some(Duration::weeks(1)),
            Repeat::None | Repeat::Other(_) => None,
        }
    }
}

impl From<String> for Repeat {
    fn from(s: String) -> Self {
        match s.as_str() {
            "none" => Repeat::None,
            "daily" => Repeat::Daily,
            "weekly" => Repeat::Weekly,
            _ => Repeat::Other(s),
        }
    }
}

impl From<Repeat> for String {
    fn from(r: Repeat) -> Self {
        match r {
            Repeat::Other(s) => s,
            known => known.label().to_string(),
        }
    }
}

/// Strict parse for user input: only the kinds this build can schedule.
impl FromStr for Repeat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "once" => Ok(Repeat::None),
            "daily" => Ok(Repeat::Daily),
            "weekly" => Ok(Repeat::Weekly),
            other => Err(CoreError::Validation(format!(
                "unknown repeat kind '{other}': use none, daily or weekly"
            ))),
        }
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reminder priority. Not consulted by scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Other(String),
}

impl Priority {
    pub fn label(&self) -> &str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Other(s) => s,
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.as_str() {
            "low" => Priority::Low,
            "medium" => Priority::Medium,
            "high" => Priority::High,
            _ => Priority::Other(s),
        }
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        match p {
            Priority::Other(s) => s,
            known => known.label().to_string(),
        }
    }
}

/// A persisted reminder.
///
/// Field names follow the on-disk file: the due time is stored under `time`
/// as `"YYYY-MM-DD HH:MM"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub title: String,
    pub message: String,
    #[serde(rename = "time", with = "crate::time::minute_format")]
    pub due_at: NaiveDateTime,
    pub repeat: Repeat,
    #[serde(default)]
    pub priority: Priority,
}

impl Reminder {
    /// A reminder is due once `now` has reached its scheduled time.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.due_at
    }

    /// Message cut to [`DISPLAY_MESSAGE_CHARS`] characters for list views.
    pub fn display_message(&self) -> String {
        if self.message.chars().count() > DISPLAY_MESSAGE_CHARS {
            let head: String = self.message.chars().take(DISPLAY_MESSAGE_CHARS).collect();
            format!("{head}...")
        } else {
            self.message.clone()
        }
    }

    pub fn due_label(&self) -> String {
        format_due(&self.due_at)
    }
}

impl AsRef<Reminder> for Reminder {
    fn as_ref(&self) -> &Reminder {
        self
    }
}

/// User-supplied fields for a reminder that has not been validated yet.
#[derive(Debug, Clone)]
pub struct NewReminder {
    pub title: String,
    pub message: String,
    pub due_at: NaiveDateTime,
    pub repeat: Repeat,
}

impl NewReminder {
    /// Validate against the creation instant and build the stored record.
    ///
    /// New reminders always start at [`Priority::Medium`].
    pub fn validate(self, now: NaiveDateTime) -> Result<Reminder> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("title is required".to_string()));
        }
        if self.due_at <= now {
            return Err(CoreError::Validation(format!(
                "reminder must be in the future (got {})",
                format_due(&self.due_at)
            )));
        }
        if let Repeat::Other(kind) = &self.repeat {
            return Err(CoreError::Validation(format!(
                "cannot create a reminder with repeat kind '{kind}'"
            )));
        }
        Ok(Reminder {
            title: title.to_string(),
            message: self.message.trim().to_string(),
            due_at: self.due_at,
            repeat: self.repeat,
            priority: Priority::Medium,
        })
    }
}
