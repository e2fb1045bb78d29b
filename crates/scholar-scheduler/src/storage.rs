//! Durable backing for the reminder list.
//!
//! The file is a JSON array of reminder records written with four-space
//! indentation. Loading is forgiving: a missing or unreadable file is an
//! empty list and malformed records are skipped one by one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use scholar_core::Reminder;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Result, SchedulerError};

/// Persistence layer consumed by [`ReminderStore`](crate::store::ReminderStore).
pub trait ReminderStorage: Send + Sync {
    /// Load every well-formed record. Never fails: problems are logged and
    /// yield an empty (or shorter) list.
    fn load_list(&self) -> Vec<Reminder>;

    /// Replace the persisted list with `reminders`.
    fn save_list(&self, reminders: &[Reminder]) -> Result<()>;

    /// Write a duplicate of the persisted list under `backup_<name>`.
    fn backup(&self, _name: &str) -> Result<PathBuf> {
        Err(SchedulerError::BackupUnsupported)
    }
}

/// Reminder list stored in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    backup_dir: PathBuf,
}

impl JsonFileStorage {
    /// Backups go next to the data file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let backup_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { path, backup_dir }
    }

    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = dir.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReminderStorage for JsonFileStorage {
    fn load_list(&self) -> Vec<Reminder> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no reminder file yet");
            return Vec::new();
        }
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "reminder file unreadable, starting empty");
                return Vec::new();
            }
        };
        decode_list(&raw)
    }

    fn save_list(&self, reminders: &[Reminder]) -> Result<()> {
        write_json(&self.path, reminders)
    }

    fn backup(&self, name: &str) -> Result<PathBuf> {
        let name = if name.trim().is_empty() {
            format!("reminders_{}.json", Local::now().format("%Y%m%d_%H%M%S"))
        } else {
            let name = name.trim();
            if name.contains(['/', '\\']) || name.contains("..") {
                return Err(SchedulerError::InvalidBackupName(name.to_string()));
            }
            name.to_string()
        };
        let target = self.backup_dir.join(format!("backup_{name}"));
        let reminders = self.load_list();
        write_json(&target, &reminders)?;
        info!(path = %target.display(), count = reminders.len(), "reminder backup written");
        Ok(target)
    }
}

/// Decode a file body, dropping records that do not parse.
pub fn decode_list(raw: &str) -> Vec<Reminder> {
    let items: Vec<Value> = match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "reminder file is corrupt, starting empty");
            return Vec::new();
        }
    };

    let total = items.len();
    let reminders: Vec<Reminder> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<Reminder>(item) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(index = i, error = %e, "skipping invalid reminder record");
                None
            }
        })
        .collect();

    if reminders.len() < total {
        info!(kept = reminders.len(), dropped = total - reminders.len(), "reminder file loaded with skips");
    }
    reminders
}

/// Pretty-print with four-space indentation, then swap the file into place.
fn write_json(path: &Path, reminders: &[Reminder]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    reminders.serialize(&mut ser)?;

    let tmp = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&buf)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholar_core::{Priority, Repeat};

    fn sample(title: &str) -> Reminder {
        Reminder {
            title: title.to_string(),
            message: "read chapter 4".to_string(),
            due_at: scholar_core::time::parse_stored("2024-01-01 09:00").unwrap(),
            repeat: Repeat::Daily,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = JsonFileStorage::new(dir.path().join("none.json"));
        assert!(storage.load_list().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("reminders.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(JsonFileStorage::new(&path).load_list().is_empty());

        fs::write(&path, r#"{"title":"not a list"}"#).unwrap();
        assert!(JsonFileStorage::new(&path).load_list().is_empty());
    }

    #[test]
    fn malformed_record_is_dropped_individually() {
        let raw = r#"[
            {"title":"Good","message":"","time":"2024-01-01 09:00","repeat":"none","priority":"medium"},
            {"title":"Bad","message":"","time":"tomorrow","repeat":"none","priority":"medium"}
        ]"#;
        let list = decode_list(raw);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "Good");
    }

    #[test]
    fn records_missing_required_fields_are_dropped() {
        let raw = r#"[{"title":"No time","message":"","repeat":"none"}, 42, "text"]"#;
        assert!(decode_list(raw).is_empty());
    }

    #[test]
    fn save_then_load_keeps_order_and_format() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("reminders.json");
        let storage = JsonFileStorage::new(&path);

        storage.save_list(&[sample("A"), sample("B")]).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n        \"title\": \"A\""));
        assert!(raw.contains("\"time\": \"2024-01-01 09:00\""));

        let titles: Vec<String> = storage.load_list().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn backup_copies_current_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backups = dir.path().join("backups");
        let storage = JsonFileStorage::new(dir.path().join("reminders.json")).with_backup_dir(&backups);
        storage.save_list(&[sample("A")]).unwrap();

        let target = storage.backup("monday.json").unwrap();
        assert_eq!(target, backups.join("backup_monday.json"));
        let copy = JsonFileStorage::new(&target).load_list();
        assert_eq!(copy, vec![sample("A")]);
    }

    #[test]
    fn backup_without_name_is_timestamped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = JsonFileStorage::new(dir.path().join("reminders.json"));
        let target = storage.backup("").unwrap();
        let file_name = target.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("backup_reminders_"));
        assert!(file_name.ends_with(".json"));
    }

    #[test]
    fn backup_name_cannot_leave_the_backup_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backups = dir.path().join("nested").join("backups");
        let storage = JsonFileStorage::new(dir.path().join("reminders.json")).with_backup_dir(&backups);
        storage.save_list(&[sample("A")]).unwrap();

        for name in ["../../escaped.json", "sub/term.json", "..\\escaped.json", ".."] {
            let err = storage.backup(name).unwrap_err();
            assert_eq!(err.code(), "INVALID_BACKUP_NAME", "{name}");
        }
        assert!(!dir.path().join("escaped.json").exists());
        assert!(!backups.exists());
    }
}
