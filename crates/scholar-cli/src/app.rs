use std::sync::Arc;

use scholar_core::config::ScholarConfig;
use scholar_scheduler::{DesktopNotifier, JsonFileStorage, Notifier, ReminderStore};
use tracing::info;

/// Central shared state for one CLI invocation.
pub struct App {
    pub config: ScholarConfig,
    pub store: Arc<ReminderStore>,
}

impl App {
    /// Open the reminder file named in `config`. Never fails: a missing or
    /// corrupt file gives an empty store.
    pub fn open(config: ScholarConfig) -> Self {
        let data_path = &config.reminders.data_path;
        ensure_parent_dir(data_path);
        info!(path = %data_path, "opening reminder file");

        let storage = JsonFileStorage::new(data_path).with_backup_dir(config.reminders.backup_dir());
        let store = Arc::new(ReminderStore::open(Box::new(storage)));
        Self { config, store }
    }

    /// Desktop notifier (chime + banner). `notify_timeout_secs` bounds the
    /// chime so a stalled sound command never swallows the banner.
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::new(DesktopNotifier::new(
            self.config.sound.clone(),
            self.config.reminders.notify_timeout(),
        ))
    }
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
