use thiserror::Error;

/// Errors that can occur within the scheduler subsystem.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Reading or writing the reminder file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The reminder list could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A delete referred to a position past the end of the list.
    #[error("No reminder at index {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A new reminder failed validation.
    #[error(transparent)]
    Validation(#[from] scholar_core::CoreError),

    /// Another engine is already attached to this store.
    #[error("A scheduler is already running for this store")]
    AlreadyRunning,

    /// A backup name would place the file outside the backup directory.
    #[error("Invalid backup name '{0}': use a plain file name")]
    InvalidBackupName(String),

    /// The storage backend cannot produce backups.
    #[error("Backup is not supported by this storage backend")]
    BackupUnsupported,
}

impl SchedulerError {
    pub fn code(&self) -> &'static str {
        match self {
            SchedulerError::Io(_) => "IO_ERROR",
            SchedulerError::Serialization(_) => "SERIALIZATION_ERROR",
            SchedulerError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            SchedulerError::Validation(e) => e.code(),
            SchedulerError::AlreadyRunning => "ALREADY_RUNNING",
            SchedulerError::InvalidBackupName(_) => "INVALID_BACKUP_NAME",
            SchedulerError::BackupUnsupported => "BACKUP_UNSUPPORTED",
        }
    }
}

/// Errors raised by a [`Notifier`](crate::notifier::Notifier). Never fatal to the loop.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// No notification mechanism exists for this platform.
    #[error("Notifications not supported on {0}")]
    Unsupported(String),

    /// The sound or display command failed to run or exited non-zero.
    #[error("Notification command failed: {0}")]
    Command(String),

    /// The notifier did not finish within its time budget.
    #[error("Notification timed out after {ms}ms")]
    Timeout { ms: u64 },
}

impl NotifyError {
    pub fn code(&self) -> &'static str {
        match self {
            NotifyError::Unsupported(_) => "NOTIFY_UNSUPPORTED",
            NotifyError::Command(_) => "NOTIFY_COMMAND_FAILED",
            NotifyError::Timeout { .. } => "NOTIFY_TIMEOUT",
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
