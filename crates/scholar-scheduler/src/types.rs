use chrono::NaiveDateTime;
use scholar_core::Reminder;

/// Store-assigned identity of a list entry. Lives only in memory and is
/// never persisted; it lets a tick tell entries apart even when two
/// reminders have identical fields.
pub type EntryId = u64;

/// A reminder as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub reminder: Reminder,
}

impl AsRef<Reminder> for Entry {
    fn as_ref(&self) -> &Reminder {
        &self.reminder
    }
}

/// Result of one scheduler tick; also the payload of the refresh signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Instant the tick evaluated against.
    pub at: NaiveDateTime,
    /// Titles of the reminders that fired, in list order.
    pub fired: Vec<String>,
    /// Notifier calls that failed (the reminders still count as fired).
    pub notify_failures: usize,
    /// Repeating reminders moved to their next occurrence.
    pub rescheduled: usize,
    /// One-shot reminders dropped from the list.
    pub removed: usize,
    /// Due entries that were deleted by the foreground while the tick ran.
    pub superseded: usize,
    /// Whether the committed list differs from the one before the tick.
    pub changed: bool,
}

/// Outcome of [`ReminderStore::commit`](crate::store::ReminderStore::commit).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub rescheduled: usize,
    pub removed: usize,
    pub superseded: usize,
    pub changed: bool,
}
