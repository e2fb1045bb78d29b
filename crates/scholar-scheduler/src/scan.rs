use chrono::NaiveDateTime;
use scholar_core::Reminder;

/// Reminders split by whether they are due at a given instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<T> {
    pub due: Vec<T>,
    pub pending: Vec<T>,
}

/// Split `items` into due (`now >= due_at`) and pending, keeping list order
/// within each side. Pure: no clock reads, no I/O.
pub fn scan<T>(items: &[T], now: NaiveDateTime) -> Partition<T>
where
    T: AsRef<Reminder> + Clone,
{
    let (due, pending): (Vec<T>, Vec<T>) = items
        .iter()
        .cloned()
        .partition(|item| AsRef::<Reminder>::as_ref(item).is_due(now));
    Partition { due, pending }
}
