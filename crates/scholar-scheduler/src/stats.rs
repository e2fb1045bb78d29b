use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use scholar_core::Reminder;
use serde::Serialize;

/// Summary of a reminder list, as shown by the `stats` views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReminderStats {
    pub total: usize,
    /// Repeat kind label → number of reminders.
    pub repeat_distribution: BTreeMap<String, usize>,
    pub repeat_kinds: BTreeSet<String>,
    pub unique_titles: usize,
    /// Reminders whose due time is still ahead of `now`, in list order.
    pub upcoming: Vec<Reminder>,
}

impl ReminderStats {
    pub fn collect(reminders: &[Reminder], now: NaiveDateTime) -> Self {
        let mut repeat_distribution = BTreeMap::new();
        for r in reminders {
            *repeat_distribution
                .entry(r.repeat.label().to_string())
                .or_insert(0) += 1;
        }
        let repeat_kinds = repeat_distribution.keys().cloned().collect();
        let unique_titles = reminders
            .iter()
            .map(|r| r.title.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        let upcoming = reminders
            .iter()
            .filter(|r| r.due_at > now)
            .cloned()
            .collect();

        Self {
            total: reminders.len(),
            repeat_distribution,
            repeat_kinds,
            unique_titles,
            upcoming,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
