//! The guarded, persisted reminder list.
//!
//! [`ReminderStore`] is the single owner of the in-memory list. Foreground
//! callers (add / delete) and the scheduler engine (snapshot / commit) only
//! touch it through this API, and every read-modify-write happens under one
//! `Mutex`. The guard is held across the file write so that memory and disk
//! never disagree after a call returns, but never across a notifier call.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDateTime;
use scholar_core::{NewReminder, Reminder};
use tracing::{debug, info};

use crate::error::{Result, SchedulerError};
use crate::stats::ReminderStats;
use crate::storage::ReminderStorage;
use crate::types::{CommitSummary, Entry, EntryId};

struct Inner {
    entries: Vec<Entry>,
    next_id: EntryId,
}

impl Inner {
    fn reminders(&self) -> Vec<Reminder> {
        self.entries.iter().map(|e| e.reminder.clone()).collect()
    }

    fn fresh_id(&mut self) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Thread-safe owner of the active reminder list and its backing file.
pub struct ReminderStore {
    inner: Mutex<Inner>,
    storage: Box<dyn ReminderStorage>,
    scheduler_attached: AtomicBool,
}

impl ReminderStore {
    /// Load the persisted list. A missing or corrupt file yields an empty store.
    pub fn open(storage: Box<dyn ReminderStorage>) -> Self {
        let loaded = storage.load_list();
        info!(count = loaded.len(), "reminder store opened");
        let mut inner = Inner {
            entries: Vec::with_capacity(loaded.len()),
            next_id: 1,
        };
        for reminder in loaded {
            let id = inner.fresh_id();
            inner.entries.push(Entry { id, reminder });
        }
        Self {
            inner: Mutex::new(inner),
            storage,
            scheduler_attached: AtomicBool::new(false),
        }
    }

    // A panic while holding the guard leaves the list itself intact, so a
    // poisoned lock is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current entries, in display order.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.lock().entries.clone()
    }

    /// Copy of the current reminders, in display order.
    pub fn reminders(&self) -> Vec<Reminder> {
        self.lock().reminders()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a reminder and persist. On a save failure the list is left as
    /// it was and the error is returned. Returns the new reminder's index.
    pub fn add(&self, reminder: Reminder) -> Result<usize> {
        let mut inner = self.lock();
        let mut next = inner.reminders();
        next.push(reminder.clone());
        self.storage.save_list(&next)?;

        let id = inner.fresh_id();
        inner.entries.push(Entry { id, reminder });
        let index = inner.entries.len() - 1;
        info!(index, title = %inner.entries[index].reminder.title, "reminder added");
        Ok(index)
    }

    /// Validate user input against `now`, then [`add`](Self::add) it.
    pub fn add_new(&self, new: NewReminder, now: NaiveDateTime) -> Result<Reminder> {
        let reminder = new.validate(now)?;
        self.add(reminder.clone())?;
        Ok(reminder)
    }

    /// Remove the reminder at `index` and persist.
    pub fn delete(&self, index: usize) -> Result<Reminder> {
        let mut inner = self.lock();
        let len = inner.entries.len();
        if index >= len {
            return Err(SchedulerError::IndexOutOfRange { index, len });
        }
        let mut next = inner.reminders();
        let removed = next.remove(index);
        self.storage.save_list(&next)?;

        inner.entries.remove(index);
        info!(index, title = %removed.title, "reminder deleted");
        Ok(removed)
    }

    /// Remove several positions at once with a single save. Duplicate and
    /// out-of-range indices are ignored. Returns how many were removed.
    pub fn delete_many(&self, indices: &[usize]) -> Result<usize> {
        let mut inner = self.lock();
        let len = inner.entries.len();
        let targets: BTreeSet<usize> = indices.iter().copied().filter(|&i| i < len).collect();
        if targets.is_empty() {
            return Ok(0);
        }

        let kept: Vec<Entry> = inner
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| !targets.contains(i))
            .map(|(_, e)| e.clone())
            .collect();
        let next: Vec<Reminder> = kept.iter().map(|e| e.reminder.clone()).collect();
        self.storage.save_list(&next)?;

        inner.entries = kept;
        info!(count = targets.len(), "reminders deleted");
        Ok(targets.len())
    }

    /// Apply the outcome of a scheduler tick to the live list and persist.
    ///
    /// `outcomes` maps each fired entry to its replacement (`Some`) or to
    /// removal (`None`). Entries are matched by identity against the list as
    /// it is *now*, not as it was when the tick took its snapshot:
    /// - entries the foreground deleted meanwhile stay deleted,
    /// - entries the foreground added meanwhile are kept untouched,
    /// - everything else keeps its position.
    ///
    /// If the save fails nothing changes in memory, so the same reminders are
    /// due again on the next tick.
    pub fn commit(&self, outcomes: &HashMap<EntryId, Option<Reminder>>) -> Result<CommitSummary> {
        let mut inner = self.lock();
        let mut summary = CommitSummary::default();
        let mut seen = 0usize;
        let mut next: Vec<Entry> = Vec::with_capacity(inner.entries.len());

        for entry in &inner.entries {
            match outcomes.get(&entry.id) {
                None => next.push(entry.clone()),
                Some(None) => {
                    seen += 1;
                    summary.removed += 1;
                    summary.changed = true;
                }
                Some(Some(updated)) => {
                    seen += 1;
                    if *updated != entry.reminder {
                        summary.rescheduled += 1;
                        summary.changed = true;
                    }
                    next.push(Entry {
                        id: entry.id,
                        reminder: updated.clone(),
                    });
                }
            }
        }
        summary.superseded = outcomes.len() - seen;
        if summary.superseded > 0 {
            debug!(count = summary.superseded, "fired reminders were deleted during the tick");
        }

        if summary.changed {
            let reminders: Vec<Reminder> = next.iter().map(|e| e.reminder.clone()).collect();
            self.storage.save_list(&reminders)?;
            inner.entries = next;
        }
        Ok(summary)
    }

    /// Statistics over the current list.
    pub fn stats(&self, now: NaiveDateTime) -> ReminderStats {
        ReminderStats::collect(&self.lock().reminders(), now)
    }

    /// Copy the persisted list to a backup file. Holds the guard so the copy
    /// never observes a half-finished commit.
    pub fn backup(&self, name: &str) -> Result<PathBuf> {
        let _inner = self.lock();
        self.storage.backup(name)
    }

    /// Reserve this store for a single scheduler engine.
    pub fn attach_scheduler(self: &Arc<Self>) -> Result<SchedulerClaim> {
        self.scheduler_attached
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SchedulerError::AlreadyRunning)?;
        Ok(SchedulerClaim {
            store: Arc::clone(self),
        })
    }
}

/// Held by a running engine; releases the store when dropped.
pub struct SchedulerClaim {
    store: Arc<ReminderStore>,
}

impl SchedulerClaim {
    pub fn store(&self) -> &Arc<ReminderStore> {
        &self.store
    }
}

impl Drop for SchedulerClaim {
    fn drop(&mut self) {
        self.store.scheduler_attached.store(false, Ordering::Release);
        debug!("scheduler detached from reminder store");
    }
}
