use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use scholar_core::time::local_now;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::{
    error::Result,
    notifier::Notifier,
    recurrence::advance,
    scan::scan,
    store::{ReminderStore, SchedulerClaim},
    types::TickReport,
};

/// Background loop that fires due reminders.
///
/// Each tick moves through `Scanning → Notifying → Committing` and then idles
/// until the next interval:
/// 1. snapshot the store under its guard and partition against one `now`,
/// 2. call the notifier for every due reminder, outside the guard,
/// 3. advance or drop the fired reminders and commit under the guard.
///
/// Delivery is at-least-once: if the process dies after notifying but before
/// the commit is written, the same reminders fire again after a restart.
pub struct SchedulerEngine {
    claim: SchedulerClaim,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    /// If set, every tick that changed the list is reported here so the
    /// foreground can redraw.
    refresh_tx: Option<mpsc::Sender<TickReport>>,
}

impl SchedulerEngine {
    /// Attach a new engine to `store`. Fails with `AlreadyRunning` if another
    /// engine is already attached.
    ///
    /// The refresh sender is used with `try_send`, so a slow foreground never
    /// stalls the tick loop.
    pub fn new(
        store: &Arc<ReminderStore>,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
        refresh_tx: Option<mpsc::Sender<TickReport>>,
    ) -> Result<Self> {
        let claim = store.attach_scheduler()?;
        Ok(Self {
            claim,
            notifier,
            interval,
            refresh_tx,
        })
    }

    pub fn store(&self) -> &Arc<ReminderStore> {
        self.claim.store()
    }

    /// Run a single tick evaluated at `now`.
    pub async fn tick_at(&self, now: NaiveDateTime) -> Result<TickReport> {
        let mut report = TickReport {
            at: now,
            ..TickReport::default()
        };

        // Scanning
        let snapshot = self.store().snapshot();
        let partition = scan(&snapshot, now);
        if partition.due.is_empty() {
            debug!(pending = partition.pending.len(), "nothing due");
            return Ok(report);
        }

        // Notifying
        for entry in &partition.due {
            let r = &entry.reminder;
            info!(title = %r.title, due = %r.due_label(), repeat = %r.repeat, "reminder due");
            // Own task per call so a panicking notifier cannot take the loop down.
            let notifier = Arc::clone(&self.notifier);
            let (title, message) = (r.title.clone(), r.message.clone());
            let outcome =
                tokio::spawn(async move { notifier.notify(&title, &message).await }).await;
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    report.notify_failures += 1;
                    warn!(
                        title = %r.title,
                        notifier = self.notifier.name(),
                        code = e.code(),
                        error = %e,
                        "notification failed, reminder still counts as fired"
                    );
                }
                Err(e) => {
                    report.notify_failures += 1;
                    error!(
                        title = %r.title,
                        notifier = self.notifier.name(),
                        "notifier task aborted, reminder still counts as fired: {e}"
                    );
                }
            }
            report.fired.push(r.title.clone());
        }

        // Committing
        let outcomes: HashMap<_, _> = partition
            .due
            .iter()
            .map(|entry| (entry.id, advance(&entry.reminder)))
            .collect();
        let summary = self.store().commit(&outcomes)?;

        report.rescheduled = summary.rescheduled;
        report.removed = summary.removed;
        report.superseded = summary.superseded;
        report.changed = summary.changed;

        if report.changed {
            self.signal_refresh(&report);
        }
        Ok(report)
    }

    fn signal_refresh(&self, report: &TickReport) {
        if let Some(ref tx) = self.refresh_tx {
            if tx.try_send(report.clone()).is_err() {
                warn!("refresh channel full or closed, view update dropped");
            }
        }
    }

    /// Main event loop. Ticks every `interval` until `shutdown` broadcasts
    /// `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "reminder scheduler started");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    // `now` is read once so the whole tick sees one instant.
                    let now = local_now();
                    match self.tick_at(now).await {
                        Ok(report) if !report.fired.is_empty() => {
                            info!(
                                fired = report.fired.len(),
                                rescheduled = report.rescheduled,
                                removed = report.removed,
                                "scheduler tick committed"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => error!(code = e.code(), "scheduler tick failed, retrying next interval: {e}"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("reminder scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Spawn [`run`](Self::run) on the current runtime.
    pub fn spawn(self) -> SchedulerTask {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(async move { self.run(shutdown_rx).await });
        SchedulerTask { shutdown_tx, join }
    }
}

/// Handle to a spawned engine.
pub struct SchedulerTask {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SchedulerTask {
    /// Signal the loop to stop and wait for it. A tick already in progress
    /// finishes its commit first.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.join.await {
            error!("scheduler task ended abnormally: {e}");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
