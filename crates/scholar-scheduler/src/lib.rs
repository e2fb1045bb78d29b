//! `scholar-scheduler` - background reminder engine with JSON-file persistence.
//!
//! # Overview
//!
//! Reminders live in a [`store::ReminderStore`], a mutex-guarded list backed
//! by a JSON file. The [`engine::SchedulerEngine`] wakes on a fixed interval,
//! fires every reminder whose time has come through a [`notifier::Notifier`],
//! then advances or drops it and commits the new list.
//!
//! # Repeat kinds
//!
//! | Kind     | After firing                                  |
//! |----------|-----------------------------------------------|
//! | `none`   | Removed from the list                         |
//! | `daily`  | Scheduled time + 1 day                        |
//! | `weekly` | Scheduled time + 7 days                       |
//! | other    | Kept unchanged (written by a newer client)    |

pub mod engine;
pub mod error;
pub mod notifier;
pub mod recurrence;
pub mod scan;
pub mod stats;
pub mod storage;
pub mod store;
pub mod types;

pub use engine::{SchedulerEngine, SchedulerTask};
pub use error::{NotifyError, Result, SchedulerError};
pub use notifier::{ConsoleNotifier, DesktopNotifier, Notifier, SoundNotifier, TimeoutNotifier};
pub use stats::ReminderStats;
pub use storage::{JsonFileStorage, ReminderStorage};
pub use store::ReminderStore;
pub use types::{Entry, EntryId, TickReport};
