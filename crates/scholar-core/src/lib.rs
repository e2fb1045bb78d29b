//! `scholar-core` - types shared by the reminder engine and its hosts.

pub mod config;
pub mod error;
pub mod reminder;
pub mod time;

pub use error::{CoreError, Result};
pub use reminder::{NewReminder, Priority, Reminder, Repeat};
