//! Plain-text rendering for list, stats and tick output.

use scholar_core::Reminder;
use scholar_scheduler::{ReminderStats, TickReport};

/// One line per reminder, numbered from 1 as accepted by `delete`.
pub fn render_list(reminders: &[Reminder]) -> String {
    if reminders.is_empty() {
        return "No reminders.\n".to_string();
    }
    let mut out = format!("Reminders ({}):\n", reminders.len());
    for (i, r) in reminders.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {} | {} | {} | {}\n",
            i + 1,
            r.title,
            r.display_message(),
            r.due_label(),
            r.repeat,
        ));
    }
    out
}

pub fn render_stats(stats: &ReminderStats) -> String {
    if stats.is_empty() {
        return "No reminders to analyze.\n".to_string();
    }
    let mut out = format!("Total Reminders: {}\n\nRepeat Type Distribution:\n", stats.total);
    for (kind, count) in &stats.repeat_distribution {
        out.push_str(&format!("{}: {} reminder(s)\n", capitalize(kind), count));
    }
    let kinds: Vec<&str> = stats.repeat_kinds.iter().map(String::as_str).collect();
    out.push_str(&format!("\nUnique Repeat Types: {}\n", kinds.join(", ")));
    out.push_str(&format!(
        "Unique Titles: {} out of {} reminders\n",
        stats.unique_titles, stats.total
    ));
    out.push_str(&format!("Upcoming: {}\n", stats.upcoming.len()));
    out
}

pub fn render_report(report: &TickReport) -> String {
    let mut out = format!("Fired: {}", report.fired.join(", "));
    let mut notes = Vec::new();
    if report.rescheduled > 0 {
        notes.push(format!("{} rescheduled", report.rescheduled));
    }
    if report.removed > 0 {
        notes.push(format!("{} done", report.removed));
    }
    if report.notify_failures > 0 {
        notes.push(format!("{} notification(s) failed", report.notify_failures));
    }
    if !notes.is_empty() {
        out.push_str(&format!(" ({})", notes.join(", ")));
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
