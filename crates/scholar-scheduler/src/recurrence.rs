use scholar_core::{Reminder, Repeat};
use tracing::warn;

/// Compute what remains of `reminder` after it fires.
///
/// - `None` repeat: the reminder is exhausted and `None` is returned.
/// - `Daily` / `Weekly`: a copy whose due time is the *scheduled* time plus
///   one period, so late ticks never push later occurrences back.
/// - Unrecognised kinds: the reminder is returned unchanged.
pub fn advance(reminder: &Reminder) -> Option<Reminder> {
    match &reminder.repeat {
        Repeat::None => None,
        Repeat::Other(kind) => {
            warn!(title = %reminder.title, repeat = %kind, "unknown repeat kind, keeping reminder as-is");
            Some(reminder.clone())
        }
        repeat => {
            let mut next = reminder.clone();
            if let Some(period) = repeat.period() {
                next.due_at = reminder.due_at + period;
            }
            Some(next)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholar_core::time::{format_due, parse_stored};
    use scholar_core::Priority;

    fn reminder(time: &str, repeat: Repeat) -> Reminder {
        Reminder {
            title: "Lab report".to_string(),
            message: "submit online".to_string(),
            due_at: parse_stored(time).unwrap(),
            repeat,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn one_shot_is_exhausted() {
        assert!(advance(&reminder("2024-01-01 09:00", Repeat::None)).is_none());
    }

    #[test]
    fn daily_adds_one_day_to_scheduled_time() {
        let next = advance(&reminder("2024-01-01 09:00", Repeat::Daily)).unwrap();
        assert_eq!(format_due(&next.due_at), "2024-01-02 09:00");
        assert_eq!(next.repeat, Repeat::Daily);
        assert_eq!(next.title, "Lab report");
    }

    #[test]
    fn weekly_crosses_month_and_year_boundaries() {
        let next = advance(&reminder("2024-12-28 23:30", Repeat::Weekly)).unwrap();
        assert_eq!(format_due(&next.due_at), "2025-01-04 23:30");
    }

    #[test]
    fn daily_handles_leap_day() {
        let next = advance(&reminder("2024-02-28 07:15", Repeat::Daily)).unwrap();
        assert_eq!(format_due(&next.due_at), "2024-02-29 07:15");
    }

    #[test]
    fn unknown_kind_is_kept_unchanged() {
        let r = reminder("2024-01-01 09:00", Repeat::Other("fortnightly".to_string()));
        assert_eq!(advance(&r), Some(r.clone()));
    }
}
