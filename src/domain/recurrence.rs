use crate::domain::models::{RepeatRule, TimeBox};
use crate::domain::time::FormatError;
use chrono::{Datelike, NaiveDate, Weekday};

/// Expands stored records into the occurrences present on `date`.
///
/// A record anchored exactly on the queried date is returned as-is; its
/// repeat rule is not evaluated, so recurring records never double-emit on
/// their own anchor. Other records contribute at most one virtual occurrence,
/// and only for dates on or after their anchor — recurrence never projects
/// backward. The result is ordered by start time; the sort is stable, so
/// equal starts keep stored insertion order.
pub fn resolve_for_date(records: &[TimeBox], date: &str) -> Result<Vec<TimeBox>, FormatError> {
    let query = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| FormatError::date(date))?;
    let is_weekday = !matches!(query.weekday(), Weekday::Sat | Weekday::Sun);

    let mut resolved = Vec::new();
    for record in records {
        if record.date == date {
            resolved.push(record.clone());
            continue;
        }
        if record.repeat == RepeatRule::None {
            continue;
        }
        // Recurrence needs a parseable anchor; records with a corrupt date
        // still match verbatim above but are never expanded.
        let Ok(anchor) = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d") else {
            continue;
        };
        if query < anchor {
            continue;
        }
        let included = match record.repeat {
            RepeatRule::None => false,
            RepeatRule::Daily => true,
            RepeatRule::Weekdays => is_weekday,
            RepeatRule::Weekly => query.weekday() == anchor.weekday(),
        };
        if included {
            resolved.push(record.virtual_for(date));
        }
    }

    resolved.sort_by(|left, right| left.start_time.cmp(&right.start_time));
    Ok(resolved)
}
