use thiserror::Error;

/// A clock-time or calendar-date string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {expected}: '{value}'")]
pub struct FormatError {
    pub value: String,
    pub expected: &'static str,
}

impl FormatError {
    pub fn time(value: &str) -> Self {
        Self {
            value: value.to_string(),
            expected: "HH:MM time",
        }
    }

    pub fn date(value: &str) -> Self {
        Self {
            value: value.to_string(),
            expected: "YYYY-MM-DD date",
        }
    }
}

/// Parses an `HH:MM` clock time into minutes from midnight.
///
/// Hours must be in 0..=23 and minutes in 0..=59.
pub fn time_to_minutes(time: &str) -> Result<u32, FormatError> {
    let mut split = time.split(':');
    let (Some(hour_str), Some(minute_str), None) = (split.next(), split.next(), split.next())
    else {
        return Err(FormatError::time(time));
    };

    let hours = hour_str
        .parse::<u32>()
        .map_err(|_| FormatError::time(time))?;
    let minutes = minute_str
        .parse::<u32>()
        .map_err(|_| FormatError::time(time))?;
    if hours > 23 || minutes > 59 {
        return Err(FormatError::time(time));
    }
    Ok(hours * 60 + minutes)
}

/// Formats minutes from midnight as a zero-padded `HH:MM` string.
///
/// Round-trips with [`time_to_minutes`] only for values in 0..=1439.
pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Minutes between two clock times. Negative when `end` precedes `start`;
/// callers validate the range separately.
pub fn duration_minutes(start: &str, end: &str) -> Result<i32, FormatError> {
    Ok(time_to_minutes(end)? as i32 - time_to_minutes(start)? as i32)
}

/// A range is valid when it is strictly positive. Zero-length ranges and
/// malformed times are invalid.
pub fn is_valid_range(start: &str, end: &str) -> bool {
    duration_minutes(start, end).map_or(false, |duration| duration > 0)
}

/// Formats a second count as `MM:SS` for countdown display.
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
