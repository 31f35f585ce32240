use crate::domain::time::{duration_minutes, is_valid_range, time_to_minutes};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Work,
    Study,
    Exercise,
    Housework,
    Rest,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    NotStarted,
    InProgress,
    Completed,
    Partial,
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RepeatRule {
    #[default]
    None,
    Daily,
    Weekdays,
    Weekly,
}

/// A scheduled slot on the daily timeline.
///
/// Field names and string formats (`YYYY-MM-DD` dates, `HH:MM` times) match
/// the persisted JSON produced by earlier versions of the app, so existing
/// data deserializes unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimeBox {
    pub id: String,
    /// Anchor date for recurring boxes, sole occurrence date otherwise.
    pub date: String,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub category: Category,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default)]
    pub repeat: RepeatRule,
    /// Set only on virtual occurrences expanded from a recurring parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeBox {
    pub fn validate(&self) -> Result<(), String> {
        validate_non_empty(&self.id, "timeBox.id")?;
        validate_non_empty(&self.title, "timeBox.title")?;
        validate_date(&self.date, "timeBox.date")?;
        validate_hhmm(&self.start_time, "timeBox.startTime")?;
        validate_hhmm(&self.end_time, "timeBox.endTime")?;
        if !is_valid_range(&self.start_time, &self.end_time) {
            return Err("timeBox.endTime must be after timeBox.startTime".to_string());
        }
        Ok(())
    }

    /// Materializes this recurring box for a queried date. The result is
    /// derived, never persisted: its id carries the query date, its status is
    /// reset, and `repeat_parent_id` points back at the stored record.
    pub fn virtual_for(&self, date: &str) -> TimeBox {
        TimeBox {
            id: format!("{}_{date}", self.id),
            date: date.to_string(),
            status: Status::NotStarted,
            repeat_parent_id: Some(self.id.clone()),
            ..self.clone()
        }
    }

    /// Scheduled length in minutes; `None` when either time is malformed.
    pub fn duration(&self) -> Option<i32> {
        duration_minutes(&self.start_time, &self.end_time).ok()
    }
}

/// Provenance of a time box id: stored record or derived occurrence.
///
/// The legacy convention encodes virtual ids as `{parentId}_{date}`. An id is
/// classified as virtual only when the suffix after the last `_` parses as a
/// date, so real ids containing underscores are never misread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceId<'a> {
    Real(&'a str),
    Virtual { parent: &'a str, date: &'a str },
}

impl<'a> OccurrenceId<'a> {
    pub fn parse(id: &'a str) -> Self {
        match id.rsplit_once('_') {
            Some((parent, date))
                if !parent.is_empty() && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() =>
            {
                Self::Virtual { parent, date }
            }
            _ => Self::Real(id),
        }
    }

    /// The stored record id this occurrence resolves to.
    pub fn parent(&self) -> &'a str {
        match self {
            Self::Real(id) => id,
            Self::Virtual { parent, .. } => parent,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub total_blocks: usize,
    pub completed_blocks: usize,
    pub total_focus_minutes: i64,
}

impl DaySummary {
    pub fn from_boxes(boxes: &[TimeBox]) -> Self {
        let completed = boxes
            .iter()
            .filter(|timebox| timebox.status == Status::Completed)
            .collect::<Vec<_>>();
        let total_focus_minutes = completed
            .iter()
            .filter_map(|timebox| timebox.duration())
            .map(i64::from)
            .sum();
        Self {
            total_blocks: boxes.len(),
            completed_blocks: completed.len(),
            total_focus_minutes,
        }
    }
}

fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field_name} must not be empty"));
    }
    Ok(())
}

fn validate_hhmm(value: &str, field_name: &str) -> Result<(), String> {
    time_to_minutes(value)
        .map(|_| ())
        .map_err(|_| format!("{field_name} must be HH:MM"))
}

fn validate_date(value: &str, field_name: &str) -> Result<(), String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| format!("{field_name} must be YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_time(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .expect("valid datetime")
            .with_timezone(&Utc)
    }

    fn sample_box() -> TimeBox {
        TimeBox {
            id: "box-1".to_string(),
            date: "2024-06-03".to_string(),
            title: "Morning review".to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            category: Category::Work,
            status: Status::NotStarted,
            memo: None,
            repeat: RepeatRule::None,
            repeat_parent_id: None,
            created_at: fixed_time("2024-06-03T08:00:00Z"),
            updated_at: fixed_time("2024-06-03T08:00:00Z"),
        }
    }

    #[test]
    fn validate_accepts_valid_box() {
        assert!(sample_box().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_title() {
        let mut timebox = sample_box();
        timebox.title = "   ".to_string();
        assert!(timebox.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_length_range() {
        let mut timebox = sample_box();
        timebox.end_time = timebox.start_time.clone();
        assert!(timebox.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_date() {
        let mut timebox = sample_box();
        timebox.date = "06/03/2024".to_string();
        assert!(timebox.validate().is_err());
    }

    #[test]
    fn virtual_occurrence_rewrites_identity() {
        let parent = sample_box();
        let occurrence = parent.virtual_for("2024-06-10");
        assert_eq!(occurrence.id, "box-1_2024-06-10");
        assert_eq!(occurrence.date, "2024-06-10");
        assert_eq!(occurrence.status, Status::NotStarted);
        assert_eq!(occurrence.repeat_parent_id.as_deref(), Some("box-1"));
        assert_eq!(occurrence.title, parent.title);
        assert_eq!(occurrence.start_time, parent.start_time);
    }

    #[test]
    fn occurrence_id_classifies_virtual_suffix() {
        assert_eq!(
            OccurrenceId::parse("abc_2024-06-05"),
            OccurrenceId::Virtual {
                parent: "abc",
                date: "2024-06-05"
            }
        );
        assert_eq!(OccurrenceId::parse("abc_2024-06-05").parent(), "abc");
    }

    #[test]
    fn occurrence_id_keeps_underscored_real_ids() {
        assert_eq!(OccurrenceId::parse("abc_def"), OccurrenceId::Real("abc_def"));
        assert_eq!(OccurrenceId::parse("plain"), OccurrenceId::Real("plain"));
        // Underscores inside the parent still resolve to the full parent id.
        assert_eq!(OccurrenceId::parse("a_b_2024-06-05").parent(), "a_b");
    }

    #[test]
    fn serialized_field_names_match_legacy_format() {
        let json = serde_json::to_value(sample_box()).expect("serialize");
        let object = json.as_object().expect("object");
        for field in [
            "id",
            "date",
            "title",
            "startTime",
            "endTime",
            "category",
            "status",
            "repeat",
            "createdAt",
            "updatedAt",
        ] {
            assert!(object.contains_key(field), "missing field {field}");
        }
        assert!(!object.contains_key("memo"));
        assert!(!object.contains_key("repeatParentId"));
        assert_eq!(object["status"], "not_started");
        assert_eq!(object["category"], "work");
    }

    #[test]
    fn deserializes_legacy_record_literal() {
        let raw = r#"{
            "id": "lw8x2k9f3q",
            "date": "2024-06-03",
            "title": "朝の見直し",
            "startTime": "07:30",
            "endTime": "08:00",
            "category": "study",
            "status": "completed",
            "memo": "done early",
            "repeat": "daily",
            "createdAt": "2024-06-03T12:00:00.000Z",
            "updatedAt": "2024-06-04T01:30:00.000Z"
        }"#;
        let timebox: TimeBox = serde_json::from_str(raw).expect("deserialize legacy record");
        assert_eq!(timebox.start_time, "07:30");
        assert_eq!(timebox.category, Category::Study);
        assert_eq!(timebox.status, Status::Completed);
        assert_eq!(timebox.repeat, RepeatRule::Daily);
        assert_eq!(timebox.memo.as_deref(), Some("done early"));
        assert!(timebox.repeat_parent_id.is_none());
    }

    #[test]
    fn deserializes_record_without_repeat_field() {
        let raw = r#"{
            "id": "a1",
            "date": "2024-06-03",
            "title": "walk",
            "startTime": "18:00",
            "endTime": "18:30",
            "category": "exercise",
            "status": "not_started",
            "createdAt": "2024-06-03T12:00:00Z",
            "updatedAt": "2024-06-03T12:00:00Z"
        }"#;
        let timebox: TimeBox = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(timebox.repeat, RepeatRule::None);
    }

    #[test]
    fn day_summary_counts_completed_focus() {
        let mut done = sample_box();
        done.status = Status::Completed;
        let mut long_done = sample_box();
        long_done.id = "box-2".to_string();
        long_done.start_time = "13:00".to_string();
        long_done.end_time = "14:30".to_string();
        long_done.status = Status::Completed;
        let pending = sample_box();

        let summary = DaySummary::from_boxes(&[done, long_done, pending]);
        assert_eq!(summary.total_blocks, 3);
        assert_eq!(summary.completed_blocks, 2);
        assert_eq!(summary.total_focus_minutes, 60 + 90);
    }
}
