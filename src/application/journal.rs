use crate::application::bootstrap::bootstrap_workspace;
use crate::domain::conflict::slot_occupied;
use crate::domain::models::{Category, DaySummary, OccurrenceId, RepeatRule, Status, TimeBox};
use crate::domain::recurrence::resolve_for_date;
use crate::infrastructure::error::JournalError;
use crate::infrastructure::storage::{KeyValueStore, SqliteKeyValueStore};
use crate::infrastructure::timebox_repository::TimeBoxRepository;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id(prefix: &str) -> String {
    let sequence = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{}-{sequence}", Utc::now().timestamp_micros())
}

/// Input for a new time box; id and timestamps are assigned on create.
#[derive(Debug, Clone)]
pub struct TimeBoxDraft {
    pub date: String,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub category: Category,
    pub repeat: RepeatRule,
    pub memo: Option<String>,
}

/// The journal service presentation collaborators call into: day queries,
/// slot checks, CRUD, and status updates over a single persisted record set.
///
/// Persistence is single-writer: operations are not guarded against
/// concurrent invocation, and overlapping writes race last-write-wins on the
/// underlying blob.
pub struct Journal<S> {
    repository: TimeBoxRepository<S>,
    logs_dir: Option<PathBuf>,
    log_guard: Mutex<()>,
}

impl Journal<SqliteKeyValueStore> {
    /// Opens (or initializes) a journal workspace backed by SQLite.
    pub fn new(workspace_root: &Path) -> Result<Self, JournalError> {
        let bootstrap = bootstrap_workspace(workspace_root)?;
        let store = Arc::new(SqliteKeyValueStore::new(&bootstrap.database_path));
        Ok(Self {
            repository: TimeBoxRepository::new(store),
            logs_dir: Some(bootstrap.logs_dir),
            log_guard: Mutex::new(()),
        })
    }
}

impl<S: KeyValueStore> Journal<S> {
    /// Builds a journal over an injected store, without an operation log.
    pub fn with_store(store: Arc<S>) -> Self {
        Self {
            repository: TimeBoxRepository::new(store),
            logs_dir: None,
            log_guard: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        self.repository.store()
    }

    /// Read failures degrade to an empty journal: the failure is logged as a
    /// side effect, never surfaced to the caller.
    async fn load_all(&self) -> Vec<TimeBox> {
        match self.repository.get_all().await {
            Ok(boxes) => boxes,
            Err(error) => {
                self.log_error("get_all", &error.to_string());
                Vec::new()
            }
        }
    }

    /// Real and virtual occurrences present on `date`, ordered by start time.
    pub async fn boxes_for_date(&self, date: &str) -> Result<Vec<TimeBox>, JournalError> {
        let records = self.load_all().await;
        Ok(resolve_for_date(&records, date)?)
    }

    pub async fn day_summary(&self, date: &str) -> Result<DaySummary, JournalError> {
        let occurrences = self.boxes_for_date(date).await?;
        Ok(DaySummary::from_boxes(&occurrences))
    }

    /// Whether a candidate range collides with the day's occurrences,
    /// optionally ignoring the record being edited.
    pub async fn is_slot_occupied(
        &self,
        date: &str,
        start: &str,
        end: &str,
        exclude: Option<&str>,
    ) -> Result<bool, JournalError> {
        let occurrences = self.boxes_for_date(date).await?;
        Ok(slot_occupied(&occurrences, start, end, exclude)?)
    }

    /// Validates a draft, assigns identity and timestamps, and persists it.
    pub async fn create(&self, draft: TimeBoxDraft) -> Result<TimeBox, JournalError> {
        let now = Utc::now();
        let timebox = TimeBox {
            id: next_id("box"),
            date: draft.date,
            title: draft.title.trim().to_string(),
            start_time: draft.start_time,
            end_time: draft.end_time,
            category: draft.category,
            status: Status::NotStarted,
            memo: draft
                .memo
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned),
            repeat: draft.repeat,
            repeat_parent_id: None,
            created_at: now,
            updated_at: now,
        };
        self.save(timebox).await
    }

    /// Upsert by id. On update the stored record's `created_at` is kept and
    /// `updated_at` refreshed; the incoming creation stamp is ignored.
    pub async fn save(&self, timebox: TimeBox) -> Result<TimeBox, JournalError> {
        timebox.validate().map_err(JournalError::Validation)?;

        let mut boxes = self.load_all().await;
        let mut saved = timebox;
        if let Some(existing) = boxes
            .iter_mut()
            .find(|candidate| candidate.id == saved.id)
        {
            saved.created_at = existing.created_at;
            saved.updated_at = Utc::now();
            *existing = saved.clone();
        } else {
            boxes.push(saved.clone());
        }
        self.repository.put_all(&boxes).await?;

        self.log_info("save", &format!("saved id={}", saved.id));
        Ok(saved)
    }

    /// Removes by exact id only; virtual ids must be resolved by the caller.
    pub async fn delete(&self, id: &str) -> Result<bool, JournalError> {
        let mut boxes = self.load_all().await;
        let before = boxes.len();
        boxes.retain(|candidate| candidate.id != id);
        if boxes.len() == before {
            return Ok(false);
        }
        self.repository.put_all(&boxes).await?;

        self.log_info("delete", &format!("deleted id={id}"));
        Ok(true)
    }

    /// Records an execution outcome. A virtual occurrence id resolves back to
    /// its parent record; `memo` replaces the stored memo only when provided.
    /// Returns false (silently) when no record matches.
    pub async fn update_status(
        &self,
        id: &str,
        status: Status,
        memo: Option<String>,
    ) -> Result<bool, JournalError> {
        let parent_id = OccurrenceId::parse(id).parent();

        let mut boxes = self.load_all().await;
        let Some(target) = boxes
            .iter_mut()
            .find(|candidate| candidate.id == parent_id || candidate.id == id)
        else {
            return Ok(false);
        };
        target.status = status;
        if memo.is_some() {
            target.memo = memo;
        }
        target.updated_at = Utc::now();
        let updated_id = target.id.clone();
        self.repository.put_all(&boxes).await?;

        self.log_info(
            "update_status",
            &format!("updated id={updated_id} (requested id={id})"),
        );
        Ok(true)
    }

    pub fn log_info(&self, operation: &str, message: &str) {
        self.append_log("info", operation, message);
    }

    pub fn log_error(&self, operation: &str, message: &str) {
        self.append_log("error", operation, message);
    }

    fn append_log(&self, level: &str, operation: &str, message: &str) {
        let Some(logs_dir) = self.logs_dir.as_ref() else {
            return;
        };
        let Ok(_guard) = self.log_guard.lock() else {
            return;
        };
        let path = logs_dir.join("journal.log");
        let payload = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": level,
            "operation": operation,
            "message": message,
        });

        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{}", payload);
        }
    }
}
