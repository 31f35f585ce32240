pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::bootstrap::{BootstrapResult, bootstrap_workspace};
pub use application::journal::{Journal, TimeBoxDraft};
pub use application::timer::{CountdownTimer, TickingTimer, TimerPhase, TimerSnapshot};
pub use domain::conflict::{ranges_overlap, slot_occupied};
pub use domain::models::{Category, DaySummary, OccurrenceId, RepeatRule, Status, TimeBox};
pub use domain::recurrence::resolve_for_date;
pub use domain::time::{
    FormatError, duration_minutes, format_countdown, is_valid_range, minutes_to_time,
    time_to_minutes,
};
pub use infrastructure::error::JournalError;
pub use infrastructure::preferences::{Language, Preferences};
pub use infrastructure::storage::{
    InMemoryKeyValueStore, KeyValueStore, SqliteKeyValueStore, initialize_database,
};
pub use infrastructure::timebox_repository::{TIMEBOXES_KEY, TimeBoxRepository};
