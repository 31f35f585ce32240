pub mod conflict;
pub mod models;
pub mod recurrence;
pub mod time;
