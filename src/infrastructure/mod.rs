pub mod error;
pub mod preferences;
pub mod storage;
pub mod timebox_repository;
