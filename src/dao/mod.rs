/// Database model definitions.
pub mod models;
/// Score and player persistence operations.
pub mod score_store;
/// Storage abstraction layer for database operations.
pub mod storage;
