//! Task persistence contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define the storage contract the service layer depends on.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - Writes call `Task::validate()` before touching SQL.
//! - Reads reject corrupt rows instead of masking them.

pub mod task_repo;
