//! Domain model for persisted tasks.
//!
//! # Responsibility
//! - Define the canonical `Task` entity shared by storage, mapping and services.
//!
//! # Invariants
//! - A task without an identifier has not been persisted yet.
//! - Identifier and creation timestamp never change after creation.

pub mod task;
