//! Task use-case services.
//!
//! # Responsibility
//! - Combine the representation mapper with task persistence into the
//!   operations a web view exposes.
//! - Keep callers decoupled from storage and routing details.

pub mod task_service;
