//! Hyperlinked task representation.
//!
//! # Responsibility
//! - Map tasks to and from the externally exposed field set.
//! - Resolve the `url` reference through an injected resolver.
//!
//! # Invariants
//! - Exposed fields are exactly `url, id, text, completed, created_at`.
//! - Conversion calls are stateless; a mapper can be shared across threads
//!   whenever its resolver can.

pub mod error;
pub mod fields;
pub mod mapper;
pub mod resolver;

pub use error::{ValidationError, NON_FIELD_ERRORS};
pub use fields::{field_names, TaskField, TASK_FIELDS};
pub use mapper::{format_timestamp, TaskChanges, TaskMapper, TaskRepresentation, WriteMode};
pub use resolver::{ReferenceResolver, ResolutionError, RouteResolver, DEFAULT_ROUTE_TEMPLATE};
