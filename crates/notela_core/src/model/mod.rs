//! Domain model for notes, tasks, tags and vault files.
//!
//! # Responsibility
//! - Define the canonical records shared by repositories, services and the
//!   HTTP boundary.
//! - Own field-level validation so every write path enforces the same rules.
//!
//! # Invariants
//! - Notes and tasks are identified by stable UUID v4 ids.
//! - Tag names are stored trimmed and lowercase.

pub mod note;
pub mod tag;
pub mod task;
pub mod validation;
pub mod vault;
