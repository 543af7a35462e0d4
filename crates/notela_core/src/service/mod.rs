//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep HTTP and CLI layers decoupled from storage details.

pub mod note_service;
pub mod task_service;
pub mod vault_service;
