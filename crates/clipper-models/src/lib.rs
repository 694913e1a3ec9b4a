//! Shared data models for the video clipper.
//!
//! This crate provides Serde-serializable types for:
//! - Task identity and id generation
//! - Task kinds, statuses and records
//! - `HH:MM:SS` timestamp parsing

pub mod task;
pub mod timestamp;

// Re-export common types
pub use task::{TaskId, TaskIdGenerator, TaskKind, TaskRecord, TaskStatus};
pub use timestamp::{format_seconds, parse_duration, try_parse_duration};
