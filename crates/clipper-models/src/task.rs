//! Task definitions for tracked media operations.
//!
//! A task is one invocation of a media operation (cut, merge or convert)
//! identified by a caller-supplied id. Records are owned by the task registry
//! and handed out to readers as clones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// Caller-supplied identifier for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Get the raw integer value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic task id source owned by the caller.
///
/// Ids start at 1 and are never reused for the lifetime of the generator.
#[derive(Debug, Default)]
pub struct TaskIdGenerator {
    last: AtomicU64,
}

impl TaskIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn next_id(&self) -> TaskId {
        TaskId(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Kind of media operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Cut,
    Merge,
    Convert,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Cut => "cut",
            TaskKind::Merge => "merge",
            TaskKind::Convert => "convert",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Child process is running (or about to be spawned)
    #[default]
    Running,
    /// Child process exited successfully
    Completed,
    /// Child process failed to start or exited non-zero
    Failed,
}

impl TaskStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State of one in-flight or finished operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Caller-supplied task id
    pub id: TaskId,
    /// Operation kind
    pub kind: TaskKind,
    /// Current status
    pub status: TaskStatus,
    /// Progress percentage (0-100)
    pub progress: u8,
    /// Denominator for progress computation; 0 when unknown
    pub total_duration_secs: u64,
    /// When the task was created
    pub started_at: DateTime<Utc>,
    /// When the task reached a terminal status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Source files, in order
    pub inputs: Vec<PathBuf>,
    /// Destination file
    pub output: PathBuf,
    /// Human-readable summary
    pub description: String,
    /// Failure reason, if the task failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl TaskRecord {
    /// Create a new `running` record with zero progress.
    pub fn new(
        id: TaskId,
        kind: TaskKind,
        inputs: Vec<PathBuf>,
        output: impl Into<PathBuf>,
        total_duration_secs: u64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            status: TaskStatus::Running,
            progress: 0,
            total_duration_secs,
            started_at: Utc::now(),
            finished_at: None,
            inputs,
            output: output.into(),
            description: description.into(),
            error_message: None,
        }
    }

    /// Check if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Set progress, clamped to 100. Ignored once terminal.
    pub fn set_progress(&mut self, progress: u8) {
        if self.is_terminal() {
            return;
        }
        self.progress = progress.min(100);
    }

    /// Move to `status`. Completion forces progress to 100.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        if status == TaskStatus::Completed {
            self.progress = 100;
        }
        if status.is_terminal() && self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
    }

    /// Mark the task as failed with an error message.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.set_status(TaskStatus::Failed);
        self.error_message = Some(error.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TaskRecord {
        TaskRecord::new(
            TaskId(7),
            TaskKind::Cut,
            vec![PathBuf::from("in.mp4")],
            "out.mp4",
            10,
            "cut in.mp4",
        )
    }

    #[test]
    fn test_id_generator_is_monotonic() {
        let ids = TaskIdGenerator::new();
        assert_eq!(ids.next_id(), TaskId(1));
        assert_eq!(ids.next_id(), TaskId(2));
        assert_eq!(ids.next_id(), TaskId(3));
    }

    #[test]
    fn test_record_creation() {
        let task = record();
        assert_eq!(task.status, TaskStatus::Running);
        assert_eq!(task.progress, 0);
        assert!(task.finished_at.is_none());
        assert!(!task.is_terminal());
    }

    #[test]
    fn test_completion_forces_full_progress() {
        let mut task = record();
        task.set_progress(42);
        task.set_status(TaskStatus::Completed);

        assert_eq!(task.progress, 100);
        assert!(task.is_terminal());
        assert!(task.finished_at.is_some());
    }

    #[test]
    fn test_progress_frozen_after_terminal() {
        let mut task = record();
        task.set_status(TaskStatus::Completed);
        task.set_progress(3);
        assert_eq!(task.progress, 100);

        let mut failed = record();
        failed.set_progress(30);
        failed.fail("exit code 1");
        failed.set_progress(80);
        assert_eq!(failed.progress, 30);
        assert_eq!(failed.error_message.as_deref(), Some("exit code 1"));
    }

    #[test]
    fn test_serialization_uses_snake_case() {
        let task = record();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["kind"], "cut");
        assert_eq!(json["status"], "running");
        assert!(json.get("finished_at").is_none());
    }
}
