//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

use clipper_models::TaskId;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while running or querying media tasks.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media tool not found: {0}")]
    ToolNotFound(String),

    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Merge needs at least two inputs, got {0}")]
    InsufficientInputs(usize),

    #[error("Failed to probe duration of {path}: {message}")]
    ProbeError { path: PathBuf, message: String },

    #[error("Failed to start FFmpeg for task {task_id}: {source}")]
    ProcessStartFailure {
        task_id: TaskId,
        #[source]
        source: std::io::Error,
    },

    #[error("FFmpeg failed for task {task_id} (exit code {})", display_exit_code(.exit_code))]
    ProcessExecutionFailure {
        task_id: TaskId,
        exit_code: Option<i32>,
    },

    #[error("Task {0} not found")]
    TaskNotFound(TaskId),

    #[error("Task {0} already exists")]
    TaskExists(TaskId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

impl MediaError {
    /// Create a probe failure error.
    pub fn probe_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ProbeError {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_failure_message() {
        let err = MediaError::ProcessExecutionFailure {
            task_id: TaskId(3),
            exit_code: Some(1),
        };
        assert_eq!(err.to_string(), "FFmpeg failed for task 3 (exit code 1)");

        let killed = MediaError::ProcessExecutionFailure {
            task_id: TaskId(4),
            exit_code: None,
        };
        assert!(killed.to_string().contains("exit code none"));
    }
}
