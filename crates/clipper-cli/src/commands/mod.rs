//! Command implementations for the CLI.

pub mod convert_dir;
pub mod operations;

use std::future::Future;

use tokio::time::MissedTickBehavior;
use tracing::info;

use clipper_media::{MediaResult, VideoProcessor};
use clipper_models::{TaskId, TaskIdGenerator, TaskRecord};

use crate::config::ClipperConfig;

/// State shared by every command: the processor, the id source and config.
pub struct Session {
    pub processor: VideoProcessor,
    pub config: ClipperConfig,
    ids: TaskIdGenerator,
}

impl Session {
    pub fn new(processor: VideoProcessor, config: ClipperConfig) -> Self {
        Self {
            processor,
            config,
            ids: TaskIdGenerator::new(),
        }
    }

    /// Allocate an id for the next task.
    pub fn next_task_id(&self) -> TaskId {
        self.ids.next_id()
    }

    /// Drive `operation` to completion, logging task progress on every tick.
    pub async fn watch<F>(&self, task_id: TaskId, operation: F) -> MediaResult<TaskRecord>
    where
        F: Future<Output = MediaResult<()>>,
    {
        let mut ticker = tokio::time::interval(self.config.progress_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(operation);

        let mut last_reported = None;
        let result = loop {
            tokio::select! {
                result = &mut operation => break result,
                _ = ticker.tick() => {
                    if let Ok(task) = self.processor.get_task(task_id) {
                        if last_reported != Some(task.progress) {
                            info!(
                                task_id = %task_id,
                                progress = task.progress,
                                "{}", task.description
                            );
                            last_reported = Some(task.progress);
                        }
                    }
                }
            }
        };

        result?;
        self.processor.get_task(task_id)
    }
}

/// One-line human summary of a task.
pub fn summarize(task: &TaskRecord) -> String {
    let mut line = format!(
        "#{} {:<7} {:<9} {:>3}%  {}",
        task.id,
        task.kind.as_str(),
        task.status.as_str(),
        task.progress,
        task.description
    );
    if let Some(message) = &task.error_message {
        line.push_str(&format!(" ({})", message));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipper_models::{TaskKind, TaskStatus};
    use std::path::PathBuf;

    #[test]
    fn test_summarize_failed_task() {
        let mut task = TaskRecord::new(
            TaskId(3),
            TaskKind::Convert,
            vec![PathBuf::from("a.avi")],
            "a.mp4",
            0,
            "Convert a.avi to a.mp4",
        );
        task.set_progress(12);
        task.fail("exit code 1");

        let line = summarize(&task);
        assert!(line.starts_with("#3 convert"));
        assert!(line.contains("failed"));
        assert!(line.contains(" 12%"));
        assert!(line.ends_with("(exit code 1)"));
        assert_eq!(task.status, TaskStatus::Failed);
    }
}
