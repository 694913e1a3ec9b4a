//! Single-task commands: cut, merge, convert and probe.

use anyhow::{Context, Result};
use std::path::PathBuf;

use clipper_models::TaskRecord;

use super::Session;
use crate::cli::{ConvertArgs, CutArgs, MergeArgs, ProbeArgs};

pub async fn cut(session: &Session, args: &CutArgs) -> Result<TaskRecord> {
    let task_id = session.next_task_id();
    let input = session.config.resolve(&args.input);
    let output = session.config.resolve(&args.output);

    let operation = session
        .processor
        .cut(&input, &output, &args.start, &args.end, task_id);
    session
        .watch(task_id, operation)
        .await
        .with_context(|| format!("Failed to cut {}", input.display()))
}

pub async fn merge(session: &Session, args: &MergeArgs) -> Result<TaskRecord> {
    let task_id = session.next_task_id();
    let inputs: Vec<PathBuf> = args.inputs.iter().map(|p| session.config.resolve(p)).collect();
    let output = session.config.resolve(&args.output);

    let operation = session.processor.merge(&inputs, &output, task_id);
    session
        .watch(task_id, operation)
        .await
        .with_context(|| format!("Failed to merge into {}", output.display()))
}

pub async fn convert(session: &Session, args: &ConvertArgs) -> Result<TaskRecord> {
    let task_id = session.next_task_id();
    let input = session.config.resolve(&args.input);
    let output = session.config.resolve(&args.output);

    let operation = session.processor.convert(&input, &output, task_id);
    session
        .watch(task_id, operation)
        .await
        .with_context(|| format!("Failed to convert {}", input.display()))
}

/// Duration of the file in whole seconds.
pub async fn probe(session: &Session, args: &ProbeArgs) -> Result<u64> {
    let file = session.config.resolve(&args.file);
    session
        .processor
        .probe_duration(&file)
        .await
        .with_context(|| format!("Failed to probe {}", file.display()))
}
