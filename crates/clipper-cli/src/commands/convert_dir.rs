//! Batch conversion of legacy containers to MP4.
//!
//! Every `.avi`, `.mov`, `.mkv`, `.flv` or `.wmv` file directly inside the
//! directory is converted to a sibling `.mp4`, unless that file already
//! exists. Conversions run one at a time; a failed file is logged and the
//! batch moves on.

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use clipper_models::TaskRecord;

use super::Session;

/// Container extensions picked up for conversion.
pub const LEGACY_EXTENSIONS: &[&str] = &["avi", "mov", "mkv", "flv", "wmv"];

/// Files in `dir` that need converting, sorted by path.
pub fn find_convertible(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_legacy(&path) {
            continue;
        }
        if path.with_extension("mp4").exists() {
            continue;
        }
        found.push(path);
    }
    found.sort();
    Ok(found)
}

fn is_legacy(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            LEGACY_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Convert everything [`find_convertible`] returns and report all tasks.
pub async fn convert_dir(session: &Session, dir: &Path) -> Result<Vec<TaskRecord>> {
    let files = find_convertible(dir)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    if files.is_empty() {
        info!(dir = %dir.display(), "Nothing to convert");
        return Ok(Vec::new());
    }
    info!(dir = %dir.display(), count = files.len(), "Converting files");

    for input in &files {
        let task_id = session.next_task_id();
        let output = input.with_extension("mp4");
        let operation = session.processor.convert(input, &output, task_id);
        if let Err(e) = session.watch(task_id, operation).await {
            warn!(task_id = %task_id, input = %input.display(), "Conversion failed: {}", e);
        }
    }

    Ok(session.processor.list_tasks())
}
