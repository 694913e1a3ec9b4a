//! Tracked cut / merge / convert operations.
//!
//! Every accepted operation registers exactly one [`TaskRecord`], spawns one
//! FFmpeg child and follows it to a terminal status:
//!
//! 1. Preconditions (input exists, enough inputs, durations probe, id unused)
//!    are checked first. Failing here registers nothing.
//! 2. The record is inserted as `running` before the child is spawned, so a
//!    spawn failure still leaves a terminal `failed` record behind.
//! 3. stderr is consumed on a spawned task that drives a [`ProgressTracker`]
//!    while this task awaits the child's exit.
//! 4. The consumer is joined before the terminal status is written.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, error, info, trace, warn};

use clipper_models::{format_seconds, parse_duration, TaskId, TaskKind, TaskRecord, TaskStatus};

use crate::command::{resolve_tool, CodecProfile, FfmpegCommand};
use crate::error::{MediaError, MediaResult};
use crate::manifest::ConcatManifest;
use crate::probe;
use crate::progress::ProgressTracker;
use crate::registry::TaskRegistry;

/// Size of each read from the diagnostic stream.
const READ_CHUNK: usize = 1024;

/// Processor configuration.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Explicit tool path; `ffmpeg` is looked up on `PATH` when unset
    pub ffmpeg_path: Option<PathBuf>,
    /// Probe the input duration before `convert` for real progress values
    pub probe_convert_duration: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            probe_convert_duration: true,
        }
    }
}

/// Runs media operations and tracks them in a [`TaskRegistry`].
///
/// Cloning is cheap; clones share the same registry.
#[derive(Debug, Clone)]
pub struct VideoProcessor {
    ffmpeg: PathBuf,
    registry: TaskRegistry,
    probe_convert_duration: bool,
}

impl VideoProcessor {
    /// Create a processor using `ffmpeg` from `PATH`.
    pub fn new() -> MediaResult<Self> {
        Self::from_config(&ProcessorConfig::default())
    }

    /// Create a processor for an explicit tool path or program name.
    pub fn with_tool(tool: impl AsRef<Path>) -> MediaResult<Self> {
        Ok(Self {
            ffmpeg: resolve_tool(tool.as_ref())?,
            registry: TaskRegistry::new(),
            probe_convert_duration: true,
        })
    }

    /// Create a processor from configuration.
    pub fn from_config(config: &ProcessorConfig) -> MediaResult<Self> {
        let tool = config
            .ffmpeg_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("ffmpeg"));
        let mut processor = Self::with_tool(tool)?;
        processor.probe_convert_duration = config.probe_convert_duration;
        Ok(processor)
    }

    /// Resolved tool path.
    pub fn tool_path(&self) -> &Path {
        &self.ffmpeg
    }

    /// Look up a task.
    pub fn get_task(&self, task_id: TaskId) -> MediaResult<TaskRecord> {
        self.registry.get(task_id)
    }

    /// Snapshot of all tasks.
    pub fn list_tasks(&self) -> Vec<TaskRecord> {
        self.registry.list()
    }

    /// Probe a media file's duration in whole seconds on the blocking pool.
    pub async fn probe_duration(&self, input: impl AsRef<Path>) -> MediaResult<u64> {
        let tool = self.ffmpeg.clone();
        let input = input.as_ref().to_path_buf();
        tokio::task::spawn_blocking(move || probe::probe_duration(&tool, &input))
            .await
            .map_err(|e| MediaError::Io(std::io::Error::other(e)))?
    }

    /// Cut `start..end` (`HH:MM:SS`) out of `input`.
    ///
    /// The output extension selects the codec profile; unrecognized
    /// containers are stream-copied.
    pub async fn cut(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        start: &str,
        end: &str,
        task_id: TaskId,
    ) -> MediaResult<()> {
        let input = input.as_ref();
        let output = output.as_ref();
        ensure_exists(input)?;

        let total_secs = parse_duration(end).saturating_sub(parse_duration(start));
        let record = TaskRecord::new(
            task_id,
            TaskKind::Cut,
            vec![input.to_path_buf()],
            output,
            total_secs,
            format!("Cut {} from {} to {}", display_name(input), start, end),
        );

        let cmd = FfmpegCommand::new(input, output)
            .range(start, end)
            .profile(CodecProfile::for_output(output));

        self.run_tracked(record, cmd).await
    }

    /// Concatenate `inputs` in order into `output` without re-encoding.
    pub async fn merge<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        output: impl AsRef<Path>,
        task_id: TaskId,
    ) -> MediaResult<()> {
        if inputs.len() < 2 {
            return Err(MediaError::InsufficientInputs(inputs.len()));
        }
        let inputs: Vec<PathBuf> = inputs.iter().map(|p| p.as_ref().to_path_buf()).collect();
        for input in &inputs {
            ensure_exists(input)?;
        }
        self.ensure_unused(task_id)?;

        let mut total_secs = 0;
        for input in &inputs {
            total_secs += self.probe_duration(input).await?;
        }

        let manifest = ConcatManifest::create(&inputs)?;
        let names: Vec<String> = inputs.iter().map(|p| display_name(p)).collect();
        let record = TaskRecord::new(
            task_id,
            TaskKind::Merge,
            inputs,
            output.as_ref(),
            total_secs,
            format!("Merge {} ({})", names.join(", "), format_seconds(total_secs)),
        );

        let cmd = FfmpegCommand::new(manifest.path(), output)
            .concat_input()
            .codec_copy();

        // The concat demuxer opens the manifest lazily; keep it until exit
        let result = self.run_tracked(record, cmd).await;
        drop(manifest);
        result
    }

    /// Re-encode `input` to H.264/AAC.
    ///
    /// The input duration is probed first when enabled; if that fails the
    /// task runs with an unknown duration and heartbeat-only progress.
    pub async fn convert(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        task_id: TaskId,
    ) -> MediaResult<()> {
        let input = input.as_ref();
        let output = output.as_ref();
        ensure_exists(input)?;
        self.ensure_unused(task_id)?;

        let total_secs = if self.probe_convert_duration {
            match self.probe_duration(input).await {
                Ok(secs) => secs,
                Err(e) => {
                    warn!(
                        task_id = %task_id,
                        "Duration unknown, progress will be estimated: {}", e
                    );
                    0
                }
            }
        } else {
            0
        };

        let record = TaskRecord::new(
            task_id,
            TaskKind::Convert,
            vec![input.to_path_buf()],
            output,
            total_secs,
            format!("Convert {} to {}", display_name(input), display_name(output)),
        );

        let cmd = FfmpegCommand::new(input, output)
            .profile(CodecProfile::H264_AAC)
            .output_args(["-strict", "experimental"]);

        self.run_tracked(record, cmd).await
    }

    fn ensure_unused(&self, task_id: TaskId) -> MediaResult<()> {
        if self.registry.contains(task_id) {
            return Err(MediaError::TaskExists(task_id));
        }
        Ok(())
    }

    /// Register `record`, run `cmd` and drive the task to a terminal status.
    async fn run_tracked(&self, record: TaskRecord, cmd: FfmpegCommand) -> MediaResult<()> {
        let task_id = record.id;
        let kind = record.kind;
        let total_secs = record.total_duration_secs;
        self.registry.insert(record)?;

        metrics::counter!("clipper_tasks_started_total", "kind" => kind.as_str()).increment(1);
        let started = Instant::now();

        let args = cmd.build_args();
        info!(task_id = %task_id, kind = %kind, total_secs, "Starting task");
        debug!(task_id = %task_id, "Running FFmpeg: {} {}", self.ffmpeg.display(), args.join(" "));

        let spawned = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(source) => {
                error!(task_id = %task_id, "Failed to start FFmpeg: {}", source);
                self.finish(task_id, kind, started, Err(source.to_string()));
                return Err(MediaError::ProcessStartFailure { task_id, source });
            }
        };

        let consumer = child.stderr.take().map(|stderr| {
            tokio::spawn(consume_diagnostics(
                self.registry.clone(),
                task_id,
                total_secs,
                stderr,
            ))
        });

        let status = child.wait().await;

        if let Some(consumer) = consumer {
            if let Err(e) = consumer.await {
                warn!(task_id = %task_id, "Progress consumer ended abnormally: {}", e);
            }
        }

        match status {
            Ok(status) if status.success() => {
                self.finish(task_id, kind, started, Ok(()));
                info!(
                    task_id = %task_id,
                    kind = %kind,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Task completed"
                );
                Ok(())
            }
            Ok(status) => {
                let err = MediaError::ProcessExecutionFailure {
                    task_id,
                    exit_code: status.code(),
                };
                error!(task_id = %task_id, kind = %kind, "{}", err);
                self.finish(task_id, kind, started, Err(err.to_string()));
                Err(err)
            }
            Err(e) => {
                error!(task_id = %task_id, "Failed waiting for FFmpeg: {}", e);
                self.finish(task_id, kind, started, Err(e.to_string()));
                Err(MediaError::Io(e))
            }
        }
    }

    /// Write the terminal status and record metrics.
    fn finish(
        &self,
        task_id: TaskId,
        kind: TaskKind,
        started: Instant,
        outcome: Result<(), String>,
    ) {
        let (status, update) = match outcome {
            Ok(()) => (
                TaskStatus::Completed,
                self.registry.update_status(task_id, TaskStatus::Completed),
            ),
            Err(message) => (TaskStatus::Failed, self.registry.fail(task_id, message)),
        };
        if let Err(e) = update {
            warn!(task_id = %task_id, "Could not record final status: {}", e);
        }

        metrics::counter!(
            "clipper_tasks_finished_total",
            "kind" => kind.as_str(),
            "status" => status.as_str()
        )
        .increment(1);
        metrics::histogram!("clipper_task_duration_seconds", "kind" => kind.as_str())
            .record(started.elapsed().as_secs_f64());
    }
}

/// Read the diagnostic stream to its end, publishing progress as it changes.
async fn consume_diagnostics<R>(
    registry: TaskRegistry,
    task_id: TaskId,
    total_secs: u64,
    mut stream: R,
) where
    R: AsyncRead + Unpin,
{
    let mut tracker = ProgressTracker::new(total_secs);
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                if let Some(progress) = tracker.observe(&chunk[..n]) {
                    trace!(task_id = %task_id, progress, "Progress");
                    if let Err(e) = registry.update_progress(task_id, progress) {
                        warn!(task_id = %task_id, "Dropping progress update: {}", e);
                        break;
                    }
                }
            }
            Err(e) => {
                warn!(task_id = %task_id, "Error reading FFmpeg output: {}", e);
                break;
            }
        }
    }
}

fn ensure_exists(input: &Path) -> MediaResult<()> {
    if !input.exists() {
        return Err(MediaError::InputNotFound(input.to_path_buf()));
    }
    Ok(())
}

fn display_name(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_task(id: u64, total_secs: u64) -> TaskRegistry {
        let registry = TaskRegistry::new();
        registry
            .insert(TaskRecord::new(
                TaskId(id),
                TaskKind::Cut,
                vec![PathBuf::from("in.mp4")],
                "out.mp4",
                total_secs,
                "cut",
            ))
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn test_consume_reports_measured_progress() {
        let registry = registry_with_task(1, 10);
        let stderr: &[u8] = b"frame=1 time=00:00:02.00 x\rframe=2 time=00:00:05.00 x\r";

        consume_diagnostics(registry.clone(), TaskId(1), 10, stderr).await;

        let task = registry.get(TaskId(1)).unwrap();
        assert_eq!(task.progress, 50);
        assert_eq!(task.status, TaskStatus::Running);
    }

    #[tokio::test]
    async fn test_consume_handles_marker_split_across_reads() {
        let registry = registry_with_task(1, 20);
        let stderr = tokio_test::io::Builder::new()
            .read(b"size=1kB time=00:0")
            .read(b"0:15.00 bitrate=1k\r")
            .build();

        consume_diagnostics(registry.clone(), TaskId(1), 20, stderr).await;

        assert_eq!(registry.get(TaskId(1)).unwrap().progress, 75);
    }

    #[tokio::test]
    async fn test_consume_heartbeat_without_duration() {
        let registry = registry_with_task(1, 0);
        let mut builder = tokio_test::io::Builder::new();
        for _ in 0..30 {
            builder.read(b"Press [q] to stop\n");
        }

        consume_diagnostics(registry.clone(), TaskId(1), 0, builder.build()).await;

        assert_eq!(registry.get(TaskId(1)).unwrap().progress, crate::HEARTBEAT_CEILING);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("/videos/clip.mp4"), "clip.mp4");
        assert_eq!(display_name("/"), "/");
    }

    #[test]
    fn test_default_config_probes_convert() {
        let config = ProcessorConfig::default();
        assert!(config.ffmpeg_path.is_none());
        assert!(config.probe_convert_duration);
    }
}
