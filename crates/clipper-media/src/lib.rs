#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper with tracked, observable task progress.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building and codec profile selection
//! - Duration probing
//! - Progress estimation from the FFmpeg diagnostic stream
//! - A concurrency-safe registry of task records
//! - Cut / merge / convert operations that register and track tasks

pub mod command;
pub mod error;
pub mod manifest;
pub mod probe;
pub mod processor;
pub mod progress;
pub mod registry;

pub use command::{resolve_tool, CodecProfile, FfmpegCommand};
pub use error::{MediaError, MediaResult};
pub use manifest::ConcatManifest;
pub use probe::{parse_probe_output, probe_duration};
pub use processor::{ProcessorConfig, VideoProcessor};
pub use progress::{estimate_progress, ProgressTracker, HEARTBEAT_CEILING};
pub use registry::TaskRegistry;

pub use clipper_models::{TaskId, TaskKind, TaskRecord, TaskStatus};
