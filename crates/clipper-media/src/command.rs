//! FFmpeg command builder and codec profiles.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::{MediaError, MediaResult};

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Input arguments (before -i)
    input_args: Vec<String>,
    /// Output arguments (after -i)
    output_args: Vec<String>,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
        }
    }

    /// Add multiple input arguments.
    pub fn input_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add output arguments (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Restrict output to the `start`..`end` range (`HH:MM:SS` strings).
    pub fn range(self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.output_arg("-ss")
            .output_arg(start)
            .output_arg("-to")
            .output_arg(end)
    }

    /// Read the input as an ffmpeg concat list.
    pub fn concat_input(self) -> Self {
        self.input_args(["-f", "concat", "-safe", "0"])
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Copy all streams without re-encoding.
    pub fn codec_copy(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    /// Apply a codec profile.
    pub fn profile(self, profile: CodecProfile) -> Self {
        match profile {
            CodecProfile::Encode { video, audio } => self.video_codec(video).audio_codec(audio),
            CodecProfile::StreamCopy => self.codec_copy(),
        }
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        // Outputs are always replaced; `-v info` keeps the stats lines
        args.push("-y".to_string());
        args.push("-hide_banner".to_string());
        args.push("-v".to_string());
        args.push("info".to_string());

        // Periodic `time=` stats on stderr drive progress tracking
        args.push("-stats".to_string());

        args.extend(self.input_args.clone());

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.clone());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Codec pair selected from the output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecProfile {
    /// Re-encode with a fixed video/audio codec pair
    Encode {
        video: &'static str,
        audio: &'static str,
    },
    /// Copy streams as-is
    StreamCopy,
}

impl CodecProfile {
    /// Target profile for `convert`.
    pub const H264_AAC: CodecProfile = CodecProfile::Encode {
        video: "libx264",
        audio: "aac",
    };

    /// Pick a profile from the output file extension.
    ///
    /// Unrecognized containers fall back to stream copy.
    pub fn for_output(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("mp4" | "mkv" | "mov") => Self::H264_AAC,
            Some("avi") => CodecProfile::Encode {
                video: "mpeg4",
                audio: "mp3",
            },
            _ => CodecProfile::StreamCopy,
        }
    }
}

/// Resolve the media tool to an executable path.
///
/// Accepts either a bare program name looked up on `PATH` or an explicit path.
pub fn resolve_tool(tool: impl AsRef<OsStr>) -> MediaResult<PathBuf> {
    let tool = tool.as_ref();
    which::which(tool).map_err(|_| MediaError::ToolNotFound(tool.to_string_lossy().to_string()))
}
