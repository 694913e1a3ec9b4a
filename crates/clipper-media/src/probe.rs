//! Media duration probing.
//!
//! Runs `ffmpeg -i <file>` without an output, which prints the container
//! header (including `Duration: HH:MM:SS.ff`) and exits non-zero. Only the
//! printed text matters; the exit status is ignored.

use std::path::Path;
use std::process::{Command, Stdio};

use clipper_models::try_parse_duration;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

const DURATION_MARKER: &str = "Duration: ";

/// Probe a media file for its duration in whole seconds.
///
/// Blocking: runs the tool to completion. Call it from
/// `tokio::task::spawn_blocking` inside async code.
pub fn probe_duration(tool: &Path, input: impl AsRef<Path>) -> MediaResult<u64> {
    let input = input.as_ref();

    let output = Command::new(tool)
        .arg("-hide_banner")
        .arg("-i")
        .arg(input)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            MediaError::probe_failed(input, format!("failed to run {}: {}", tool.display(), e))
        })?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    let duration = parse_probe_output(&text)
        .ok_or_else(|| MediaError::probe_failed(input, "no parseable duration in tool output"))?;

    debug!(input = %input.display(), duration_secs = duration, "Probed duration");
    Ok(duration)
}

/// Extract the duration from `ffmpeg -i` output.
///
/// Returns `None` when the `Duration: ` marker is missing or the value is not
/// an `HH:MM:SS(.ff)` timestamp (e.g. `Duration: N/A`).
pub fn parse_probe_output(output: &str) -> Option<u64> {
    let start = output.find(DURATION_MARKER)? + DURATION_MARKER.len();
    let token = output[start..]
        .split(|c: char| c == ',' || c.is_whitespace())
        .next()?;
    try_parse_duration(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'in.mp4':\n  Metadata:\n    major_brand     : isom\n  Duration: 00:01:05.48, start: 0.000000, bitrate: 1205 kb/s\n  Stream #0:0(und): Video: h264\nAt least one output file must be specified\n";

    #[test]
    fn test_parse_probe_output() {
        assert_eq!(parse_probe_output(HEADER), Some(65));
    }

    #[test]
    fn test_parse_probe_output_missing_marker() {
        assert_eq!(parse_probe_output("in.mp4: No such file or directory"), None);
    }

    #[test]
    fn test_parse_probe_output_not_available() {
        assert_eq!(parse_probe_output("  Duration: N/A, bitrate: N/A"), None);
    }

    #[test]
    fn test_parse_probe_output_long_duration() {
        assert_eq!(
            parse_probe_output("  Duration: 12:00:00.00, start: 0"),
            Some(43200)
        );
    }

    #[test]
    fn test_probe_with_missing_tool() {
        let result = probe_duration(Path::new("/nonexistent/ffmpeg"), "in.mp4");
        assert!(matches!(result, Err(MediaError::ProbeError { .. })));
    }
}
