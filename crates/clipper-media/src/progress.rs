//! FFmpeg progress estimation.
//!
//! FFmpeg reports how much media it has processed with periodic stats lines on
//! stderr, e.g. `frame=  240 fps=48 ... time=00:00:10.00 bitrate=...`. The
//! stream arrives in arbitrary-sized chunks, so a marker may straddle two
//! reads. [`estimate_progress`] is a pure function over everything received
//! so far; [`ProgressTracker`] accumulates chunks and turns successive
//! estimates into a monotonic percentage with a heartbeat fallback.

use clipper_models::parse_duration;

/// Heartbeat increments never raise progress above this value.
pub const HEARTBEAT_CEILING: u8 = 20;

const MARKER: &str = "time=";

/// Bytes kept when the buffer holds no marker. Comfortably longer
/// than a marker plus its timestamp.
const TAIL_KEEP: usize = 64;

/// Estimate completion percentage from accumulated FFmpeg output.
///
/// Uses the last `time=HH:MM:SS.ff` marker and returns
/// `round(current / total * 100)` clamped to `0..=100`. Returns `None` when
/// no marker is present yet or when `total_secs` is zero.
///
/// A marker still being streamed at the end of the buffer reads lower than
/// its final value; [`ProgressTracker`] never lets progress go backwards.
pub fn estimate_progress(output: &str, total_secs: u64) -> Option<u8> {
    if total_secs == 0 {
        return None;
    }

    let (_, current_secs) = last_marker(output)?;
    let percentage = (current_secs as f64 / total_secs as f64 * 100.0).round();
    Some(percentage.clamp(0.0, 100.0) as u8)
}

/// Find the last `time=` marker followed by a timestamp.
///
/// `time=N/A` carries no timestamp and is not a marker.
fn last_marker(output: &str) -> Option<(usize, u64)> {
    output.rmatch_indices(MARKER).find_map(|(idx, _)| {
        let token_start = idx + MARKER.len();
        let token = output[token_start..]
            .split(|c: char| !(c.is_ascii_digit() || matches!(c, ':' | '.' | '-')))
            .next()
            .unwrap_or("");

        if !token.contains(':') {
            return None;
        }
        Some((idx, parse_duration(token)))
    })
}

/// Turns a chunked diagnostic stream into monotonic progress values.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    buffer: String,
    total_secs: u64,
    current: u8,
}

impl ProgressTracker {
    pub fn new(total_secs: u64) -> Self {
        Self {
            buffer: String::new(),
            total_secs,
            current: 0,
        }
    }

    /// Current progress value.
    pub fn current(&self) -> u8 {
        self.current
    }

    /// Feed one chunk of raw stream bytes.
    ///
    /// Returns the new progress value if it changed. A real measurement is
    /// adopted when it is higher than the current value; without one, progress
    /// ticks up by one per chunk until [`HEARTBEAT_CEILING`].
    pub fn observe(&mut self, chunk: &[u8]) -> Option<u8> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let next = match estimate_progress(&self.buffer, self.total_secs) {
            Some(measured) => self.current.max(measured),
            None if self.current < HEARTBEAT_CEILING => self.current + 1,
            None => self.current,
        };
        self.compact();

        if next != self.current {
            self.current = next;
            Some(next)
        } else {
            None
        }
    }

    /// Drop bytes that can no longer change the estimate.
    fn compact(&mut self) {
        if let Some((idx, _)) = last_marker(&self.buffer) {
            self.buffer.replace_range(..idx, "");
        } else if self.buffer.len() > TAIL_KEEP {
            let mut start = self.buffer.len() - TAIL_KEEP;
            while !self.buffer.is_char_boundary(start) {
                start += 1;
            }
            self.buffer.replace_range(..start, "");
        }
    }
}
