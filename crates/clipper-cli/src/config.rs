//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clipper_media::ProcessorConfig;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct ClipperConfig {
    /// Explicit FFmpeg path; resolved from `PATH` when unset
    pub ffmpeg_path: Option<PathBuf>,
    /// Base directory for relative file arguments
    pub video_dir: PathBuf,
    /// How often running tasks are polled for progress
    pub progress_interval: Duration,
    /// Probe input duration before converting
    pub probe_convert: bool,
}

impl Default for ClipperConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            video_dir: PathBuf::from("."),
            progress_interval: Duration::from_millis(500),
            probe_convert: true,
        }
    }
}

impl ClipperConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            ffmpeg_path: var("CLIPPER_FFMPEG_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            video_dir: var("CLIPPER_VIDEO_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.video_dir),
            progress_interval: var("CLIPPER_PROGRESS_INTERVAL_MS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.progress_interval),
            probe_convert: var("CLIPPER_PROBE_CONVERT")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.probe_convert),
        }
    }

    /// Settings for the media processor.
    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            ffmpeg_path: self.ffmpeg_path.clone(),
            probe_convert_duration: self.probe_convert,
        }
    }

    /// Resolve a file argument against the video directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.video_dir.join(path)
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ClipperConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClipperConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert!(config.ffmpeg_path.is_none());
        assert_eq!(config.video_dir, PathBuf::from("."));
        assert_eq!(config.progress_interval, Duration::from_millis(500));
        assert!(config.probe_convert);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CLIPPER_FFMPEG_PATH", "/opt/ffmpeg/bin/ffmpeg"),
            ("CLIPPER_VIDEO_DIR", "/srv/videos"),
            ("CLIPPER_PROGRESS_INTERVAL_MS", "250"),
            ("CLIPPER_PROBE_CONVERT", "false"),
        ]);
        assert_eq!(config.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")));
        assert_eq!(config.video_dir, PathBuf::from("/srv/videos"));
        assert_eq!(config.progress_interval, Duration::from_millis(250));
        assert!(!config.probe_convert);

        let processor = config.processor_config();
        assert!(!processor.probe_convert_duration);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("CLIPPER_FFMPEG_PATH", " "),
            ("CLIPPER_PROGRESS_INTERVAL_MS", "0"),
            ("CLIPPER_PROBE_CONVERT", "maybe"),
        ]);
        assert!(config.ffmpeg_path.is_none());
        assert_eq!(config.progress_interval, Duration::from_millis(500));
        assert!(config.probe_convert);
    }

    #[test]
    fn test_resolve_relative_paths() {
        let config = config_from(&[("CLIPPER_VIDEO_DIR", "/srv/videos")]);
        assert_eq!(config.resolve("a.mp4"), PathBuf::from("/srv/videos/a.mp4"));
        assert_eq!(config.resolve("/tmp/b.mp4"), PathBuf::from("/tmp/b.mp4"));
    }
}
