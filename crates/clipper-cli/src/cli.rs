//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use clipper_models::try_parse_duration;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Clipper: cut, merge and convert videos with FFmpeg",
    long_about = "Runs FFmpeg operations as tracked tasks and reports their progress."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print final task records as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cut a time range out of a video
    Cut(CutArgs),
    /// Concatenate videos in order without re-encoding
    Merge(MergeArgs),
    /// Re-encode a video to H.264/AAC
    Convert(ConvertArgs),
    /// Convert every legacy-format video in a directory to MP4
    ConvertDir(ConvertDirArgs),
    /// Print the duration of a media file
    Probe(ProbeArgs),
}

#[derive(Args, Debug)]
pub struct CutArgs {
    /// Source video
    #[arg(short = 'i', long = "input", value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination file; its extension selects the codecs
    #[arg(short = 'o', long = "output", value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Range start (HH:MM:SS)
    #[arg(long, value_name = "HH:MM:SS", value_parser = parse_timestamp)]
    pub start: String,

    /// Range end (HH:MM:SS)
    #[arg(long, value_name = "HH:MM:SS", value_parser = parse_timestamp)]
    pub end: String,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Destination file
    #[arg(short = 'o', long = "output", value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Videos to concatenate, in order
    #[arg(required = true, num_args = 1.., value_name = "INPUTS")]
    pub inputs: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Source video
    #[arg(short = 'i', long = "input", value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination file
    #[arg(short = 'o', long = "output", value_name = "OUTPUT")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConvertDirArgs {
    /// Directory to scan (defaults to CLIPPER_VIDEO_DIR)
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Media file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

fn parse_timestamp(value: &str) -> Result<String, String> {
    try_parse_duration(value)
        .map(|_| value.to_string())
        .ok_or_else(|| format!("expected HH:MM:SS, got '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cut() {
        let cli = Cli::try_parse_from([
            "clipper", "cut", "-i", "in.mp4", "-o", "out.mp4", "--start", "00:00:10", "--end",
            "00:00:20",
        ])
        .unwrap();

        match cli.command {
            Commands::Cut(args) => {
                assert_eq!(args.input, PathBuf::from("in.mp4"));
                assert_eq!(args.start, "00:00:10");
                assert_eq!(args.end, "00:00:20");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cut_rejects_bad_timestamp() {
        let result = Cli::try_parse_from([
            "clipper", "cut", "-i", "in.mp4", "-o", "out.mp4", "--start", "ten", "--end",
            "00:00:20",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cut_rejects_out_of_range_timestamp() {
        for bad in ["00:01:1e300", "9000000000000000:00:00"] {
            let result = Cli::try_parse_from([
                "clipper", "cut", "-i", "in.mp4", "-o", "out.mp4", "--start", bad, "--end",
                "00:00:20",
            ]);
            assert!(result.is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_parse_merge_keeps_order() {
        let cli =
            Cli::try_parse_from(["clipper", "merge", "-o", "ab.mp4", "b.mp4", "a.mp4"]).unwrap();
        match cli.command {
            Commands::Merge(args) => {
                assert_eq!(args.inputs, vec![PathBuf::from("b.mp4"), PathBuf::from("a.mp4")]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_convert_dir_and_json_flag() {
        let cli =
            Cli::try_parse_from(["clipper", "convert-dir", "-d", "/videos", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::ConvertDir(args) => assert_eq!(args.dir, Some(PathBuf::from("/videos"))),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
