//! Command-line front end for tracked video operations.

pub mod cli;
pub mod commands;
pub mod config;

use anyhow::{Context, Result};

use clipper_media::VideoProcessor;
use clipper_models::{format_seconds, TaskRecord};

pub use cli::{Cli, Commands};
pub use commands::Session;
pub use config::ClipperConfig;

/// Execute a parsed command line.
pub async fn run(cli: Cli, config: ClipperConfig) -> Result<()> {
    let processor = VideoProcessor::from_config(&config.processor_config())
        .context("Failed to set up FFmpeg")?;
    let session = Session::new(processor, config);

    let tasks = match &cli.command {
        Commands::Cut(args) => vec![commands::operations::cut(&session, args).await?],
        Commands::Merge(args) => vec![commands::operations::merge(&session, args).await?],
        Commands::Convert(args) => vec![commands::operations::convert(&session, args).await?],
        Commands::ConvertDir(args) => {
            let dir = args
                .dir
                .as_ref()
                .map(|d| session.config.resolve(d))
                .unwrap_or_else(|| session.config.video_dir.clone());
            commands::convert_dir::convert_dir(&session, &dir).await?
        }
        Commands::Probe(args) => {
            let secs = commands::operations::probe(&session, args).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "file": args.file, "duration_secs": secs }));
            } else {
                println!("{} ({}s)", format_seconds(secs), secs);
            }
            return Ok(());
        }
    };

    report(&tasks, cli.json)
}

fn report(tasks: &[TaskRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
    } else {
        for task in tasks {
            println!("{}", commands::summarize(task));
        }
    }
    Ok(())
}
