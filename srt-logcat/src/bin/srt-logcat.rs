//! SRT Logcat - filter and replay SRT log files
//!
//! Reads a log written by the bridge's file sink, applies the level and
//! functional-area filter, and re-emits matching events into a new sink:
//! another log file, or this process's own log output.

use clap::Parser;
use srt_log::{LogArea, Severity, SinkKind};
use srt_logcat::config::{parse_areas, LogConfig};
use srt_logcat::{display_replay_stats, replay, same_file};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "srt-logcat")]
#[command(about = "Filter and replay SRT log files", long_about = None)]
struct Args {
    /// TOML configuration file (defaults to the SRT_* environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input log file, '-' for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Write matching events to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print matching events through this process's log output
    #[arg(long)]
    internal: bool,

    /// Most verbose level to keep (number or name, e.g. 'warning')
    #[arg(short, long)]
    level: Option<Severity>,

    /// Functional areas to keep: 'all' or a comma-separated list
    #[arg(long)]
    fa: Option<String>,

    /// Print a summary when done
    #[arg(long)]
    stats: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> anyhow::Result<LogConfig> {
    let mut config = match &args.config {
        Some(path) => LogConfig::from_file(path)?,
        None => LogConfig::from_env(),
    };

    if let Some(level) = args.level {
        config.level = level;
    }
    if let Some(fa) = &args.fa {
        config.areas = parse_areas(fa);
    }
    if let Some(output) = &args.output {
        config.file = Some(output.clone());
        config.internal = false;
    }
    if args.internal {
        config.internal = true;
    }
    config.verbose |= args.verbose;

    Ok(config)
}

fn open_input(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    if input == "-" {
        tracing::info!("Reading from stdin");
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        tracing::info!("Reading from {}", input);
        Ok(Box::new(BufReader::new(File::open(input)?)))
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    // Forwarded SRT events are already filtered, so let all of them through
    let default_filter = if config.verbose { "debug,srt=trace" } else { "info,srt=trace" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    // The file sink truncates on open, so the input must be open and
    // distinct from the output before the sink is installed
    let reader = open_input(&args.input)?;
    if let Some(output) = config.file.as_ref().filter(|_| !config.internal) {
        if args.input != "-" && same_file(&args.input, output) {
            anyhow::bail!("Output {} is the input file", output.display());
        }
    }

    let bridge = srt_log::global();
    let filter = config.install(bridge)?;
    if bridge.active_sink() == SinkKind::None {
        tracing::debug!("No sink configured, printing events");
        srt_log::forward::install(bridge);
    }

    let areas: Vec<&str> = filter.areas().map(LogArea::name).collect();
    tracing::info!(
        "Keeping level <= {} in areas [{}]",
        filter.level(),
        areas.join(",")
    );

    let start = Instant::now();
    let stats = replay(reader, &filter, bridge)?;

    // Closes the output file
    bridge.disable();

    if args.stats {
        display_replay_stats(&stats, start.elapsed());
    }

    Ok(())
}
