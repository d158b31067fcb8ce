//! Recency script runner

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing::info;

use recency_cli::{OutputFormat, Reply, Session, StatsReport, DEMO_SCRIPT};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of entries)
    #[arg(short, long, default_value_t = 2, allow_negative_numbers = true)]
    capacity: i64,

    /// Script file to replay (reads stdin when omitted)
    #[arg(short, long, conflicts_with = "demo")]
    script: Option<PathBuf>,

    /// Replay the built-in eviction scenario
    #[arg(long)]
    demo: bool,

    /// Print replies as JSON lines
    #[arg(long)]
    json: bool,

    /// Print cache statistics after the run
    #[arg(long)]
    stats: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing; stdout carries replies only
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let mut session = Session::new(args.capacity)?;
    info!("Cache capacity: {}", args.capacity);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let summary = if args.demo {
        info!("Replaying built-in demo script");
        session.run(DEMO_SCRIPT.as_bytes(), &mut out, format)?
    } else if let Some(path) = &args.script {
        info!("Replaying script {}", path.display());
        let file = File::open(path)
            .with_context(|| format!("failed to open script {}", path.display()))?;
        session.run(BufReader::new(file), &mut out, format)?
    } else {
        session.run(io::stdin().lock(), &mut out, format)?
    };

    if args.stats {
        let report = Reply::Stats(StatsReport::capture(session.cache()));
        recency_cli::session::write_reply(&mut out, &report, format)?;
    }
    out.flush()?;

    info!(
        "Executed {} commands ({} rejected)",
        summary.commands, summary.errors
    );
    session.close();

    Ok(())
}
