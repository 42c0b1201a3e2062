//! HRL Log Reader CLI Application
//!
//! This is the command-line interface for the HRL log reader/parser.
//! It uses the hrl-decoder library and adds:
//! - File ingestion from command-line arguments
//! - Textual report rendering (per-file banners, block and frame lines)
//! - JSON-lines output for downstream tooling
//! - The closing op-code statistics summary

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

mod report;

use hrl_decoder::{Decoder, DecoderConfig};

/// HRL Log Reader - Decode HRL vehicle-telemetry log containers
#[derive(Parser, Debug)]
#[command(name = "hrl-cli")]
#[command(about = "Decode HRL vehicle-telemetry log files", long_about = None)]
#[command(version)]
struct Args {
    /// HRL log files to decode (ordered by the creation timestamp in their names)
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Output file for the decoded report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum number of blocks to decode (for testing)
    #[arg(long, value_name = "COUNT")]
    max_blocks: Option<usize>,

    /// Suppress control marker lines
    #[arg(long)]
    no_control: bool,

    /// Skip the closing op-code statistics summary
    #[arg(long)]
    no_stats: bool,

    /// Emit JSON lines instead of the textual report
    #[arg(long)]
    json: bool,

    /// Stop the whole session at the first corrupt block
    #[arg(long)]
    strict: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("HRL Log Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", hrl_decoder::VERSION);

    let mut config = DecoderConfig::new()
        .with_control_frames(!args.no_control)
        .with_stats(!args.no_stats)
        .with_stop_after_corrupt_file(args.strict);
    if let Some(max) = args.max_blocks {
        config = config.with_max_blocks(max);
    }

    let decoder = Decoder::new();
    let mut session = decoder
        .decode_files(&args.files, config)
        .context("failed to ingest input files")?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if args.json {
        report::write_json(&mut out, &mut session)?;
        if !args.no_stats {
            report::write_stats_json(&mut out, session.stats())?;
        }
    } else {
        report::write_text(&mut out, &mut session)?;
        if !args.no_stats {
            report::write_stats(&mut out, session.stats())?;
        }
    }
    out.flush()?;

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
