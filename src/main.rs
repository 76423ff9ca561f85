//! CLI entry point for dazzle pattern sweeps

use clap::Parser;
use dazzle::io::cli::{Cli, SweepProcessor};
use dazzle::io::progress::ProgressLogger;

fn main() -> dazzle::Result<()> {
    let cli = Cli::parse();
    let level = ProgressLogger::level_for(cli.verbose);
    let mut processor = SweepProcessor::new(cli);
    ProgressLogger::new(level, processor.multi_progress()).install()?;
    processor.process()
}
