//! Command-line interface for running a dazzle sweep over a template

use crate::algorithm::sweep::{Sweep, SweepSettings};
use crate::io::configuration::{
    DEFAULT_MAX_CLUSTERS, DEFAULT_MAX_POINTS, DEFAULT_MIN_CLUSTERS, DEFAULT_MIN_POINTS,
    DEFAULT_POINTS_STEP, DEFAULT_RETRY_BUDGET,
};
use crate::io::error::{GenerationError, Result};
use crate::io::image::FigureRenderer;
use crate::io::progress::ProgressManager;
use crate::io::template::{Template, place_footprints};
use clap::{ArgAction, Parser};
use indicatif::MultiProgress;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::convert::Infallible;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "dazzle")]
#[command(
    author,
    version,
    about = "Generate two-tone dazzle tilings of a board outline"
)]
/// Command-line arguments for the sweep
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Template JSON file: envelope, contours and optional footprints
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Master seed for the zone split and subseeds (random when omitted)
    #[arg(short, long)]
    pub seed: Option<u32>,

    /// Directory receiving the rendered figures
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Smallest cluster count
    #[arg(long, default_value_t = DEFAULT_MIN_CLUSTERS)]
    pub min_clusters: usize,

    /// Largest cluster count
    #[arg(long, default_value_t = DEFAULT_MAX_CLUSTERS)]
    pub max_clusters: usize,

    /// Smallest control point count
    #[arg(long, default_value_t = DEFAULT_MIN_POINTS)]
    pub min_points: usize,

    /// Largest control point count
    #[arg(long, default_value_t = DEFAULT_MAX_POINTS)]
    pub max_points: usize,

    /// Step between control point counts
    #[arg(long, default_value_t = DEFAULT_POINTS_STEP)]
    pub points_step: usize,

    /// Subseeds tried per combination before it is reported failed
    #[arg(short, long, default_value_t = DEFAULT_RETRY_BUDGET)]
    pub retries: usize,

    /// Random component footprints to place inside the envelope
    #[arg(short, long, default_value_t = 0)]
    pub footprints: usize,

    /// Keep control points inside the envelope
    #[arg(short, long)]
    pub constrain_points: bool,

    /// Overlay exclusion zones on every panel
    #[arg(
        long,
        env = "PLOT_CONSTRAINTS",
        action = ArgAction::SetTrue,
        value_parser = parse_toggle
    )]
    pub plot_constraints: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Environment toggle: `true` in any case turns it on, anything else is off
///
/// # Errors
///
/// Never fails; the error type is [`Infallible`]
pub fn parse_toggle(value: &str) -> std::result::Result<bool, Infallible> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Sweep grid and retry settings from the arguments
    pub const fn settings(&self) -> SweepSettings {
        SweepSettings {
            min_clusters: self.min_clusters,
            max_clusters: self.max_clusters,
            min_points: self.min_points,
            max_points: self.max_points,
            points_step: self.points_step,
            retry_budget: self.retries,
            constrain_points_to_envelope: self.constrain_points,
        }
    }
}

/// Drives a whole sweep from a template file to a directory of figures
pub struct SweepProcessor {
    cli: Cli,
    seed: u32,
    progress_manager: Option<ProgressManager>,
}

impl SweepProcessor {
    /// Create a processor, drawing a master seed if none was given
    pub fn new(cli: Cli) -> Self {
        let seed = cli.seed.unwrap_or_else(rand::random);
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            seed,
            progress_manager,
        }
    }

    /// Master seed of the sweep
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Progress handle for log output, if progress is shown
    pub fn multi_progress(&self) -> Option<MultiProgress> {
        self.progress_manager
            .as_ref()
            .map(|pm| pm.multi_progress().clone())
    }

    /// Run every combination of the sweep
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The template cannot be loaded or normalised
    /// - Footprints cannot be placed
    /// - The sweep settings are invalid
    /// - A figure cannot be written
    /// - Any combination exhausts its retry budget
    pub fn process(&mut self) -> Result<()> {
        let start_time = Instant::now();
        log::info!("Using master seed {}", self.seed);

        let template = Template::load(&self.cli.template)?;
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(self.seed));
        let mut board = template.to_board(&mut rng)?;
        place_footprints(&mut board, self.cli.footprints, &mut rng)?;
        log::info!(
            "Loaded board from {} with {} zones",
            self.cli.template.display(),
            board.zone_count()
        );

        let renderer = FigureRenderer::new(&board, self.cli.plot_constraints);
        let mut sweep = Sweep::new(&board, self.cli.settings(), self.seed)?;
        let combinations = sweep.combinations();
        let total = combinations.len();

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(total);
        }

        let output = &self.cli.output;
        let mut failed = 0;

        for combination in combinations {
            if let Some(ref pm) = self.progress_manager {
                pm.start_combination(&combination, sweep.settings().retry_budget);
            }

            let outcome = sweep.run_combination(combination, &mut |generation| {
                renderer.export(generation, output).map(|_| ())
            })?;

            if !outcome.is_completed() {
                failed += 1;
            }
            if let Some(ref mut pm) = self.progress_manager {
                pm.complete_combination(&outcome);
            }
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        log::info!(
            "Processed {total} combinations in {:.1}s",
            start_time.elapsed().as_secs_f64()
        );

        if failed > 0 {
            return Err(GenerationError::SweepIncomplete { failed, total });
        }

        Ok(())
    }
}
