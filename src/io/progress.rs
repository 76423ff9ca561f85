//! Sweep progress display and a log backend that prints through it

use crate::algorithm::sweep::{Combination, SweepOutcome};
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use crate::io::error::{Result, computation_error};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{LevelFilter, Log, Metadata, Record};
use std::sync::LazyLock;

static SWEEP_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Combinations: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static ATTEMPT_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.yellow/red}}] attempt {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Coordinates progress bars for a sweep
///
/// One bar counts finished combinations, a second shows retry attempts of the
/// combination currently running.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    sweep_bar: Option<ProgressBar>,
    attempt_bar: Option<ProgressBar>,
    failed: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            sweep_bar: None,
            attempt_bar: None,
            failed: 0,
        }
    }

    /// Handle for printing above the bars
    pub const fn multi_progress(&self) -> &MultiProgress {
        &self.multi_progress
    }

    /// Create the bars for `combination_count` combinations
    pub fn initialize(&mut self, combination_count: usize) {
        let sweep_bar = ProgressBar::new(combination_count as u64);
        sweep_bar.set_style(SWEEP_STYLE.clone());
        self.sweep_bar = Some(self.multi_progress.add(sweep_bar));

        let attempt_bar = ProgressBar::new(0);
        attempt_bar.set_style(ATTEMPT_STYLE.clone());
        self.attempt_bar = Some(self.multi_progress.add(attempt_bar));
    }

    /// Show a combination as running with `retry_budget` attempts available
    pub fn start_combination(&self, combination: &Combination, retry_budget: usize) {
        if let Some(ref bar) = self.attempt_bar {
            bar.set_length(retry_budget as u64);
            bar.set_position(0);
            bar.set_prefix(combination.to_string());
        }
    }

    /// Count a finished combination and show the attempts it took
    pub fn complete_combination(&mut self, outcome: &SweepOutcome) {
        if !outcome.is_completed() {
            self.failed += 1;
        }
        if let Some(ref bar) = self.attempt_bar {
            bar.set_position(outcome.attempts() as u64);
        }
        if let Some(ref bar) = self.sweep_bar {
            bar.inc(1);
            if self.failed > 0 {
                bar.set_message(format!("{} failed", self.failed));
            }
        }
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref bar) = self.attempt_bar {
            bar.finish_and_clear();
        }
        if let Some(ref bar) = self.sweep_bar {
            bar.finish_with_message("All combinations processed");
        }
        let _ = self.multi_progress.clear();
    }
}

/// `log` backend writing above active progress bars, or to stderr
pub struct ProgressLogger {
    level: LevelFilter,
    multi_progress: Option<MultiProgress>,
}

impl ProgressLogger {
    /// Logger passing records at or above `level`
    pub const fn new(level: LevelFilter, multi_progress: Option<MultiProgress>) -> Self {
        Self {
            level,
            multi_progress,
        }
    }

    /// Level for a `-v` count: warn, info, debug, then trace
    pub const fn level_for(verbosity: u8) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Whether records are printed through the progress bars
    ///
    /// A hidden draw target (stderr not a terminal) swallows printed lines, so
    /// records then go straight to stderr.
    pub fn prints_above_bars(&self) -> bool {
        self.multi_progress
            .as_ref()
            .is_some_and(|multi_progress| !multi_progress.is_hidden())
    }

    /// Install as the global logger
    ///
    /// # Errors
    ///
    /// Returns an error if a global logger is already set
    pub fn install(self) -> Result<()> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))
            .map_err(|error| computation_error("logger installation", &error))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for ProgressLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    // Stderr is the fallback when no bars are drawn
    #[allow(clippy::print_stderr)]
    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!("[{:<5}] {}", record.level(), record.args());
        let printed = self.prints_above_bars()
            && self
                .multi_progress
                .as_ref()
                .is_some_and(|multi_progress| multi_progress.println(&line).is_ok());

        if !printed {
            eprintln!("{line}");
        }
    }

    fn flush(&self) {}
}
