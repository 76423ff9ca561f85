//! Batch parameter sweep with bounded retries
//!
//! A sweep walks a grid of cluster and point counts. Each combination draws a
//! fresh 32-bit subseed per attempt and generates all four clustering flag
//! variants with it. Retryable failures draw a new subseed until the retry
//! budget runs out, at which point the combination is reported as failed
//! instead of retried forever.

use crate::{
    algorithm::executor::{Generation, GenerationConfig, generate},
    io::configuration::{
        DEFAULT_MAX_CLUSTERS, DEFAULT_MAX_POINTS, DEFAULT_MIN_CLUSTERS, DEFAULT_MIN_POINTS,
        DEFAULT_POINTS_STEP, DEFAULT_RETRY_BUDGET,
    },
    io::error::{GenerationError, Result, invalid_parameter},
    spatial::shapes::Board,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// `(cluster_on_zone_centroids, cluster_on_envelope)` variants run per subseed
pub const CLUSTERING_VARIANTS: [(bool, bool); 4] =
    [(false, false), (false, true), (true, false), (true, true)];

/// Grid and retry settings of a sweep
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepSettings {
    /// Smallest cluster count
    pub min_clusters: usize,
    /// Largest cluster count, inclusive
    pub max_clusters: usize,
    /// Smallest point count
    pub min_points: usize,
    /// Largest point count, inclusive
    pub max_points: usize,
    /// Step between point counts
    pub points_step: usize,
    /// Subseeds tried per combination
    pub retry_budget: usize,
    /// Keep control points inside the envelope
    pub constrain_points_to_envelope: bool,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            min_clusters: DEFAULT_MIN_CLUSTERS,
            max_clusters: DEFAULT_MAX_CLUSTERS,
            min_points: DEFAULT_MIN_POINTS,
            max_points: DEFAULT_MAX_POINTS,
            points_step: DEFAULT_POINTS_STEP,
            retry_budget: DEFAULT_RETRY_BUDGET,
            constrain_points_to_envelope: false,
        }
    }
}

impl SweepSettings {
    /// Check the grid is non-empty and retries are allowed
    ///
    /// # Errors
    ///
    /// Returns an error if a range is empty, the cluster range starts at zero,
    /// the point step is zero or the retry budget is zero
    pub fn validate(&self) -> Result<()> {
        if self.min_clusters == 0 {
            return Err(invalid_parameter(
                "min_clusters",
                &self.min_clusters,
                &"at least one cluster is required",
            ));
        }
        if self.min_clusters > self.max_clusters {
            return Err(invalid_parameter(
                "max_clusters",
                &self.max_clusters,
                &format!("must be at least min_clusters ({})", self.min_clusters),
            ));
        }
        if self.min_points > self.max_points {
            return Err(invalid_parameter(
                "max_points",
                &self.max_points,
                &format!("must be at least min_points ({})", self.min_points),
            ));
        }
        if self.points_step == 0 {
            return Err(invalid_parameter(
                "points_step",
                &self.points_step,
                &"step must be positive",
            ));
        }
        if self.retry_budget == 0 {
            return Err(invalid_parameter(
                "retry_budget",
                &self.retry_budget,
                &"at least one attempt is required",
            ));
        }
        Ok(())
    }

    /// Every combination of the grid, clusters outermost
    pub fn combinations(&self) -> Vec<Combination> {
        (self.min_clusters..=self.max_clusters)
            .flat_map(|num_clusters| {
                (self.min_points..=self.max_points)
                    .step_by(self.points_step.max(1))
                    .map(move |num_points| Combination {
                        num_clusters,
                        num_points,
                    })
            })
            .collect()
    }
}

/// One grid cell of a sweep
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Combination {
    /// Mixture components
    pub num_clusters: usize,
    /// Control points
    pub num_points: usize,
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} clusters, {} points", self.num_clusters, self.num_points)
    }
}

/// Result of running one combination
#[derive(Debug)]
pub enum SweepOutcome {
    /// All variants generated with one subseed
    Completed {
        /// Combination that was run
        combination: Combination,
        /// Subseed that succeeded
        subseed: u32,
        /// Attempts used, including the successful one
        attempts: usize,
    },
    /// Every attempt in the budget failed
    Failed {
        /// Combination that was run
        combination: Combination,
        /// Attempts made
        attempts: usize,
        /// Error of the last attempt
        error: GenerationError,
    },
}

impl SweepOutcome {
    /// Whether the combination produced output
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Combination the outcome belongs to
    pub const fn combination(&self) -> Combination {
        match self {
            Self::Completed { combination, .. } | Self::Failed { combination, .. } => *combination,
        }
    }

    /// Attempts made for the combination
    pub const fn attempts(&self) -> usize {
        match self {
            Self::Completed { attempts, .. } | Self::Failed { attempts, .. } => *attempts,
        }
    }
}

/// Sweep state: the board and the subseed generator
#[derive(Debug)]
pub struct Sweep<'a> {
    board: &'a Board,
    settings: SweepSettings,
    rng: ChaCha8Rng,
}

impl<'a> Sweep<'a> {
    /// Sweep over `board` drawing subseeds from `master_seed`
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid
    pub fn new(board: &'a Board, settings: SweepSettings, master_seed: u32) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            board,
            settings,
            rng: ChaCha8Rng::seed_from_u64(u64::from(master_seed)),
        })
    }

    /// Settings the sweep runs with
    pub const fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    /// Grid combinations in run order
    pub fn combinations(&self) -> Vec<Combination> {
        self.settings.combinations()
    }

    /// Generate the four clustering variants of `combination` for one subseed
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any variant
    pub fn generate_variants(&self, combination: Combination, subseed: u32) -> Result<Vec<Generation>> {
        CLUSTERING_VARIANTS
            .into_iter()
            .map(|(on_zones, on_envelope)| {
                let config = GenerationConfig {
                    seed: subseed,
                    num_clusters: combination.num_clusters,
                    num_points: combination.num_points,
                    cluster_on_zone_centroids: on_zones,
                    cluster_on_envelope: on_envelope,
                    constrain_points_to_envelope: self.settings.constrain_points_to_envelope,
                };
                generate(&config, self.board)
            })
            .collect()
    }

    /// Run one combination, handing each generation of the successful attempt to `sink`
    ///
    /// # Errors
    ///
    /// Returns non-retryable generation errors and any error raised by `sink`;
    /// exhausting the retry budget is reported as [`SweepOutcome::Failed`]
    pub fn run_combination<F>(&mut self, combination: Combination, sink: &mut F) -> Result<SweepOutcome>
    where
        F: FnMut(&Generation) -> Result<()>,
    {
        let mut last_error = None;

        for attempt in 1..=self.settings.retry_budget {
            let subseed = self.rng.random::<u32>();

            match self.generate_variants(combination, subseed) {
                Ok(generations) => {
                    for generation in &generations {
                        sink(generation)?;
                    }
                    log::info!("Completed {combination} with subseed {subseed} after {attempt} attempt(s)");
                    return Ok(SweepOutcome::Completed {
                        combination,
                        subseed,
                        attempts: attempt,
                    });
                }
                Err(error) if error.is_retryable() => {
                    log::warn!("Attempt {attempt} for {combination} with subseed {subseed} failed: {error}");
                    last_error = Some(error);
                }
                Err(error) => return Err(error),
            }
        }

        let error = last_error.ok_or_else(|| {
            invalid_parameter(
                "retry_budget",
                &self.settings.retry_budget,
                &"at least one attempt is required",
            )
        })?;
        log::error!(
            "Giving up on {combination} after {} attempts: {error}",
            self.settings.retry_budget
        );

        Ok(SweepOutcome::Failed {
            combination,
            attempts: self.settings.retry_budget,
            error,
        })
    }
}
