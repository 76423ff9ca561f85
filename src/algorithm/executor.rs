//! One seeded generation run over a board
//!
//! A run fits the cluster model, samples control points, then builds a Voronoi
//! and a Delaunay partition from the same sites. Each partition is classified
//! against the exclusion zones, clipped to the envelope and tiled with every
//! strategy, with zone colors enforced on the resulting tiles. All randomness
//! comes from one generator seeded with the run's seed, so a configuration
//! reproduces its output exactly.

use crate::{
    algorithm::classification::{Classification, classify},
    algorithm::clipping::clip_all,
    algorithm::constraints::ColorConstraintEnforcer,
    algorithm::tiling::{OrientedRectangle, TileGenerator, TilingStrategy},
    io::error::{Result, invalid_parameter},
    math::mixture::{ClusterModel, random_exponents},
    spatial::partition::{PartitionBuilder, collect_sites},
    spatial::shapes::{Board, Cell, ExclusionZone, Provenance, Tile},
};
use geo::Coord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Parameters of a single generation run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GenerationConfig {
    /// Seed for the run's generator
    pub seed: u32,
    /// Mixture components in the cluster model
    pub num_clusters: usize,
    /// Control points drawn from the cluster model
    pub num_points: usize,
    /// Add a site at every exclusion zone centroid
    pub cluster_on_zone_centroids: bool,
    /// Add a site at every envelope vertex
    pub cluster_on_envelope: bool,
    /// Reject control points that fall outside the envelope
    pub constrain_points_to_envelope: bool,
}

impl GenerationConfig {
    /// Check the configuration can drive a run
    ///
    /// # Errors
    ///
    /// Returns an error if `num_clusters` is zero
    pub fn validate(&self) -> Result<()> {
        if self.num_clusters == 0 {
            return Err(invalid_parameter(
                "num_clusters",
                &self.num_clusters,
                &"at least one cluster is required",
            ));
        }
        Ok(())
    }
}

/// Tiles of one partition under one strategy
#[derive(Clone, Debug)]
pub struct Tiling {
    /// Strategy that produced the tiles
    pub strategy: TilingStrategy,
    /// Tiles with zone colors enforced
    pub tiles: Vec<Tile>,
}

/// Everything one partition kind produced during a run
#[derive(Clone, Debug)]
pub struct PartitionPass {
    /// Partition kind
    pub provenance: Provenance,
    /// Number of cells before clipping
    pub raw_cell_count: usize,
    /// Zone hosting of the unclipped cells
    pub classification: Classification,
    /// Clipped cells that have an oriented rectangle
    pub cells: Vec<Cell>,
    /// Oriented rectangle of each entry of `cells`
    pub rectangles: Vec<OrientedRectangle>,
    /// One tiling per strategy, in [`TilingStrategy::ALL`] order
    pub tilings: Vec<Tiling>,
}

impl PartitionPass {
    /// Tiles produced by `strategy`
    pub fn tiles(&self, strategy: TilingStrategy) -> &[Tile] {
        self.tilings
            .iter()
            .find(|tiling| tiling.strategy == strategy)
            .map_or(&[], |tiling| tiling.tiles.as_slice())
    }
}

/// Output of a generation run
#[derive(Clone, Debug)]
pub struct Generation {
    /// Configuration the run was made with
    pub config: GenerationConfig,
    /// Control points sampled from the cluster model
    pub control_points: Vec<Coord<f64>>,
    /// Voronoi partition results
    pub voronoi: PartitionPass,
    /// Delaunay partition results
    pub delaunay: PartitionPass,
}

impl Generation {
    /// Both passes in pipeline order
    pub const fn passes(&self) -> [&PartitionPass; 2] {
        [&self.voronoi, &self.delaunay]
    }
}

/// Run the full pipeline for `config` on `board`
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - The cluster model cannot be fitted or sampled
/// - A partition cannot be built or yields non-polygon cells
/// - A cell contains an exclusion zone without strictly containing it
pub fn generate(config: &GenerationConfig, board: &Board) -> Result<Generation> {
    config.validate()?;
    log::debug!(
        "Generating seed {} with {} clusters and {} points",
        config.seed,
        config.num_clusters,
        config.num_points
    );

    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(config.seed));

    let exponents = random_exponents(config.num_clusters, &mut rng);
    let model = ClusterModel::fit(&exponents, &board.envelope, &mut rng)?;
    let control_points = if config.constrain_points_to_envelope {
        model.sample_within_envelope(&board.envelope, config.num_points, &mut rng)?
    } else {
        model.sample(config.num_points, &mut rng)?
    };

    let sites = collect_sites(
        &control_points,
        board,
        config.cluster_on_zone_centroids,
        config.cluster_on_envelope,
    );
    let builder = PartitionBuilder::new(&board.envelope)?;
    let zones: Vec<ExclusionZone> = board.zones().cloned().collect();

    let voronoi = run_pass(Provenance::Voronoi, &builder, &sites, board, &zones, &mut rng)?;
    let delaunay = run_pass(Provenance::Delaunay, &builder, &sites, board, &zones, &mut rng)?;

    Ok(Generation {
        config: *config,
        control_points,
        voronoi,
        delaunay,
    })
}

fn run_pass<R: Rng + ?Sized>(
    provenance: Provenance,
    builder: &PartitionBuilder,
    sites: &[Coord<f64>],
    board: &Board,
    zones: &[ExclusionZone],
    rng: &mut R,
) -> Result<PartitionPass> {
    let raw_cells = builder.build(provenance, sites, rng)?;
    let classification = classify(&raw_cells, zones)?;
    let clipped = clip_all(&raw_cells, &board.envelope)?;

    // Black zones are checked first, so white zones win on conflict
    let enforcer = ColorConstraintEnforcer::new(&board.black_zones, &board.white_zones);
    let generator = TileGenerator::new(&board.envelope);

    let mut cells = Vec::with_capacity(clipped.len());
    let mut rectangles = Vec::with_capacity(clipped.len());
    let mut tilings: Vec<Tiling> = TilingStrategy::ALL
        .into_iter()
        .map(|strategy| Tiling {
            strategy,
            tiles: Vec::new(),
        })
        .collect();

    for (index, cell) in clipped.into_iter().enumerate() {
        let rectangle = match OrientedRectangle::from_polygon(&cell.polygon) {
            Ok(rectangle) => rectangle,
            Err(error) if !error.is_fatal() => {
                log::warn!("Skipping {} cell {index}: {error}", provenance.name());
                continue;
            }
            Err(error) => return Err(error),
        };

        for tiling in &mut tilings {
            let tiles = generator.tile_rectangle(&cell, &rectangle, tiling.strategy, rng)?;
            tiling.tiles.extend(enforcer.enforce_all(tiles));
        }

        cells.push(cell);
        rectangles.push(rectangle);
    }

    log::debug!(
        "{} pass: {} raw cells, {} tiled, {} hosting zones",
        provenance.name(),
        raw_cells.len(),
        cells.len(),
        classification.hosting_cell_count()
    );

    Ok(PartitionPass {
        provenance,
        raw_cell_count: raw_cells.len(),
        classification,
        cells,
        rectangles,
        tilings,
    })
}
