//! Generation constants and runtime configuration defaults

// Rejection sampling
/// Attempts allowed for point and footprint rejection sampling
pub const MAX_SAMPLING_ITERATIONS: usize = 100;

// Cluster model fitting
/// Synthetic draws taken from the analytic mixture before fitting
pub const MIXTURE_SYNTHETIC_SAMPLES: usize = 1000;
/// Maximum expectation-maximisation iterations
pub const MIXTURE_MAX_ITERATIONS: usize = 100;
/// Change in mean log-likelihood below which EM has converged
pub const MIXTURE_TOLERANCE: f64 = 1e-3;
/// Added to covariance diagonals to keep them positive definite
pub const MIXTURE_REGULARIZATION: f64 = 1e-6;
/// Lloyd iterations used to initialise mixture responsibilities
pub const KMEANS_ITERATIONS: usize = 20;

// Sweep defaults
/// Smallest mixture component count in a sweep
pub const DEFAULT_MIN_CLUSTERS: usize = 10;
/// Largest mixture component count in a sweep
pub const DEFAULT_MAX_CLUSTERS: usize = 20;
/// Smallest control point count in a sweep
pub const DEFAULT_MIN_POINTS: usize = 100;
/// Largest control point count in a sweep
pub const DEFAULT_MAX_POINTS: usize = 1000;
/// Step between control point counts in a sweep
pub const DEFAULT_POINTS_STEP: usize = 50;
/// Fresh subseeds tried per sweep combination before it is reported failed
pub const DEFAULT_RETRY_BUDGET: usize = 8;

// Footprints are 5mm x 5mm scaled into template units
/// Footprint extent along x in template units
pub const FOOTPRINT_WIDTH: f64 = 5.0 * 2.712_167_801_821_898;
/// Footprint extent along y in template units
pub const FOOTPRINT_LENGTH: f64 = 5.0 * 2.791_163_031_349_545;

// Output settings
/// Rendered image width in pixels
pub const OUTPUT_WIDTH: u32 = 3840;
/// Rendered image height in pixels
pub const OUTPUT_HEIGHT: u32 = 2160;
/// Panel rows in a rendered figure
pub const PANEL_ROWS: u32 = 4;
/// Panel columns in a rendered figure
pub const PANEL_COLUMNS: u32 = 3;
/// Horizontal margin around the envelope as a fraction of its width
pub const PANEL_MARGIN_X: f64 = 0.1;
/// Vertical margin around the envelope as a fraction of its height
pub const PANEL_MARGIN_Y: f64 = 0.2;
/// Radius of control point markers in pixels
pub const POINT_RADIUS: i32 = 3;
/// Extension of rendered artifacts
pub const OUTPUT_EXTENSION: &str = "png";

// Palette
/// Figure background
pub const BACKGROUND_COLOR: [u8; 4] = [128, 128, 128, 255];
/// Tile color black
pub const BLACK: [u8; 4] = [0, 0, 0, 255];
/// Tile color white
pub const WHITE: [u8; 4] = [255, 255, 255, 255];
/// Envelope outline
pub const ENVELOPE_COLOR: [u8; 4] = [254, 1, 154, 255];
/// Control point markers
pub const POINT_COLOR: [u8; 4] = [75, 1, 1, 255];
/// Voronoi cell and rectangle outlines
pub const VORONOI_COLOR: [u8; 4] = [217, 84, 77, 255];
/// Delaunay cell and rectangle outlines
pub const DELAUNAY_COLOR: [u8; 4] = [117, 187, 253, 255];
/// White-enforced zone overlay
pub const WHITE_ZONE_COLOR: [u8; 4] = [199, 159, 239, 255];
/// Black-enforced zone overlay
pub const BLACK_ZONE_COLOR: [u8; 4] = [255, 121, 108, 255];

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
