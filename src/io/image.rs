//! Raster export of generation runs
//!
//! A run renders to a fixed-size figure of panels. Each partition kind gets
//! two rows: control points, cell outlines and oriented rectangles, then one
//! panel per tiling strategy. Panels are drawn on their own canvas and pasted
//! into the figure, so geometry outside a panel's frame is cut off there.

use crate::algorithm::executor::{Generation, GenerationConfig, PartitionPass};
use crate::algorithm::tiling::TilingStrategy;
use crate::io::configuration::{
    BACKGROUND_COLOR, BLACK, BLACK_ZONE_COLOR, DELAUNAY_COLOR, ENVELOPE_COLOR, OUTPUT_EXTENSION,
    OUTPUT_HEIGHT, OUTPUT_WIDTH, PANEL_COLUMNS, PANEL_MARGIN_X, PANEL_MARGIN_Y, PANEL_ROWS,
    POINT_COLOR, POINT_RADIUS, VORONOI_COLOR, WHITE, WHITE_ZONE_COLOR,
};
use crate::io::error::{GenerationError, Result};
use crate::spatial::shapes::{Board, Color, Provenance};
use geo::{BoundingRect, Coord, MultiPoint, Point, Polygon, Rect};
use image::{Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point as PixelPoint;
use std::path::{Path, PathBuf};

/// File name of the figure for a run
///
/// `{clusters}_{points}_{led|noled}_{envelope|noenvelope}_{seed}.png`
pub fn artifact_name(config: &GenerationConfig) -> String {
    format!(
        "{}_{}_{}_{}_{}.{OUTPUT_EXTENSION}",
        config.num_clusters,
        config.num_points,
        if config.cluster_on_zone_centroids {
            "led"
        } else {
            "noled"
        },
        if config.cluster_on_envelope {
            "envelope"
        } else {
            "noenvelope"
        },
        config.seed
    )
}

// Maps board coordinates into one panel canvas, y up, aspect preserved
#[derive(Clone, Copy, Debug)]
struct Frame {
    min: Coord<f64>,
    max: Coord<f64>,
    scale: f64,
    pad_x: f64,
    pad_y: f64,
}

impl Frame {
    fn new(bounds: Rect<f64>, width: u32, height: u32) -> Self {
        let margin_x = bounds.width() * PANEL_MARGIN_X;
        let margin_y = bounds.height() * PANEL_MARGIN_Y;
        let min = Coord {
            x: bounds.min().x - margin_x,
            y: bounds.min().y - margin_y,
        };
        let max = Coord {
            x: bounds.max().x + margin_x,
            y: bounds.max().y + margin_y,
        };
        let span_x = (max.x - min.x).max(f64::EPSILON);
        let span_y = (max.y - min.y).max(f64::EPSILON);
        let scale = (f64::from(width) / span_x).min(f64::from(height) / span_y);

        Self {
            min,
            max,
            scale,
            pad_x: span_x.mul_add(-scale, f64::from(width)) / 2.0,
            pad_y: span_y.mul_add(-scale, f64::from(height)) / 2.0,
        }
    }

    fn project(&self, coord: Coord<f64>) -> (f32, f32) {
        (
            (coord.x - self.min.x).mul_add(self.scale, self.pad_x) as f32,
            (self.max.y - coord.y).mul_add(self.scale, self.pad_y) as f32,
        )
    }
}

fn fill_polygon(canvas: &mut RgbaImage, frame: &Frame, polygon: &Polygon<f64>, color: [u8; 4]) {
    let mut points: Vec<PixelPoint<i32>> = polygon
        .exterior()
        .coords()
        .map(|&coord| {
            let (x, y) = frame.project(coord);
            PixelPoint::new(x.round() as i32, y.round() as i32)
        })
        .collect();
    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    // Fewer than three distinct pixels cannot be filled
    if points.len() >= 3 {
        draw_polygon_mut(canvas, &points, Rgba(color));
    }
}

fn outline_polygon(canvas: &mut RgbaImage, frame: &Frame, polygon: &Polygon<f64>, color: [u8; 4]) {
    for line in polygon.exterior().lines() {
        draw_line_segment_mut(
            canvas,
            frame.project(line.start),
            frame.project(line.end),
            Rgba(color),
        );
    }
}

const fn tone(color: Color) -> [u8; 4] {
    match color {
        Color::Black => BLACK,
        Color::White => WHITE,
    }
}

const fn outline_color(provenance: Provenance) -> [u8; 4] {
    match provenance {
        Provenance::Voronoi => VORONOI_COLOR,
        Provenance::Delaunay => DELAUNAY_COLOR,
    }
}

/// Renders runs on one board
#[derive(Clone, Copy, Debug)]
pub struct FigureRenderer<'a> {
    board: &'a Board,
    plot_constraints: bool,
}

impl<'a> FigureRenderer<'a> {
    /// Renderer for `board`, optionally overlaying exclusion zones on every panel
    pub const fn new(board: &'a Board, plot_constraints: bool) -> Self {
        Self {
            board,
            plot_constraints,
        }
    }

    /// Draw the full panel figure of a run
    pub fn render(&self, generation: &Generation) -> RgbaImage {
        let panel_width = OUTPUT_WIDTH / PANEL_COLUMNS;
        let panel_height = OUTPUT_HEIGHT / PANEL_ROWS;
        let mut figure = RgbaImage::from_pixel(OUTPUT_WIDTH, OUTPUT_HEIGHT, Rgba(BACKGROUND_COLOR));

        let envelope_bounds = self.board.envelope.bounding_rect();
        let point_bounds = generation
            .control_points
            .iter()
            .map(|&coord| Point::from(coord))
            .collect::<MultiPoint<f64>>()
            .bounding_rect();
        let Some(envelope_bounds) = envelope_bounds else {
            return figure;
        };
        let scatter_bounds = point_bounds.map_or(envelope_bounds, |points| {
            Rect::new(
                Coord {
                    x: points.min().x.min(envelope_bounds.min().x),
                    y: points.min().y.min(envelope_bounds.min().y),
                },
                Coord {
                    x: points.max().x.max(envelope_bounds.max().x),
                    y: points.max().y.max(envelope_bounds.max().y),
                },
            )
        });

        for (pass_index, pass) in generation.passes().into_iter().enumerate() {
            let top_row = 2 * pass_index as u32;

            for column in 0..PANEL_COLUMNS {
                for row_offset in 0..2 {
                    let bounds = if column == 0 && row_offset == 0 {
                        scatter_bounds
                    } else {
                        envelope_bounds
                    };
                    let frame = Frame::new(bounds, panel_width, panel_height);
                    let mut panel =
                        RgbaImage::from_pixel(panel_width, panel_height, Rgba(BACKGROUND_COLOR));

                    if row_offset == 0 {
                        Self::draw_structure(&mut panel, &frame, generation, pass, column);
                    } else if let Some(&strategy) = TilingStrategy::ALL.get(column as usize) {
                        for tile in pass.tiles(strategy) {
                            fill_polygon(&mut panel, &frame, &tile.polygon, tone(tile.color));
                        }
                    }

                    self.draw_overlays(&mut panel, &frame);

                    imageops::replace(
                        &mut figure,
                        &panel,
                        i64::from(column * panel_width),
                        i64::from((top_row + row_offset) * panel_height),
                    );
                }
            }
        }

        figure
    }

    fn draw_structure(
        panel: &mut RgbaImage,
        frame: &Frame,
        generation: &Generation,
        pass: &PartitionPass,
        column: u32,
    ) {
        let color = outline_color(pass.provenance);
        match column {
            0 => {
                for &point in &generation.control_points {
                    let (x, y) = frame.project(point);
                    draw_filled_circle_mut(
                        panel,
                        (x.round() as i32, y.round() as i32),
                        POINT_RADIUS,
                        Rgba(POINT_COLOR),
                    );
                }
            }
            1 => {
                for cell in &pass.cells {
                    outline_polygon(panel, frame, &cell.polygon, color);
                }
            }
            _ => {
                for rectangle in &pass.rectangles {
                    outline_polygon(panel, frame, &rectangle.to_polygon(), color);
                }
            }
        }
    }

    fn draw_overlays(&self, panel: &mut RgbaImage, frame: &Frame) {
        outline_polygon(panel, frame, &self.board.envelope, ENVELOPE_COLOR);

        if !self.plot_constraints {
            return;
        }

        for (zones, fill) in [
            (&self.board.white_zones, WHITE_ZONE_COLOR),
            (&self.board.black_zones, BLACK_ZONE_COLOR),
        ] {
            for zone in zones {
                fill_polygon(panel, frame, &zone.polygon, fill);
                outline_polygon(panel, frame, &zone.polygon, ENVELOPE_COLOR);
            }
        }
    }

    /// Render a run and save it under `directory` with its artifact name
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the image cannot be written
    pub fn export(&self, generation: &Generation, directory: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(directory).map_err(|source| GenerationError::FileSystem {
            path: directory.to_path_buf(),
            operation: "create directory",
            source,
        })?;
        let path = directory.join(artifact_name(&generation.config));

        self.render(generation)
            .save(&path)
            .map_err(|source| GenerationError::ImageExport {
                path: path.clone(),
                source,
            })?;

        log::debug!("Wrote {}", path.display());
        Ok(path)
    }
}
