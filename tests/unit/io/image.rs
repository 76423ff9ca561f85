//! Tests for figure naming, rendering and PNG export

#[cfg(test)]
mod tests {
    use dazzle::GenerationError;
    use dazzle::algorithm::executor::{Generation, GenerationConfig, generate};
    use dazzle::io::configuration::{
        BACKGROUND_COLOR, BLACK, OUTPUT_HEIGHT, OUTPUT_WIDTH, PANEL_COLUMNS, PANEL_ROWS, WHITE,
    };
    use dazzle::io::image::{FigureRenderer, artifact_name};
    use dazzle::spatial::{Board, Color, ExclusionZone};
    use geo::{LineString, Polygon};
    use std::fs;

    fn square(x: f64, y: f64, side: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(x, y), (x + side, y), (x + side, y + side), (x, y + side)]),
            vec![],
        )
    }

    fn config() -> GenerationConfig {
        GenerationConfig {
            seed: 31,
            num_clusters: 2,
            num_points: 25,
            cluster_on_zone_centroids: true,
            cluster_on_envelope: false,
            constrain_points_to_envelope: true,
        }
    }

    fn board() -> Board {
        let mut board = Board::new(Polygon::new(
            LineString::from(vec![(0.0, 0.0), (100.0, 0.0), (100.0, 60.0), (0.0, 60.0)]),
            vec![],
        ));
        board.push_zone(ExclusionZone::new(square(20.0, 20.0, 2.0), Color::White));
        board
    }

    fn generation(board: &Board) -> Generation {
        (0..32)
            .find_map(|offset| {
                generate(
                    &GenerationConfig {
                        seed: config().seed + offset,
                        ..config()
                    },
                    board,
                )
                .ok()
            })
            .expect("some seed avoids a containment violation")
    }

    // Tests artifact names encode every run parameter
    #[test]
    fn test_artifact_name() {
        assert_eq!(artifact_name(&config()), "2_25_led_noenvelope_31.png");

        let other = GenerationConfig {
            cluster_on_zone_centroids: false,
            cluster_on_envelope: true,
            seed: 4_000_000_000,
            ..config()
        };
        assert_eq!(artifact_name(&other), "2_25_noled_envelope_4000000000.png");
    }

    // Tests the figure size, background and tiled envelope interior
    #[test]
    fn test_render_figure() {
        let board = board();
        let figure = FigureRenderer::new(&board, true).render(&generation(&board));

        assert_eq!(figure.dimensions(), (OUTPUT_WIDTH, OUTPUT_HEIGHT));
        assert_eq!(figure.get_pixel(0, 0).0, BACKGROUND_COLOR);

        // Center of the solid tiling panel of the Voronoi pass
        let panel_width = OUTPUT_WIDTH / PANEL_COLUMNS;
        let panel_height = OUTPUT_HEIGHT / PANEL_ROWS;
        let center = figure
            .get_pixel(2 * panel_width + panel_width / 2, panel_height + panel_height / 2)
            .0;
        assert!(center == BLACK || center == WHITE);
    }

    // Tests export creates the directory and names the file
    #[test]
    fn test_export_writes_png() {
        let directory = tempfile::tempdir().expect("Failed to create temp dir");
        let target = directory.path().join("nested").join("figures");
        let board = board();
        let generation = generation(&board);

        let path = FigureRenderer::new(&board, false)
            .export(&generation, &target)
            .expect("export succeeds");

        assert_eq!(path, target.join(artifact_name(&generation.config)));
        let decoded = image::open(&path).expect("written file is an image");
        assert_eq!(decoded.width(), OUTPUT_WIDTH);
        assert_eq!(decoded.height(), OUTPUT_HEIGHT);
    }

    // Tests a file in place of the output directory is reported
    #[test]
    fn test_export_directory_error() {
        let directory = tempfile::tempdir().expect("Failed to create temp dir");
        let blocker = directory.path().join("blocker");
        fs::write(&blocker, b"not a directory").expect("Failed to write blocker");
        let board = board();
        let generation = generation(&board);

        let result = FigureRenderer::new(&board, false).export(&generation, &blocker);

        assert!(matches!(
            result,
            Err(GenerationError::FileSystem {
                operation: "create directory",
                ..
            })
        ));
    }
}
