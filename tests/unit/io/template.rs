//! Tests for template loading, board normalisation and footprint placement

#[cfg(test)]
mod tests {
    use dazzle::GenerationError;
    use dazzle::io::configuration::{FOOTPRINT_LENGTH, FOOTPRINT_WIDTH};
    use dazzle::io::template::{Template, place_footprints};
    use dazzle::spatial::{Board, Color};
    use geo::{Area, BoundingRect, Contains, Intersects, LineString, Polygon};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::fs;

    fn square(x: f64, y: f64, side: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(x, y), (x + side, y), (x + side, y + side), (x, y + side)]),
            vec![],
        )
    }

    fn rectangle_ring(x: f64, y: f64, width: f64, height: f64) -> Vec<[f64; 2]> {
        vec![[x, y], [x + width, y], [x + width, y + height], [x, y + height]]
    }

    // Tests a template file is decoded with optional footprints
    #[test]
    fn test_load_template() {
        let directory = tempfile::tempdir().expect("Failed to create temp dir");
        let path = directory.path().join("board.json");
        fs::write(
            &path,
            r#"{"polygons": [[[0, 0], [100, 0], [100, 60], [0, 60]], [[10, 10], [20, 10], [20, 20]]]}"#,
        )
        .expect("Failed to write template");

        let template = Template::load(&path).expect("valid template");

        assert_eq!(template.polygons.len(), 2);
        assert!(template.footprints.is_empty());
        assert_eq!(template.polygons.first(), Some(&rectangle_ring(0.0, 0.0, 100.0, 60.0)));
    }

    // Tests unreadable and malformed files are reported separately
    #[test]
    fn test_load_template_errors() {
        let directory = tempfile::tempdir().expect("Failed to create temp dir");
        let malformed = directory.path().join("broken.json");
        fs::write(&malformed, "{\"polygons\": [[1, 2]]").expect("Failed to write template");

        assert!(matches!(
            Template::load(&directory.path().join("missing.json")),
            Err(GenerationError::FileSystem { .. })
        ));
        assert!(matches!(
            Template::load(&malformed),
            Err(GenerationError::TemplateLoad { .. })
        ));
    }

    // Tests the envelope lands at the origin and contours flip with it
    #[test]
    fn test_to_board_normalizes() {
        let template = Template {
            polygons: vec![
                rectangle_ring(0.0, 0.0, 100.0, 60.0),
                rectangle_ring(10.0, 10.0, 10.0, 10.0),
            ],
            footprints: vec![rectangle_ring(70.0, 5.0, 5.0, 5.0)],
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let board = template.to_board(&mut rng).expect("valid template");

        let bounds = board.envelope.bounding_rect().expect("envelope has vertices");
        assert!(bounds.min().x.abs() < 1e-9 && bounds.min().y.abs() < 1e-9);
        assert!((bounds.max().x - 100.0).abs() < 1e-9);
        assert!((bounds.max().y - 60.0).abs() < 1e-9);
        assert_eq!(board.zone_count(), 2);

        let contour = board
            .zones()
            .find(|zone| !zone.polygon.intersects(&square(70.0, 5.0, 5.0)))
            .expect("contour zone");
        let contour_bounds = contour.polygon.bounding_rect().expect("contour has vertices");
        assert!((contour_bounds.min().x - 10.0).abs() < 1e-9);
        assert!((contour_bounds.min().y - 40.0).abs() < 1e-9);
        assert!(
            board
                .white_zones
                .iter()
                .any(|zone| zone.polygon == square(70.0, 5.0, 5.0))
        );
    }

    // Tests contours are split into both colors by the generator
    #[test]
    fn test_to_board_splits_contours() {
        let mut polygons = vec![rectangle_ring(0.0, 0.0, 200.0, 200.0)];
        polygons.extend((0..40).map(|i| {
            let (column, row) = (f64::from(i % 8), f64::from(i / 8));
            rectangle_ring(column.mul_add(20.0, 5.0), row.mul_add(20.0, 5.0), 5.0, 5.0)
        }));
        let template = Template {
            polygons,
            footprints: Vec::new(),
        };

        let first = template
            .to_board(&mut ChaCha8Rng::seed_from_u64(2))
            .expect("valid template");
        let second = template
            .to_board(&mut ChaCha8Rng::seed_from_u64(2))
            .expect("valid template");

        assert_eq!(first, second);
        assert!(!first.white_zones.is_empty());
        assert!(!first.black_zones.is_empty());
        assert_eq!(first.zone_count(), 40);
    }

    // Tests unusable templates are rejected
    #[test]
    fn test_to_board_invalid_templates() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let empty = Template::default();
        let sliver = Template {
            polygons: vec![vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
            footprints: Vec::new(),
        };
        let overlapping = Template {
            polygons: vec![rectangle_ring(0.0, 0.0, 50.0, 50.0)],
            footprints: vec![
                rectangle_ring(10.0, 10.0, 5.0, 5.0),
                rectangle_ring(12.0, 12.0, 5.0, 5.0),
            ],
        };

        for template in [empty, sliver, overlapping] {
            assert!(matches!(
                template.to_board(&mut rng),
                Err(GenerationError::InvalidTemplate { .. })
            ));
        }
    }

    // Tests template footprints must sit inside the envelope and clear of contours
    #[test]
    fn test_to_board_rejects_misplaced_footprints() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let outside = Template {
            polygons: vec![rectangle_ring(0.0, 0.0, 50.0, 50.0)],
            footprints: vec![rectangle_ring(48.0, 48.0, 5.0, 5.0)],
        };
        // contour normalises to x 10..20, y 40..50
        let on_contour = Template {
            polygons: vec![
                rectangle_ring(0.0, 0.0, 100.0, 60.0),
                rectangle_ring(10.0, 10.0, 10.0, 10.0),
            ],
            footprints: vec![rectangle_ring(12.0, 42.0, 3.0, 3.0)],
        };

        assert!(matches!(
            outside.to_board(&mut rng),
            Err(GenerationError::InvalidTemplate { reason }) if reason.contains("envelope")
        ));
        assert!(matches!(
            on_contour.to_board(&mut rng),
            Err(GenerationError::InvalidTemplate { reason }) if reason.contains("contour 0")
        ));
    }

    // Tests placed footprints are white, inside and disjoint
    #[test]
    fn test_place_footprints() {
        let mut board = Board::new(square(0.0, 0.0, 200.0));
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        place_footprints(&mut board, 5, &mut rng).expect("room for five footprints");

        assert_eq!(board.white_zones.len(), 5);
        assert!(board.black_zones.is_empty());
        let expected_area = FOOTPRINT_LENGTH * FOOTPRINT_WIDTH;
        for (index, zone) in board.white_zones.iter().enumerate() {
            assert_eq!(zone.color, Color::White);
            assert!(board.envelope.contains(&zone.polygon));
            assert!((zone.polygon.unsigned_area() - expected_area).abs() < 1e-9);
            assert!(
                board
                    .white_zones
                    .iter()
                    .skip(index + 1)
                    .all(|other| !other.polygon.intersects(&zone.polygon))
            );
        }
    }

    // Tests an envelope too small for a footprint exhausts sampling
    #[test]
    fn test_place_footprints_exhausted() {
        let mut board = Board::new(square(0.0, 0.0, 10.0));
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let result = place_footprints(&mut board, 1, &mut rng);

        assert!(matches!(
            result,
            Err(GenerationError::SamplingExhausted { .. })
        ));
        assert_eq!(board.zone_count(), 0);
        assert!(place_footprints(&mut board, 0, &mut rng).is_ok());
    }
}
