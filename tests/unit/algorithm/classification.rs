//! Tests for exclusion zone hosting and strict containment

#[cfg(test)]
mod tests {
    use dazzle::GenerationError;
    use dazzle::algorithm::classification::{classify, strictly_contains};
    use dazzle::spatial::{Cell, Color, ExclusionZone, Provenance};
    use geo::{LineString, Polygon};

    fn square(x: f64, y: f64, side: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(x, y), (x + side, y), (x + side, y + side), (x, y + side)]),
            vec![],
        )
    }

    fn cell(polygon: Polygon<f64>) -> Cell {
        Cell {
            polygon,
            provenance: Provenance::Delaunay,
        }
    }

    // Tests interior zones are strict and boundary-touching zones are not
    #[test]
    fn test_strictly_contains() {
        let outer = square(0.0, 0.0, 10.0);

        assert!(strictly_contains(&outer, &square(2.0, 2.0, 2.0)));
        assert!(!strictly_contains(&outer, &square(0.0, 2.0, 2.0)));
        assert!(!strictly_contains(&outer, &square(9.0, 9.0, 2.0)));
        assert!(!strictly_contains(&outer, &outer));
    }

    // Tests zones are mapped to the cell that hosts them
    #[test]
    fn test_classify_hosts_zones() {
        let cells = vec![cell(square(0.0, 0.0, 10.0)), cell(square(10.0, 0.0, 10.0))];
        let zones = vec![
            ExclusionZone::new(square(12.0, 2.0, 1.0), Color::White),
            ExclusionZone::new(square(2.0, 2.0, 1.0), Color::Black),
            ExclusionZone::new(square(5.0, 5.0, 1.0), Color::White),
        ];

        let classification = classify(&cells, &zones).expect("zones are interior");

        assert_eq!(classification.provenance(), Provenance::Delaunay);
        assert_eq!(classification.zones_in(0), &[1, 2]);
        assert_eq!(classification.zones_in(1), &[0]);
        assert!(classification.zones_in(7).is_empty());
        assert_eq!(classification.host_of(0), Some(1));
        assert_eq!(classification.hosting_cell_count(), 2);
        assert!(classification.unhosted_zones().is_empty());
    }

    // Tests a zone straddling a seam is reported as unhosted
    #[test]
    fn test_classify_straddling_zone_unhosted() {
        let cells = vec![cell(square(0.0, 0.0, 10.0)), cell(square(10.0, 0.0, 10.0))];
        let zones = vec![
            ExclusionZone::new(square(2.0, 2.0, 1.0), Color::White),
            ExclusionZone::new(square(9.0, 4.0, 2.0), Color::Black),
        ];

        let classification = classify(&cells, &zones).expect("straddling is not a violation");

        assert_eq!(classification.unhosted_zones(), vec![1]);
        assert_eq!(classification.host_of(1), None);
        assert_eq!(classification.hosting_cell_count(), 1);
    }

    // Tests a contained zone touching the cell boundary is rejected
    #[test]
    fn test_classify_boundary_zone_violation() {
        let cells = vec![cell(square(0.0, 0.0, 10.0))];
        let zones = vec![ExclusionZone::new(square(0.0, 3.0, 2.0), Color::White)];

        let result = classify(&cells, &zones);

        assert!(matches!(
            result,
            Err(GenerationError::ContainmentViolation {
                partition: "delaunay",
                cell: 0,
                zone: 0,
            })
        ));
    }

    // Tests classification without cells or zones
    #[test]
    fn test_classify_empty_inputs() {
        let empty = classify(&[], &[]).expect("nothing to classify");
        assert_eq!(empty.provenance(), Provenance::Voronoi);
        assert_eq!(empty.hosting_cell_count(), 0);

        let zones = vec![ExclusionZone::new(square(1.0, 1.0, 1.0), Color::Black)];
        let unhosted = classify(&[], &zones).expect("no cells");
        assert_eq!(unhosted.unhosted_zones(), vec![0]);
    }
}
