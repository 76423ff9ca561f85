//! Tests for zone color enforcement on tiles

#[cfg(test)]
mod tests {
    use dazzle::algorithm::constraints::ColorConstraintEnforcer;
    use dazzle::spatial::{Color, ExclusionZone, Tile};
    use geo::{LineString, Polygon};

    fn square(x: f64, y: f64, side: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(x, y), (x + side, y), (x + side, y + side), (x, y + side)]),
            vec![],
        )
    }

    fn tile(x: f64, y: f64, color: Color) -> Tile {
        Tile {
            polygon: square(x, y, 2.0),
            color,
        }
    }

    // Tests tiles away from every zone keep their color
    #[test]
    fn test_untouched_tile_keeps_color() {
        let black = vec![ExclusionZone::new(square(10.0, 10.0, 1.0), Color::Black)];
        let white = vec![ExclusionZone::new(square(20.0, 20.0, 1.0), Color::White)];
        let enforcer = ColorConstraintEnforcer::new(&black, &white);

        assert_eq!(enforcer.enforce(tile(0.0, 0.0, Color::White)).color, Color::White);
        assert_eq!(enforcer.enforce(tile(0.0, 0.0, Color::Black)).color, Color::Black);
    }

    // Tests overlapping zones force their color
    #[test]
    fn test_zone_forces_color() {
        let black = vec![ExclusionZone::new(square(1.0, 1.0, 1.0), Color::Black)];
        let white = vec![ExclusionZone::new(square(11.0, 1.0, 1.0), Color::White)];
        let enforcer = ColorConstraintEnforcer::new(&black, &white);

        let tiles = enforcer.enforce_all(vec![
            tile(0.0, 0.0, Color::White),
            tile(10.0, 0.0, Color::Black),
        ]);

        let colors: Vec<Color> = tiles.iter().map(|tile| tile.color).collect();
        assert_eq!(colors, vec![Color::Black, Color::White]);
    }

    // Tests first-priority zones win over second-priority ones
    #[test]
    fn test_first_priority_wins() {
        let black = vec![ExclusionZone::new(square(0.5, 0.5, 1.0), Color::Black)];
        let white = vec![ExclusionZone::new(square(1.0, 1.0, 2.0), Color::White)];
        let enforcer = ColorConstraintEnforcer::new(&black, &white);

        assert_eq!(enforcer.enforce(tile(0.0, 0.0, Color::Black)).color, Color::White);

        let reversed = ColorConstraintEnforcer::new(&white, &black);
        assert_eq!(reversed.enforce(tile(0.0, 0.0, Color::White)).color, Color::Black);
    }

    // Tests the last intersecting zone of a list decides within that list
    #[test]
    fn test_last_zone_in_list_wins() {
        let mixed = vec![
            ExclusionZone::new(square(0.0, 0.0, 1.0), Color::White),
            ExclusionZone::new(square(1.0, 1.0, 1.0), Color::Black),
        ];
        let enforcer = ColorConstraintEnforcer::new(&mixed, &[]);

        let enforced = enforcer.enforce(tile(0.0, 0.0, Color::White));

        assert_eq!(enforced.color, Color::Black);
        assert_eq!(enforced.polygon, square(0.0, 0.0, 2.0));
    }
}
