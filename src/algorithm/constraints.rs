//! Color overrides from exclusion zones

use crate::spatial::shapes::{ExclusionZone, Tile};
use geo::Intersects;

/// Forces tile colors from two prioritized zone lists
///
/// The second-priority list is checked first and the first-priority list
/// last, so on conflict the first-priority zone's color is the one that
/// survives.
#[derive(Clone, Copy, Debug)]
pub struct ColorConstraintEnforcer<'a> {
    second_priority: &'a [ExclusionZone],
    first_priority: &'a [ExclusionZone],
}

impl<'a> ColorConstraintEnforcer<'a> {
    /// Enforcer over the two zone lists
    pub const fn new(second_priority: &'a [ExclusionZone], first_priority: &'a [ExclusionZone]) -> Self {
        Self {
            second_priority,
            first_priority,
        }
    }

    /// Override the tile's color where it touches a zone
    pub fn enforce(&self, tile: Tile) -> Tile {
        let mut color = tile.color;

        for zones in [self.second_priority, self.first_priority] {
            if let Some(zone) = zones
                .iter()
                .rev()
                .find(|zone| zone.polygon.intersects(&tile.polygon))
            {
                color = zone.color;
            }
        }

        Tile { color, ..tile }
    }

    /// Apply [`Self::enforce`] to every tile
    pub fn enforce_all(&self, tiles: Vec<Tile>) -> Vec<Tile> {
        tiles.into_iter().map(|tile| self.enforce(tile)).collect()
    }
}
