//! Board geometry queries.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::types::{Position, UnitId};

/// Read-only view of the battlefield.
pub trait BoardOracle: Send + Sync {
    fn dimensions(&self) -> BoardDimensions;

    /// Unit standing on `position`, if any.
    fn unit_at(&self, position: Position) -> Option<UnitId>;

    fn check_bounds(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardDimensions {
    pub width: u32,
    pub height: u32,
}

impl BoardDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        u32::try_from(position.x).is_ok_and(|x| x < self.width)
            && u32::try_from(position.y).is_ok_and(|y| y < self.height)
    }
}

/// Every tile whose Manhattan distance from `center` falls in `distances`.
///
/// Bounds are not checked; callers intersect with the board themselves.
/// Tiles whose coordinates would overflow `i32` are left out, and a radius
/// beyond `i32::MAX` yields no tiles.
pub fn manhattan_sphere(center: Position, distances: RangeInclusive<u32>) -> BTreeSet<Position> {
    let mut tiles = BTreeSet::new();
    let Ok(max) = i32::try_from(*distances.end()) else {
        tracing::warn!(radius = *distances.end(), "sphere radius out of range");
        return tiles;
    };
    for dx in -max..=max {
        let Some(x) = center.x.checked_add(dx) else {
            continue;
        };
        let span = max - dx.abs();
        for dy in -span..=span {
            let Some(y) = center.y.checked_add(dy) else {
                continue;
            };
            let tile = Position::new(x, y);
            if distances.contains(&tile.manhattan(center)) {
                tiles.insert(tile);
            }
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_of_radius_one_is_a_plus() {
        let tiles = manhattan_sphere(Position::new(2, 2), 0..=1);
        let expected: BTreeSet<_> = [(2, 2), (1, 2), (3, 2), (2, 1), (2, 3)]
            .into_iter()
            .map(|(x, y)| Position::new(x, y))
            .collect();
        assert_eq!(tiles, expected);
    }

    #[test]
    fn ring_excludes_inner_distances() {
        let tiles = manhattan_sphere(Position::ORIGIN, 2..=2);
        assert_eq!(tiles.len(), 8);
        assert!(tiles.iter().all(|tile| tile.manhattan(Position::ORIGIN) == 2));
    }

    #[test]
    fn bounds_reject_negative_and_overflowing_tiles() {
        let board = BoardDimensions::new(10, 10);
        assert!(board.contains(Position::new(9, 0)));
        assert!(!board.contains(Position::new(10, 0)));
        assert!(!board.contains(Position::new(-1, 3)));

        let huge = BoardDimensions::new(u32::MAX, 3);
        assert!(huge.contains(Position::new(i32::MAX, 2)));
        assert!(!huge.contains(Position::new(i32::MIN, 2)));
        assert!(!huge.contains(Position::new(0, 3)));
    }

    #[test]
    fn oversized_radius_is_empty() {
        assert!(manhattan_sphere(Position::ORIGIN, 0..=u32::MAX).is_empty());
    }

    #[test]
    fn sphere_at_the_edge_of_i32_skips_overflowing_tiles() {
        let tiles = manhattan_sphere(Position::new(i32::MAX, 0), 1..=1);
        let expected: BTreeSet<_> = [(i32::MAX - 1, 0), (i32::MAX, 1), (i32::MAX, -1)]
            .into_iter()
            .map(|(x, y)| Position::new(x, y))
            .collect();
        assert_eq!(tiles, expected);
        assert_eq!(
            Position::new(i32::MIN, 0).manhattan(Position::new(i32::MAX, 0)),
            u32::MAX
        );
    }
}
