//! Tile-pair conflict tables, built once per instance

use crate::tiling::Tile;
use itertools::iproduct;

/// Ordered tile pairs whose touching edges clash
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompatibilityTable {
    /// `(left, right)` pairs with `right-color(left) != left-color(right)`
    pub horizontal_conflicts: Vec<(usize, usize)>,
    /// `(up, down)` pairs with `bottom-color(up) != top-color(down)`
    pub vertical_conflicts: Vec<(usize, usize)>,
}

impl CompatibilityTable {
    /// Enumerate all T² ordered pairs in lexicographic order
    pub fn build(tiles: &[Tile]) -> Self {
        let n = tiles.len();

        let horizontal_conflicts = iproduct!(0..n, 0..n)
            .filter(|&(l, r)| !tiles[l].fits_left_of(&tiles[r]))
            .collect();
        let vertical_conflicts = iproduct!(0..n, 0..n)
            .filter(|&(u, d)| !tiles[u].fits_above(&tiles[d]))
            .collect();

        Self {
            horizontal_conflicts,
            vertical_conflicts,
        }
    }

    /// Number of ordered pairs that may sit side by side
    pub fn horizontal_compatible(&self, tile_count: usize) -> usize {
        tile_count * tile_count - self.horizontal_conflicts.len()
    }

    /// Number of ordered pairs that may be stacked
    pub fn vertical_compatible(&self, tile_count: usize) -> usize {
        tile_count * tile_count - self.vertical_conflicts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disjoint_tiles_conflict_everywhere() {
        let tiles = [Tile::new(1, 2, 3, 4), Tile::new(5, 6, 7, 8)];
        let table = CompatibilityTable::build(&tiles);

        assert_eq!(table.horizontal_conflicts, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(table.vertical_conflicts.len(), 4);
        assert_eq!(table.horizontal_compatible(2), 0);
    }

    #[test]
    fn test_self_matching_tile_has_no_conflicts() {
        let table = CompatibilityTable::build(&[Tile::new(1, 1, 1, 1)]);
        assert!(table.horizontal_conflicts.is_empty());
        assert!(table.vertical_conflicts.is_empty());
    }

    #[test]
    fn test_directional_conflicts() {
        // 0 fits left of 1 and above 1, nothing else matches
        let tiles = [Tile::new(9, 2, 3, 8), Tile::new(3, 7, 6, 2)];
        let table = CompatibilityTable::build(&tiles);

        assert_eq!(table.horizontal_conflicts, vec![(0, 0), (1, 0), (1, 1)]);
        assert_eq!(table.vertical_conflicts, vec![(0, 0), (1, 0), (1, 1)]);
        assert_eq!(table.vertical_compatible(2), 1);
    }
}
