//! Square tiles and the edge-matching rule

use serde::{Deserialize, Serialize};
use std::fmt;

/// A square tile with one color per edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Tile {
    pub fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self { top, right, bottom, left }
    }

    /// Whether `other` may sit directly to the right of this tile
    #[inline]
    pub fn fits_left_of(&self, other: &Tile) -> bool {
        self.right == other.left
    }

    /// Whether `other` may sit directly below this tile
    #[inline]
    pub fn fits_above(&self, other: &Tile) -> bool {
        self.bottom == other.top
    }

    /// Edge colors in `top right bottom left` order
    pub fn colors(&self) -> [u32; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    pub fn max_color(&self) -> u32 {
        self.colors().into_iter().max().unwrap_or(0)
    }
}

impl From<[u32; 4]> for Tile {
    fn from(colors: [u32; 4]) -> Self {
        let [top, right, bottom, left] = colors;
        Self { top, right, bottom, left }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_matching() {
        let a = Tile::new(1, 2, 3, 4);
        let b = Tile::new(3, 5, 6, 2);

        assert!(a.fits_left_of(&b));
        assert!(!b.fits_left_of(&a));
        assert!(a.fits_above(&b));
        assert!(!b.fits_above(&a));
    }

    #[test]
    fn test_self_matching_tile() {
        let tile = Tile::from([1, 1, 1, 1]);
        assert!(tile.fits_left_of(&tile));
        assert!(tile.fits_above(&tile));
        assert_eq!(tile.max_color(), 1);
    }

    #[test]
    fn test_display_uses_file_order() {
        assert_eq!(Tile::new(0, 1, 2, 3).to_string(), "0 1 2 3");
        assert_eq!(Tile::new(0, 1, 2, 3).colors(), [0, 1, 2, 3]);
    }
}
