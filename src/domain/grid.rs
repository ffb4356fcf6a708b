//! Grid map: a fixed-size 2D array of tile types.
//!
//! ## Generation
//!
//!   - Border cells are always `Water`.
//!   - Interior cells roll `Tree` first (10%), then `Stone` (5%) only if the
//!     tree roll failed; everything else is `Grass`.
//!   - `clear()` then forces the listed clearings back to `Grass`.
//!
//! The grid is immutable once the world is built; bounds-checking belongs
//! to the movement resolver, `tile_at` just answers `Water` off the map.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::tile::TileType;

pub const TREE_CHANCE: f64 = 0.10;
pub const STONE_CHANCE: f64 = 0.05;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Vec<TileType>>,
}

impl Grid {
    /// Generate a fresh map using the given random source.
    pub fn generate<R: Rng>(width: usize, height: usize, rng: &mut R) -> Self {
        let mut tiles = vec![vec![TileType::Grass; width]; height];
        for (y, row) in tiles.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = if is_border(x, y, width, height) {
                    TileType::Water
                } else if rng.gen_bool(TREE_CHANCE) {
                    TileType::Tree
                } else if rng.gen_bool(STONE_CHANCE) {
                    TileType::Stone
                } else {
                    TileType::Grass
                };
            }
        }
        Grid { width, height, tiles }
    }

    /// Deterministic generation from a seed.
    pub fn generate_seeded(width: usize, height: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(width, height, &mut rng)
    }

    /// Build a grid from explicit rows (all rows must share a width).
    #[cfg(test)]
    pub fn from_rows(tiles: Vec<Vec<TileType>>) -> Self {
        let height = tiles.len();
        let width = tiles.first().map_or(0, Vec::len);
        Grid { width, height, tiles }
    }

    /// Force the listed `(row, col)` cells to `Grass`.
    /// Out-of-range and border cells are skipped, so the water border survives.
    pub fn clear(&mut self, coords: &[(usize, usize)]) {
        for &(row, col) in coords {
            if row < self.height && col < self.width && !is_border(col, row, self.width, self.height) {
                self.tiles[row][col] = TileType::Grass;
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Tile at (x, y). Out of bounds reads as `Water` (solid).
    #[inline]
    pub fn tile_at(&self, x: usize, y: usize) -> TileType {
        if self.in_bounds(x, y) {
            self.tiles[y][x]
        } else {
            TileType::Water
        }
    }

    /// Tile at (x, y), or `None` off the map.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<TileType> {
        self.tiles.get(y).and_then(|row| row.get(x)).copied()
    }
}

fn is_border(x: usize, y: usize, width: usize, height: usize) -> bool {
    x == 0 || y == 0 || x + 1 == width || y + 1 == height
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEARINGS: &[(usize, usize)] = &[(12, 8), (10, 15), (15, 10), (8, 20), (18, 25)];

    #[test]
    fn border_is_always_water() {
        for seed in 0..32 {
            let g = Grid::generate_seeded(32, 24, seed);
            for x in 0..32 {
                assert_eq!(g.tile_at(x, 0), TileType::Water);
                assert_eq!(g.tile_at(x, 23), TileType::Water);
            }
            for y in 0..24 {
                assert_eq!(g.tile_at(0, y), TileType::Water);
                assert_eq!(g.tile_at(31, y), TileType::Water);
            }
        }
    }

    #[test]
    fn interior_never_water() {
        let g = Grid::generate_seeded(32, 24, 7);
        for y in 1..23 {
            for x in 1..31 {
                assert_ne!(g.tile_at(x, y), TileType::Water, "interior water at ({x}, {y})");
            }
        }
    }

    #[test]
    fn clearings_are_grass_for_any_seed() {
        for seed in 0..64 {
            let mut g = Grid::generate_seeded(32, 24, seed);
            g.clear(CLEARINGS);
            for &(row, col) in CLEARINGS {
                assert_eq!(g.tile_at(col, row), TileType::Grass, "seed {seed}: ({row}, {col})");
            }
        }
    }

    #[test]
    fn clear_skips_border_and_out_of_range() {
        let mut g = Grid::generate_seeded(10, 8, 1);
        g.clear(&[(0, 3), (7, 9), (50, 50)]);
        assert_eq!(g.tile_at(3, 0), TileType::Water);
        assert_eq!(g.tile_at(9, 7), TileType::Water);
    }

    #[test]
    fn same_seed_same_map() {
        assert_eq!(Grid::generate_seeded(32, 24, 99), Grid::generate_seeded(32, 24, 99));
    }

    #[test]
    fn interior_mix_is_roughly_as_configured() {
        // 200x200 interior cells: expect ~10% trees and ~4.5% stone.
        let g = Grid::generate_seeded(202, 202, 3);
        let mut trees = 0;
        let mut stones = 0;
        for y in 1..201 {
            for x in 1..201 {
                match g.tile_at(x, y) {
                    TileType::Tree => trees += 1,
                    TileType::Stone => stones += 1,
                    _ => {}
                }
            }
        }
        let total = 200.0 * 200.0;
        let tree_ratio = trees as f64 / total;
        let stone_ratio = stones as f64 / total;
        assert!((0.08..0.12).contains(&tree_ratio), "tree ratio {tree_ratio}");
        assert!((0.03..0.06).contains(&stone_ratio), "stone ratio {stone_ratio}");
    }

    #[test]
    fn out_of_bounds_reads_as_water() {
        let g = Grid::generate_seeded(5, 5, 0);
        assert_eq!(g.tile_at(5, 2), TileType::Water);
        assert_eq!(g.tile_at(2, 99), TileType::Water);
        assert_eq!(g.get(5, 2), None);
        assert!(g.get(2, 2).is_some());
    }
}
