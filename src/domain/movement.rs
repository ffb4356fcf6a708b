//! Collision & movement resolver: a pure function, no side effects.
//!
//! Encodes "is this step legal" without performing it.
//!
//! ## Step truth table
//! ┌───────────────────────────┬─────────┐
//! │ Condition (in order)       │ Result  │
//! ├───────────────────────────┼─────────┤
//! │ Candidate off the grid     │ DENY    │
//! │ Candidate tile solid       │ DENY    │ water, tree
//! │ NPC stands on candidate    │ DENY    │ scanned live, not cached
//! │ Otherwise                  │ ALLOW   │ grass, stone
//! └───────────────────────────┴─────────┘
//!
//! Facing is not handled here: the caller re-orients the player on every
//! attempt, accepted or not.

use super::entity::{Direction, Npc};
use super::grid::Grid;
use super::tile::TileType;

/// Why a step was refused.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Blocker {
    Edge,
    Tile(TileType),
    /// Index into the NPC list.
    Npc(usize),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    Moved { x: usize, y: usize },
    Blocked(Blocker),
}

/// Try one grid step from `from` towards `dir`.
pub fn try_move(grid: &Grid, npcs: &[Npc], from: (usize, usize), dir: Direction) -> MoveOutcome {
    let (dx, dy) = dir.delta();
    let (Some(x), Some(y)) = (from.0.checked_add_signed(dx), from.1.checked_add_signed(dy)) else {
        return MoveOutcome::Blocked(Blocker::Edge);
    };
    let Some(tile) = grid.get(x, y) else {
        return MoveOutcome::Blocked(Blocker::Edge);
    };
    if tile.is_solid() {
        return MoveOutcome::Blocked(Blocker::Tile(tile));
    }

    if let Some(i) = npcs.iter().position(|n| n.x == x && n.y == y) {
        return MoveOutcome::Blocked(Blocker::Npc(i));
    }

    MoveOutcome::Moved { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Appearance;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Helper: build a Grid from a string diagram.
    /// Legend:  '~'=Water  'T'=Tree  'o'=Stone  anything else=Grass
    fn grid_from(rows: &[&str]) -> Grid {
        let tiles = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|ch| match ch {
                        '~' => TileType::Water,
                        'T' => TileType::Tree,
                        'o' => TileType::Stone,
                        _ => TileType::Grass,
                    })
                    .collect()
            })
            .collect();
        Grid::from_rows(tiles)
    }

    fn npc_at(x: usize, y: usize) -> Npc {
        Npc {
            x,
            y,
            appearance: Appearance::Robed,
            name: "Keeper".into(),
            dialog: "hello".into(),
        }
    }

    #[test]
    fn step_onto_grass_and_stone() {
        let g = grid_from(&[
            "~~~~~",
            "~ o ~",
            "~~~~~",
        ]);
        assert_eq!(try_move(&g, &[], (1, 1), Direction::Right), MoveOutcome::Moved { x: 2, y: 1 });
        assert_eq!(try_move(&g, &[], (3, 1), Direction::Left), MoveOutcome::Moved { x: 2, y: 1 });
    }

    #[test]
    fn water_and_trees_block() {
        let g = grid_from(&[
            "~~~~~",
            "~ T ~",
            "~~~~~",
        ]);
        assert_eq!(
            try_move(&g, &[], (1, 1), Direction::Right),
            MoveOutcome::Blocked(Blocker::Tile(TileType::Tree))
        );
        assert_eq!(
            try_move(&g, &[], (1, 1), Direction::Up),
            MoveOutcome::Blocked(Blocker::Tile(TileType::Water))
        );
    }

    #[test]
    fn grid_edge_blocks() {
        // Walkable edge: only the bounds check stops the step.
        let g = grid_from(&[
            "   ",
            "   ",
        ]);
        assert_eq!(try_move(&g, &[], (0, 0), Direction::Left), MoveOutcome::Blocked(Blocker::Edge));
        assert_eq!(try_move(&g, &[], (0, 0), Direction::Up), MoveOutcome::Blocked(Blocker::Edge));
        assert_eq!(try_move(&g, &[], (2, 1), Direction::Right), MoveOutcome::Blocked(Blocker::Edge));
        assert_eq!(try_move(&g, &[], (2, 1), Direction::Down), MoveOutcome::Blocked(Blocker::Edge));
    }

    #[test]
    fn npc_blocks() {
        let g = grid_from(&[
            "~~~~~",
            "~   ~",
            "~~~~~",
        ]);
        let npcs = vec![npc_at(3, 3), npc_at(2, 1)];
        assert_eq!(try_move(&g, &npcs, (1, 1), Direction::Right), MoveOutcome::Blocked(Blocker::Npc(1)));
    }

    #[test]
    fn never_lands_on_illegal_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        for seed in 0..16 {
            let g = Grid::generate_seeded(16, 12, seed);
            let npcs = vec![npc_at(4, 4), npc_at(8, 6), npc_at(12, 9)];
            for _ in 0..200 {
                let from = (rng.gen_range(0..16), rng.gen_range(0..12));
                let dir = match rng.gen_range(0..4) {
                    0 => Direction::Up,
                    1 => Direction::Down,
                    2 => Direction::Left,
                    _ => Direction::Right,
                };
                if let MoveOutcome::Moved { x, y } = try_move(&g, &npcs, from, dir) {
                    assert!(g.in_bounds(x, y));
                    assert!(!g.tile_at(x, y).is_solid());
                    assert!(!npcs.iter().any(|n| n.pos() == (x, y)));
                    assert_eq!(crate::domain::entity::manhattan(from, (x, y)), 1);
                }
            }
        }
    }
}
