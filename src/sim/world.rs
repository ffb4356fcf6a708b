//! WorldState: everything the frame tick touches.
//!
//! ## Lifetime
//!
//!   - `grid` and `npcs` are built once at startup and never change.
//!   - `player`, `camera` and the two timers are mutated every running frame.
//!   - `dialog` toggles on interaction; while it is open the world is
//!     `Phase::Dialog` and every timer is frozen.
//!
//! ## Camera / Viewport
//!
//! The camera is recomputed from the player on every update, never stored
//! as independent state. Renderer maps `screen = world_px - camera`.

use std::time::Duration;

use log::info;

use crate::config::{DisplayConfig, GameConfig, TimingConfig, TILE_SIZE};
use crate::domain::camera::Camera;
use crate::domain::entity::{Npc, Player};
use crate::domain::grid::Grid;
use crate::domain::interaction::{self, InteractionState};
use crate::sim::content::Content;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Normal play: movement and animation advance.
    Running,
    /// A dialog is open: timers frozen, world still drawn behind the overlay.
    Dialog,
}

pub struct WorldState {
    // ── Static after construction ──
    pub grid: Grid,
    pub npcs: Vec<Npc>,
    pub seed: u64,

    // ── Per-frame ──
    pub player: Player,
    pub camera: Camera,
    pub dialog: InteractionState,

    // ── Timers (accumulate real elapsed time) ──
    pub move_timer: Duration,
    pub anim_timer: Duration,
    pub timing: TimingConfig,

    // ── Viewport in pixels ──
    pub view_w: u32,
    pub view_h: u32,

    pub tick: u64,
}

impl WorldState {
    /// Generate the map from `seed`, clear the content's cells, place everyone.
    pub fn new(config: &GameConfig, content: Content, seed: u64) -> Self {
        let mut grid = Grid::generate_seeded(config.world.width, config.world.height, seed);
        grid.clear(&content.clearings());
        info!(
            "generated {}x{} map (seed {seed}), {} NPCs",
            grid.width(), grid.height(), content.npcs.len(),
        );
        Self::with_grid(grid, content, config.timing.clone(), &config.display, seed)
    }

    /// Build around an existing grid (the caller owns clearing).
    pub fn with_grid(grid: Grid, content: Content, timing: TimingConfig, display: &DisplayConfig, seed: u64) -> Self {
        let (sx, sy) = content.spawn;
        let mut world = WorldState {
            grid,
            npcs: content.npcs,
            seed,
            player: Player::new(sx, sy),
            camera: Camera::default(),
            dialog: InteractionState::default(),
            move_timer: Duration::ZERO,
            anim_timer: Duration::ZERO,
            timing,
            view_w: display.viewport_width,
            view_h: display.viewport_height,
            tick: 0,
        };
        world.update_camera();
        world
    }

    pub fn phase(&self) -> Phase {
        if self.dialog.is_open() { Phase::Dialog } else { Phase::Running }
    }

    /// World size in pixels `(width, height)`.
    pub fn map_extent_px(&self) -> (i32, i32) {
        (
            (self.grid.width() as u32 * TILE_SIZE) as i32,
            (self.grid.height() as u32 * TILE_SIZE) as i32,
        )
    }

    pub fn update_camera(&mut self) {
        self.camera = Camera::compute(
            self.player.pos(),
            TILE_SIZE,
            self.map_extent_px(),
            (self.view_w as i32, self.view_h as i32),
        );
    }

    /// NPC within interaction range of the player, if any.
    pub fn nearby_npc(&self) -> Option<&Npc> {
        interaction::nearby_npc(self.player.pos(), &self.npcs).map(|i| &self.npcs[i])
    }

    /// Name of the NPC whose dialog is open.
    pub fn speaker_name(&self) -> Option<&str> {
        self.dialog.speaker().and_then(|i| self.npcs.get(i)).map(|n| n.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::TileType;

    #[test]
    fn new_world_places_player_on_grass() {
        let cfg = GameConfig::default();
        for seed in 0..16 {
            let w = WorldState::new(&cfg, Content::builtin().unwrap(), seed);
            assert_eq!(w.player.pos(), (8, 12));
            assert_eq!(w.grid.tile_at(8, 12), TileType::Grass);
            for npc in &w.npcs {
                assert_eq!(w.grid.tile_at(npc.x, npc.y), TileType::Grass);
            }
            assert_eq!(w.phase(), Phase::Running);
        }
    }

    #[test]
    fn camera_starts_on_player() {
        let w = WorldState::new(&GameConfig::default(), Content::builtin().unwrap(), 1);
        // (8, 12) → (384, 576) px; viewport 768x576 → (0, 288).
        assert_eq!(w.camera, Camera { x: 0, y: 288 });
        assert_eq!(w.map_extent_px(), (1536, 1152));
    }
}
