//! Scene renderer: a read-only projection of the world onto a `Surface`.
//!
//! Paint order: clear → visible tiles → NPCs (+ indicator) → player.
//! Screen position = world pixel − camera offset. Tiles whose origin falls
//! outside [−tile, viewport] on either axis are skipped; everything else is
//! clipped by the surface.

use crate::config::{CHARACTER_SIZE, TILE_SIZE};
use crate::domain::camera::Camera;
use crate::domain::entity::{manhattan, Npc, Player};
use crate::domain::grid::Grid;
use crate::domain::interaction::INTERACT_RANGE;
use crate::sim::world::WorldState;

use super::sprites::{self, draw_layers};
use super::surface::Surface;

const TS: i32 = TILE_SIZE as i32;

/// Character box offset inside its tile: centred horizontally, feet on the tile's bottom edge.
const CHAR_OFFSET_X: i32 = (TILE_SIZE - CHARACTER_SIZE) as i32 / 2;
const CHAR_OFFSET_Y: i32 = (TILE_SIZE - CHARACTER_SIZE) as i32;

pub fn render_world<S: Surface + ?Sized>(surface: &mut S, world: &WorldState) {
    render(surface, &world.grid, world.camera, &world.player, &world.npcs);
}

pub fn render<S: Surface + ?Sized>(surface: &mut S, grid: &Grid, camera: Camera, player: &Player, npcs: &[Npc]) {
    surface.clear();
    let (vw, vh) = (surface.width() as i32, surface.height() as i32);

    // ── Tiles ──
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let (sx, sy) = tile_screen_pos(camera, x, y);
            if !is_visible(sx, sy, vw, vh) {
                continue;
            }
            draw_layers(surface, sx, sy, sprites::tile_layers(grid.tile_at(x, y)));
        }
    }

    // ── NPCs ──
    for npc in npcs {
        let (sx, sy) = tile_screen_pos(camera, npc.x, npc.y);
        let (cx, cy) = (sx + CHAR_OFFSET_X, sy + CHAR_OFFSET_Y);
        draw_layers(surface, cx, cy, sprites::CHARACTER_SHADOW);
        draw_layers(surface, cx, cy, sprites::outfit_layers(npc.appearance));
        draw_layers(surface, cx, cy, sprites::NPC_FACE);

        if manhattan(player.pos(), npc.pos()) <= INTERACT_RANGE {
            draw_layers(surface, sx, sy, sprites::INTERACTION_INDICATOR);
        }
    }

    // ── Player (last, on top) ──
    let (sx, sy) = tile_screen_pos(camera, player.x, player.y);
    for part in sprites::player_layers(player.anim_frame) {
        draw_layers(surface, sx + CHAR_OFFSET_X, sy + CHAR_OFFSET_Y, part);
    }
}

#[inline]
fn tile_screen_pos(camera: Camera, x: usize, y: usize) -> (i32, i32) {
    camera.to_screen(x as i32 * TS, y as i32 * TS)
}

/// AABB cull for a tile whose top-left is at (sx, sy).
#[inline]
pub fn is_visible(sx: i32, sy: i32, view_w: i32, view_h: i32) -> bool {
    !(sx < -TS || sx > view_w || sy < -TS || sy > view_h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{AnimFrame, Appearance};
    use crate::domain::tile::TileType;
    use crate::ui::surface::{PixelBuffer, Rgba};

    const FUR: Rgba = Rgba::hex(0xff6b35);
    const PLATE: Rgba = Rgba::hex(0xffff00);

    /// Records every rectangle instead of rasterising.
    struct Recorder {
        w: u32,
        h: u32,
        rects: Vec<(i32, i32, i32, i32, Rgba)>,
        clears: usize,
    }

    impl Surface for Recorder {
        fn width(&self) -> u32 {
            self.w
        }

        fn height(&self) -> u32 {
            self.h
        }

        fn clear(&mut self) {
            self.clears += 1;
        }


        fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
            self.rects.push((x, y, w, h, color));
        }
    }

    fn grass(w: usize, h: usize) -> Grid {
        Grid::from_rows(vec![vec![TileType::Grass; w]; h])
    }

    fn npc(x: usize, y: usize) -> Npc {
        Npc { x, y, appearance: Appearance::Crowned, name: "Sage".into(), dialog: "hi".into() }
    }

    #[test]
    fn cull_bounds() {
        assert!(is_visible(0, 0, 768, 576));
        assert!(is_visible(-48, -48, 768, 576));
        assert!(is_visible(768, 576, 768, 576));
        assert!(!is_visible(-49, 0, 768, 576));
        assert!(!is_visible(0, 577, 768, 576));
    }

    #[test]
    fn offscreen_tiles_are_not_drawn() {
        let grid = grass(32, 24);
        let cam = Camera { x: 480, y: 240 };
        let mut rec = Recorder { w: 768, h: 576, rects: vec![], clears: 0 };
        render(&mut rec, &grid, cam, &Player::new(16, 12), &[]);

        assert_eq!(rec.clears, 1);
        let bases: Vec<_> = rec.rects.iter().filter(|r| r.2 == 48 && r.3 == 48).collect();
        assert!(bases.iter().all(|r| is_visible(r.0, r.1, 768, 576)));
        // Origins from -48..=768 horizontally: 17 or 18 columns, never the whole map.
        assert!(bases.len() < 32 * 24);
        assert!(bases.len() >= 16 * 12);
    }

    #[test]
    fn player_is_drawn_on_top() {
        let grid = grass(10, 10);
        let player = Player::new(2, 3);
        let mut buf = PixelBuffer::new(480, 480);
        render(&mut buf, &grid, Camera::default(), &player, &[]);
        // Tile (2,3) at (96,144); character box at (104,160); body at +16,+20.
        assert_eq!(buf.get(104 + 16, 160 + 20), FUR);
        assert_eq!(buf.get(0, 0), Rgba::hex(0x2a5a1a));
    }

    #[test]
    fn stride_frame_draws_paws() {
        let grid = grass(10, 10);
        let mut player = Player::new(2, 3);
        let paw = (104 + 5, 160 + 29);

        let mut idle = PixelBuffer::new(480, 480);
        render(&mut idle, &grid, Camera::default(), &player, &[]);
        assert_ne!(idle.get(paw.0, paw.1), Rgba::hex(0x000000));

        player.anim_frame = AnimFrame::Stride;
        let mut stride = PixelBuffer::new(480, 480);
        render(&mut stride, &grid, Camera::default(), &player, &[]);
        assert_eq!(stride.get(paw.0, paw.1), Rgba::hex(0x000000));
    }

    #[test]
    fn indicator_only_when_adjacent() {
        let grid = grass(10, 10);
        let npcs = [npc(5, 5)];
        // Indicator plate at tile (240,240) + (16,-8).
        let probe = (240 + 17, 240 - 7);

        let mut far = PixelBuffer::new(480, 480);
        render(&mut far, &grid, Camera::default(), &Player::new(3, 5), &npcs);
        assert_ne!(far.get(probe.0, probe.1), PLATE);

        let mut near = PixelBuffer::new(480, 480);
        render(&mut near, &grid, Camera::default(), &Player::new(4, 5), &npcs);
        assert_eq!(near.get(probe.0, probe.1), PLATE);
    }

    #[test]
    fn camera_shifts_the_scene() {
        let grid = grass(20, 20);
        let player = Player::new(10, 10);
        let mut buf = PixelBuffer::new(480, 480);
        render(&mut buf, &grid, Camera { x: 240, y: 240 }, &player, &[]);
        // Player tile at world (480,480) → screen (240,240).
        assert_eq!(buf.get(240 + 8 + 16, 240 + 16 + 20), FUR);
    }
}
