//! Camera: the pixel offset of the viewport's top-left corner in world space.
//!
//! Always a pure function of player position, map extent and viewport size:
//!
//!   `offset = clamp(player_px - viewport / 2, 0, extent - viewport)`
//!
//! per axis. When the world is not larger than the viewport on an axis the
//! range collapses and the offset is pinned to 0.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
}

impl Camera {
    /// `player` is a grid cell; `map_px` and `view_px` are `(width, height)` in pixels.
    pub fn compute(player: (usize, usize), tile_size: u32, map_px: (i32, i32), view_px: (i32, i32)) -> Self {
        let px = player.0 as i32 * tile_size as i32;
        let py = player.1 as i32 * tile_size as i32;
        Camera {
            x: axis_offset(px, map_px.0, view_px.0),
            y: axis_offset(py, map_px.1, view_px.1),
        }
    }

    /// World pixel → screen pixel.
    #[inline]
    pub fn to_screen(&self, wx: i32, wy: i32) -> (i32, i32) {
        (wx - self.x, wy - self.y)
    }
}

fn axis_offset(player_px: i32, extent: i32, view: i32) -> i32 {
    let max = extent - view;
    if max <= 0 {
        return 0;
    }
    (player_px - view / 2).clamp(0, max)
}
