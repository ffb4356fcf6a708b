//! Sprite and tile artwork as data: ordered lists of flat-colour rectangles.
//!
//! Every glyph is a static `&[Layer]`, painted in order by one generic
//! routine. Tile layers are in tile space (48×48). Character layers are in
//! character space (32×32), which the renderer anchors bottom-centre in the
//! tile. Nothing here varies per instance.

use crate::domain::entity::{AnimFrame, Appearance};
use crate::domain::tile::TileType;

use super::surface::{Rgba, Surface};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Layer {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub color: Rgba,
}

const fn l(x: i32, y: i32, w: i32, h: i32, color: Rgba) -> Layer {
    Layer { x, y, w, h, color }
}

/// Paint `layers` with their origin at (x, y).
pub fn draw_layers<S: Surface + ?Sized>(surface: &mut S, x: i32, y: i32, layers: &[Layer]) {
    for layer in layers {
        surface.fill_rect(x + layer.x, y + layer.y, layer.w, layer.h, layer.color);
    }
}

// ── Palette ──

const BLACK: Rgba = Rgba::hex(0x000000);
const WHITE: Rgba = Rgba::hex(0xffffff);
const SHADOW: Rgba = Rgba::hex(0x000000).with_alpha(77);

const GRASS_BASE: Rgba = Rgba::hex(0x2a5a1a);
const GRASS_LAYER: Rgba = Rgba::hex(0x3a6b2a);
const GRASS_TEXTURE: Rgba = Rgba::hex(0x4a7c3a);
const GRASS_BLADE: Rgba = Rgba::hex(0x5a8c4a);

const STONE_BASE: Rgba = Rgba::hex(0x3a3a3a);
const STONE_BODY: Rgba = Rgba::hex(0x4a4a4a);
const STONE_HIGHLIGHT: Rgba = Rgba::hex(0x6a6a6a);
const STONE_DETAIL: Rgba = Rgba::hex(0x8a8a8a);
const STONE_SHADOW: Rgba = Rgba::hex(0x2a2a2a);

const WATER_DEEP: Rgba = Rgba::hex(0x0a3a7a);
const WATER_LAYER: Rgba = Rgba::hex(0x1a4a8a);
const WATER_SURFACE: Rgba = Rgba::hex(0x2a5a9a);
const WATER_HIGHLIGHT: Rgba = Rgba::hex(0x3a6aaa);
const WATER_SPARKLE: Rgba = Rgba::hex(0x4a7aba);

const TRUNK: Rgba = Rgba::hex(0x5b3a1a);
const TRUNK_HIGHLIGHT: Rgba = Rgba::hex(0x7b4a2a);
const TRUNK_TEXTURE: Rgba = Rgba::hex(0x6b4423);
const CROWN: Rgba = Rgba::hex(0x1a6b1a);
const CROWN_HIGHLIGHT: Rgba = Rgba::hex(0x228b22);
const CROWN_DETAIL: Rgba = Rgba::hex(0x32ab32);
const CROWN_SHADOW: Rgba = Rgba::hex(0x0a5a0a);

const FUR: Rgba = Rgba::hex(0xff6b35);
const FUR_LIGHT: Rgba = Rgba::hex(0xff8b55);
const SKIN: Rgba = Rgba::hex(0xfdbcb4);

const INDICATOR_PLATE: Rgba = Rgba::hex(0xffff00);

// ══════════════════════════════════════════════════════════════
// Tiles (48×48)
// ══════════════════════════════════════════════════════════════

const GRASS: &[Layer] = &[
    l(0, 0, 48, 48, GRASS_BASE),
    l(6, 6, 12, 12, GRASS_LAYER),
    l(30, 24, 9, 9, GRASS_LAYER),
    l(12, 36, 6, 6, GRASS_LAYER),
    l(8, 8, 8, 8, GRASS_TEXTURE),
    l(32, 26, 6, 6, GRASS_TEXTURE),
    l(20, 16, 4, 8, GRASS_TEXTURE),
    l(10, 10, 2, 8, GRASS_BLADE),
    l(34, 28, 2, 6, GRASS_BLADE),
    l(24, 20, 2, 6, GRASS_BLADE),
    l(15, 38, 2, 4, GRASS_BLADE),
    l(6, 24, 2, 6, GRASS_BLADE),
    l(40, 12, 2, 4, GRASS_BLADE),
];

const STONE: &[Layer] = &[
    l(0, 0, 48, 48, STONE_BASE),
    l(3, 3, 42, 42, STONE_BODY),
    l(6, 6, 36, 12, STONE_HIGHLIGHT),
    l(6, 24, 18, 6, STONE_HIGHLIGHT),
    l(30, 30, 12, 12, STONE_HIGHLIGHT),
    l(8, 8, 32, 8, STONE_DETAIL),
    l(8, 26, 14, 4, STONE_DETAIL),
    l(32, 32, 8, 8, STONE_DETAIL),
    l(42, 6, 6, 42, STONE_SHADOW),
    l(6, 42, 36, 6, STONE_SHADOW),
];

const WATER: &[Layer] = &[
    l(0, 0, 48, 48, WATER_DEEP),
    l(3, 3, 42, 42, WATER_LAYER),
    l(6, 6, 36, 36, WATER_SURFACE),
    l(8, 8, 18, 6, WATER_HIGHLIGHT),
    l(24, 24, 12, 6, WATER_HIGHLIGHT),
    l(12, 36, 9, 4, WATER_HIGHLIGHT),
    l(10, 10, 3, 3, WATER_SPARKLE),
    l(26, 26, 3, 3, WATER_SPARKLE),
    l(36, 12, 3, 3, WATER_SPARKLE),
    l(14, 38, 2, 2, WATER_SPARKLE),
];

const TREE: &[Layer] = &[
    l(0, 0, 48, 48, GRASS_BASE),
    l(18, 30, 12, 18, TRUNK),
    l(20, 32, 8, 14, TRUNK_HIGHLIGHT),
    l(21, 34, 2, 10, TRUNK_TEXTURE),
    l(25, 36, 2, 8, TRUNK_TEXTURE),
    l(6, 6, 36, 30, CROWN),
    l(9, 9, 30, 6, CROWN_HIGHLIGHT),
    l(12, 18, 24, 6, CROWN_HIGHLIGHT),
    l(15, 27, 18, 6, CROWN_HIGHLIGHT),
    l(12, 12, 6, 18, CROWN_DETAIL),
    l(30, 15, 6, 12, CROWN_DETAIL),
    l(21, 21, 6, 9, CROWN_DETAIL),
    l(30, 12, 9, 21, CROWN_SHADOW),
    l(12, 30, 24, 6, CROWN_SHADOW),
];

pub fn tile_layers(tile: TileType) -> &'static [Layer] {
    match tile {
        TileType::Grass => GRASS,
        TileType::Stone => STONE,
        TileType::Water => WATER,
        TileType::Tree => TREE,
    }
}

// ══════════════════════════════════════════════════════════════
// Characters (32×32)
// ══════════════════════════════════════════════════════════════

pub const CHARACTER_SHADOW: &[Layer] = &[l(4, 30, 24, 3, SHADOW)];

/// Cat: body, head, ears and face.
const PLAYER_BODY: &[Layer] = &[
    l(8, 12, 16, 16, FUR),
    l(10, 14, 12, 4, FUR_LIGHT),
    l(10, 4, 12, 12, FUR),
    l(12, 6, 8, 4, FUR_LIGHT),
    l(8, 2, 4, 6, FUR),
    l(20, 2, 4, 6, FUR),
    l(9, 3, 2, 3, FUR_LIGHT),
    l(21, 3, 2, 3, FUR_LIGHT),
    // eyes, shine, nose
    l(12, 8, 2, 2, BLACK),
    l(18, 8, 2, 2, BLACK),
    l(13, 8, 1, 1, WHITE),
    l(19, 8, 1, 1, WHITE),
    l(15, 11, 2, 1, BLACK),
];

const PLAYER_TAIL_IDLE: &[Layer] = &[
    l(24, 16, 4, 8, FUR),
    l(25, 17, 2, 6, FUR_LIGHT),
];

const PLAYER_TAIL_STRIDE: &[Layer] = &[
    l(26, 16, 4, 8, FUR),
    l(27, 17, 2, 6, FUR_LIGHT),
];

const PLAYER_PAWS: &[Layer] = &[
    l(4, 28, 4, 4, FUR),
    l(24, 28, 4, 4, FUR),
    l(5, 29, 2, 2, BLACK),
    l(25, 29, 2, 2, BLACK),
];

/// Player glyph for an animation frame, in paint order.
pub fn player_layers(frame: AnimFrame) -> [&'static [Layer]; 4] {
    match frame {
        AnimFrame::Idle => [CHARACTER_SHADOW, PLAYER_BODY, PLAYER_TAIL_IDLE, &[]],
        AnimFrame::Stride => [CHARACTER_SHADOW, PLAYER_BODY, PLAYER_TAIL_STRIDE, PLAYER_PAWS],
    }
}

const ROBED_BLUE: &[Layer] = &[
    l(8, 8, 16, 20, Rgba::hex(0x2a4a9a)),
    l(10, 10, 12, 16, Rgba::hex(0x4169e1)),
    // pointed hat
    l(12, 0, 8, 6, Rgba::hex(0x2a4a9a)),
    l(13, 1, 6, 4, Rgba::hex(0x4169e1)),
    // belt
    l(8, 18, 16, 3, Rgba::hex(0x8b4513)),
];

const TUNIC_GREEN: &[Layer] = &[
    l(8, 8, 16, 20, Rgba::hex(0x228b22)),
    l(10, 10, 12, 16, Rgba::hex(0x32cd32)),
    // hair
    l(12, 2, 8, 4, Rgba::hex(0x6b4423)),
    l(13, 2, 6, 3, Rgba::hex(0x8b5433)),
];

const CROWNED_PURPLE: &[Layer] = &[
    l(8, 8, 16, 20, Rgba::hex(0x663399)),
    l(10, 10, 12, 16, Rgba::hex(0x9370db)),
    l(10, 0, 12, 4, Rgba::hex(0xb8860b)),
    l(11, 1, 10, 2, Rgba::hex(0xdaa520)),
];

const HOODED_RED: &[Layer] = &[
    l(8, 8, 16, 20, Rgba::hex(0xaa1a1a)),
    l(10, 10, 12, 16, Rgba::hex(0xdc143c)),
    l(8, 0, 16, 6, Rgba::hex(0xaa1a1a)),
    l(10, 1, 12, 4, Rgba::hex(0xdc143c)),
];

/// Face shared by every NPC, painted over the outfit.
pub const NPC_FACE: &[Layer] = &[
    l(10, 4, 12, 8, SKIN),
    l(12, 8, 2, 2, BLACK),
    l(18, 8, 2, 2, BLACK),
    l(13, 8, 1, 1, WHITE),
    l(19, 8, 1, 1, WHITE),
    l(15, 10, 2, 1, BLACK),
];

pub fn outfit_layers(appearance: Appearance) -> &'static [Layer] {
    match appearance {
        Appearance::Robed => ROBED_BLUE,
        Appearance::Tunic => TUNIC_GREEN,
        Appearance::Crowned => CROWNED_PURPLE,
        Appearance::Hooded => HOODED_RED,
    }
}

/// "Press to talk" plate, in tile space: sits above the NPC's tile.
pub const INTERACTION_INDICATOR: &[Layer] = &[
    l(16, -8, 12, 8, INDICATOR_PLATE),
    l(18, -6, 8, 4, WHITE),
];
