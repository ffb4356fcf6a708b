//! Content loader: player spawn and the NPC roster.
//!
//! ## Sources (priority order):
//!   1. `content_file` from config.toml, if found on the search path
//!   2. Built-in content embedded in the binary
//!
//! ## Format (TOML):
//!   ```toml
//!   spawn = [8, 12]          # x, y
//!   clearings = [[3, 4]]     # optional extra cells, as row, col
//!
//!   [[npc]]
//!   x = 15
//!   y = 10
//!   sprite = 1               # 1 robed, 2 tunic, 3 crowned, 4 hooded
//!   name = "Experience Keeper"
//!   dialog = """..."""
//!   ```
//!
//! Content is validated once at startup; a bad file is a configuration
//! error, never a runtime fault.

use std::fmt;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

use crate::domain::entity::{Appearance, Npc};

const BUILTIN_CONTENT: &str = include_str!("../../content/npcs.toml");

/// Validated content, ready to populate a world.
#[derive(Clone, Debug)]
pub struct Content {
    /// Player spawn `(x, y)`.
    pub spawn: (usize, usize),
    pub npcs: Vec<Npc>,
    /// Extra `(row, col)` cells to clear beyond spawn and NPC cells.
    pub extra_clearings: Vec<(usize, usize)>,
}

#[derive(Debug)]
pub enum ContentError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    MissingDialog { name: String },
    UnknownSprite { name: String, sprite: u8 },
    OutsideInterior { what: String, x: usize, y: usize },
    Overlap { first: String, second: String, x: usize, y: usize },
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            ContentError::Parse(e) => write!(f, "content parse error: {e}"),
            ContentError::MissingDialog { name } => write!(f, "NPC \"{name}\" has no dialog text"),
            ContentError::UnknownSprite { name, sprite } => {
                write!(f, "NPC \"{name}\" uses unknown sprite id {sprite} (expected 1-4)")
            }
            ContentError::OutsideInterior { what, x, y } => {
                write!(f, "{what} at ({x}, {y}) is not on a walkable interior cell")
            }
            ContentError::Overlap { first, second, x, y } => {
                write!(f, "{first} and {second} both stand on ({x}, {y})")
            }
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Io { source, .. } => Some(source),
            ContentError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

// ── TOML schema ──

#[derive(Deserialize, Debug)]
struct TomlContent {
    spawn: [usize; 2],
    #[serde(default)]
    clearings: Vec<[usize; 2]>,
    #[serde(default, rename = "npc")]
    npcs: Vec<TomlNpc>,
}

#[derive(Deserialize, Debug)]
struct TomlNpc {
    x: usize,
    y: usize,
    sprite: u8,
    name: String,
    #[serde(default)]
    dialog: Option<String>,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

impl Content {
    /// Load from `path` if given, otherwise the built-in roster, and
    /// validate against a `width` × `height` grid.
    pub fn load(path: Option<&Path>, width: usize, height: usize) -> Result<Self, ContentError> {
        let content = match path {
            Some(p) => {
                info!("loading content from {}", p.display());
                let text = std::fs::read_to_string(p)
                    .map_err(|source| ContentError::Io { path: p.to_path_buf(), source })?;
                Self::parse(&text)?
            }
            None => Self::builtin()?,
        };
        content.validate(width, height)?;
        Ok(content)
    }

    pub fn builtin() -> Result<Self, ContentError> {
        Self::parse(BUILTIN_CONTENT)
    }

    /// Parse a content document. Structural checks only; see `validate`.
    pub fn parse(text: &str) -> Result<Self, ContentError> {
        let raw: TomlContent = toml::from_str(text).map_err(ContentError::Parse)?;

        let mut npcs = Vec::with_capacity(raw.npcs.len());
        for n in raw.npcs {
            let dialog = match n.dialog {
                Some(d) if !d.trim().is_empty() => d,
                _ => return Err(ContentError::MissingDialog { name: n.name }),
            };
            let appearance = Appearance::from_id(n.sprite)
                .ok_or_else(|| ContentError::UnknownSprite { name: n.name.clone(), sprite: n.sprite })?;
            npcs.push(Npc { x: n.x, y: n.y, appearance, name: n.name, dialog });
        }

        Ok(Content {
            spawn: (raw.spawn[0], raw.spawn[1]),
            npcs,
            extra_clearings: raw.clearings.iter().map(|c| (c[0], c[1])).collect(),
        })
    }

    /// Every placement must sit on the grid interior (the border is water),
    /// and no two characters may share a cell.
    pub fn validate(&self, width: usize, height: usize) -> Result<(), ContentError> {
        let interior = |x: usize, y: usize| x > 0 && y > 0 && x + 1 < width && y + 1 < height;

        let (sx, sy) = self.spawn;
        if !interior(sx, sy) {
            return Err(ContentError::OutsideInterior { what: "player spawn".into(), x: sx, y: sy });
        }

        for (i, npc) in self.npcs.iter().enumerate() {
            if !interior(npc.x, npc.y) {
                return Err(ContentError::OutsideInterior { what: format!("NPC \"{}\"", npc.name), x: npc.x, y: npc.y });
            }
            if npc.pos() == self.spawn {
                return Err(ContentError::Overlap {
                    first: "player spawn".into(),
                    second: format!("NPC \"{}\"", npc.name),
                    x: npc.x,
                    y: npc.y,
                });
            }
            if let Some(other) = self.npcs[..i].iter().find(|o| o.pos() == npc.pos()) {
                return Err(ContentError::Overlap {
                    first: format!("NPC \"{}\"", other.name),
                    second: format!("NPC \"{}\"", npc.name),
                    x: npc.x,
                    y: npc.y,
                });
            }
        }
        Ok(())
    }

    /// Cells forced to grass after generation, as `(row, col)`:
    /// spawn first, then every NPC cell, then the extra clearings.
    pub fn clearings(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(1 + self.npcs.len() + self.extra_clearings.len());
        out.push((self.spawn.1, self.spawn.0));
        out.extend(self.npcs.iter().map(|n| (n.y, n.x)));
        out.extend(self.extra_clearings.iter().copied());
        out
    }
}
