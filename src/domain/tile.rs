//! Tile types and their properties.
//! Properties are queried via methods, not stored as flags,
//! so tile semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TileType {
    #[default]
    Grass,
    Stone, // Walkable, decorative
    Water, // Solid; always on the map border
    Tree,  // Solid
}

impl TileType {
    /// Does this tile block movement?
    pub fn is_solid(self) -> bool {
        matches!(self, TileType::Water | TileType::Tree)
    }
}
