pub mod camera;
pub mod entity;
pub mod grid;
pub mod interaction;
pub mod movement;
pub mod tile;
