//! Events emitted during a simulation step.
//! The host consumes these for logging; the renderer reads state, not events.

use crate::domain::entity::Direction;
use crate::domain::movement::Blocker;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PlayerMoved { x: usize, y: usize },
    PlayerBumped { facing: Direction, blocker: Blocker },
    DialogOpened { npc: usize },
    DialogClosed,
}
