//! The step function: advances the world by one frame of real elapsed time.
//!
//! Processing order:
//!   1. Dialog toggle (dismiss, then interact)
//!   2. While a dialog is open: stop here, timers frozen
//!   3. Animation phase
//!   4. Movement (facing first, then the rate-limited step)
//!   5. Camera follow
//!
//! Elapsed time is measured by the host and may vary frame to frame; move
//! and animation speed only depend on the accumulated timers.

use std::time::Duration;

use log::debug;

use crate::domain::entity::{Direction, InputSnapshot};
use crate::domain::interaction::{self, Interaction};
use crate::domain::movement::{self, MoveOutcome};
use super::event::GameEvent;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: InputSnapshot, dt: Duration) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    resolve_dialog(world, input, &mut events);
    if world.phase() == Phase::Dialog {
        return events;
    }

    resolve_animation(world, input.movement.is_some(), dt);
    resolve_movement(world, input.movement, dt, &mut events);
    world.update_camera();

    events
}

// ══════════════════════════════════════════════════════════════
// Dialog
// ══════════════════════════════════════════════════════════════

fn resolve_dialog(world: &mut WorldState, input: InputSnapshot, events: &mut Vec<GameEvent>) {
    if input.dismiss && world.dialog.is_open() {
        world.dialog.close();
        debug!("dialog dismissed");
        events.push(GameEvent::DialogClosed);
        return;
    }
    if !input.interact {
        return;
    }
    match interaction::attempt_interact(&mut world.dialog, world.player.pos(), &world.npcs) {
        Interaction::Opened { npc } => {
            debug!("dialog opened: {}", world.npcs[npc].name);
            events.push(GameEvent::DialogOpened { npc });
        }
        Interaction::Closed => {
            debug!("dialog closed");
            events.push(GameEvent::DialogClosed);
        }
        Interaction::NothingNearby => {}
    }
}

// ══════════════════════════════════════════════════════════════
// Animation
// ══════════════════════════════════════════════════════════════

/// Walk cycle runs only while a direction is held; letting go snaps back to frame 0.
fn resolve_animation(world: &mut WorldState, moving: bool, dt: Duration) {
    if !moving {
        world.player.anim_frame = Default::default();
        world.anim_timer = Duration::ZERO;
        return;
    }
    world.anim_timer += dt;
    if world.anim_timer > world.timing.anim_interval {
        world.player.anim_frame = world.player.anim_frame.toggled();
        world.anim_timer = Duration::ZERO;
    }
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn resolve_movement(world: &mut WorldState, dir: Option<Direction>, dt: Duration, events: &mut Vec<GameEvent>) {
    world.move_timer = world.move_timer.saturating_add(dt);
    let Some(dir) = dir else { return };

    // Re-orient immediately, even if the step itself is refused or not yet due.
    world.player.facing = dir;
    if world.move_timer < world.timing.move_delay {
        return;
    }
    world.move_timer = Duration::ZERO;

    match movement::try_move(&world.grid, &world.npcs, world.player.pos(), dir) {
        MoveOutcome::Moved { x, y } => {
            world.player.x = x;
            world.player.y = y;
            events.push(GameEvent::PlayerMoved { x, y });
        }
        MoveOutcome::Blocked(blocker) => {
            events.push(GameEvent::PlayerBumped { facing: dir, blocker });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplayConfig, TimingConfig};
    use crate::domain::entity::AnimFrame;
    use crate::domain::grid::Grid;
    use crate::domain::movement::Blocker;
    use crate::domain::tile::TileType;
    use crate::sim::content::Content;

    const FRAME: Duration = Duration::from_millis(50);

    /// 32x24 water-bordered grass field, player at (8, 12), plus optional NPC TOML.
    fn field(extra: &str, tweak: impl FnOnce(&mut Vec<Vec<TileType>>)) -> WorldState {
        let mut tiles = vec![vec![TileType::Grass; 32]; 24];
        for (y, row) in tiles.iter_mut().enumerate() {
            for (x, t) in row.iter_mut().enumerate() {
                if x == 0 || y == 0 || x == 31 || y == 23 {
                    *t = TileType::Water;
                }
            }
        }
        tweak(&mut tiles);
        let content = Content::parse(&format!("spawn = [8, 12]\n{extra}")).unwrap();
        WorldState::with_grid(Grid::from_rows(tiles), content, TimingConfig::default(), &DisplayConfig::default(), 0)
    }

    fn hold(dir: Direction) -> InputSnapshot {
        InputSnapshot { movement: Some(dir), ..Default::default() }
    }

    fn interact() -> InputSnapshot {
        InputSnapshot { interact: true, ..Default::default() }
    }

    const KEEPER: &str = "[[npc]]\nx = 9\ny = 11\nsprite = 1\nname = \"Keeper\"\ndialog = \"line one\\nline two\"\n";

    #[test]
    fn up_moves_after_delay_and_faces_immediately() {
        let mut w = field("", |_| {});
        // 3 × 50ms = 150ms < 200ms: facing changes, position does not.
        for _ in 0..3 {
            let ev = step(&mut w, hold(Direction::Up), FRAME);
            assert!(ev.is_empty());
            assert_eq!(w.player.facing, Direction::Up);
            assert_eq!(w.player.pos(), (8, 12));
        }
        let ev = step(&mut w, hold(Direction::Up), FRAME);
        assert_eq!(ev, vec![GameEvent::PlayerMoved { x: 8, y: 11 }]);
        assert_eq!(w.player.pos(), (8, 11));
    }

    #[test]
    fn holding_a_key_is_rate_limited() {
        let mut w = field("", |_| {});
        let mut moves = 0;
        for _ in 0..20 {
            moves += step(&mut w, hold(Direction::Up), FRAME).len();
        }
        // 1000ms held at one step per 200ms.
        assert_eq!(moves, 5);
        assert_eq!(w.player.pos(), (8, 7));
    }

    #[test]
    fn variable_frame_times_give_the_same_speed() {
        let mut w = field("", |_| {});
        let frames = [10, 90, 30, 70, 5, 195, 40, 160, 200, 1];
        for ms in frames {
            step(&mut w, hold(Direction::Right), Duration::from_millis(ms));
        }
        // Timer resets on each step: due after frames 4, 6, 8 and 9.
        assert_eq!(w.player.pos(), (12, 12));
    }

    #[test]
    fn bump_reorients_without_moving() {
        let mut w = field("", |t| t[12][7] = TileType::Tree);
        let ev = step(&mut w, hold(Direction::Left), Duration::from_millis(250));
        assert_eq!(
            ev,
            vec![GameEvent::PlayerBumped { facing: Direction::Left, blocker: Blocker::Tile(TileType::Tree) }]
        );
        assert_eq!(w.player.pos(), (8, 12));
        assert_eq!(w.player.facing, Direction::Left);
    }

    #[test]
    fn npc_blocks_the_step() {
        let mut w = field("[[npc]]\nx = 8\ny = 11\nsprite = 2\nname = \"Wall\"\ndialog = \"hi\"\n", |_| {});
        let ev = step(&mut w, hold(Direction::Up), Duration::from_millis(200));
        assert_eq!(ev, vec![GameEvent::PlayerBumped { facing: Direction::Up, blocker: Blocker::Npc(0) }]);
        assert_eq!(w.player.pos(), (8, 12));
    }

    #[test]
    fn walk_cycle_toggles_and_resets_on_release() {
        let mut w = field("", |_| {});
        let tick = Duration::from_millis(100);
        let mut frames = vec![];
        for _ in 0..12 {
            step(&mut w, hold(Direction::Down), tick);
            frames.push(w.player.anim_frame);
        }
        // Flips once the accumulated time exceeds 500ms (6th frame), again on the 12th.
        assert_eq!(frames[4], AnimFrame::Idle);
        assert_eq!(frames[5], AnimFrame::Stride);
        assert_eq!(frames[10], AnimFrame::Stride);
        assert_eq!(frames[11], AnimFrame::Idle);

        for _ in 0..6 {
            step(&mut w, hold(Direction::Down), tick);
        }
        assert_eq!(w.player.anim_frame, AnimFrame::Stride);
        step(&mut w, InputSnapshot::default(), tick);
        assert_eq!(w.player.anim_frame, AnimFrame::Idle);
        assert_eq!(w.anim_timer, Duration::ZERO);
    }

    #[test]
    fn dialog_opens_and_freezes_the_world() {
        let mut w = field(KEEPER, |_| {});
        // (9, 11) is diagonal to (8, 12): distance 2, nothing happens.
        assert!(step(&mut w, interact(), FRAME).is_empty());
        assert_eq!(w.phase(), Phase::Running);

        step(&mut w, hold(Direction::Right), Duration::from_millis(200));
        assert_eq!(w.player.pos(), (9, 12));

        let ev = step(&mut w, interact(), FRAME);
        assert_eq!(ev, vec![GameEvent::DialogOpened { npc: 0 }]);
        assert_eq!(w.phase(), Phase::Dialog);
        assert_eq!(w.dialog.text(), "line one\nline two");
        assert_eq!(w.speaker_name(), Some("Keeper"));

        let (move_t, anim_t, frame) = (w.move_timer, w.anim_timer, w.player.anim_frame);
        let ev = step(&mut w, hold(Direction::Down), Duration::from_secs(5));
        assert!(ev.is_empty());
        assert_eq!(w.player.pos(), (9, 12));
        assert_eq!(w.player.facing, Direction::Right);
        assert_eq!((w.move_timer, w.anim_timer, w.player.anim_frame), (move_t, anim_t, frame));

        let ev = step(&mut w, interact(), FRAME);
        assert_eq!(ev, vec![GameEvent::DialogClosed]);
        assert_eq!(w.phase(), Phase::Running);
    }

    #[test]
    fn dismiss_closes_and_wins_over_interact() {
        let mut w = field(KEEPER, |_| {});
        w.player.x = 9;
        step(&mut w, interact(), FRAME);
        assert!(w.dialog.is_open());

        let both = InputSnapshot { interact: true, dismiss: true, movement: None };
        assert_eq!(step(&mut w, both, FRAME), vec![GameEvent::DialogClosed]);
        assert!(!w.dialog.is_open());

        // Dismiss with nothing open is a no-op.
        let dismiss = InputSnapshot { dismiss: true, ..Default::default() };
        assert!(step(&mut w, dismiss, FRAME).is_empty());
    }

    #[test]
    fn camera_follows_after_move() {
        let mut w = field("", |_| {});
        for _ in 0..8 {
            step(&mut w, hold(Direction::Right), Duration::from_millis(200));
        }
        assert_eq!(w.player.pos(), (16, 12));
        assert_eq!(w.camera.x, 16 * 48 - 384);
    }
}
