//! Input state tracker.
//!
//! Tracks which keys are currently held down, enabling:
//!   - Continuous movement while a key is held
//!   - Edge-triggered interact (only fires on initial press)
//!   - Left-click positions, for dismissing the dialog by clicking it
//!
//! Uses crossterm's keyboard enhancement for Release events when available;
//! a key then stays held until its Release arrives.
//! Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::domain::entity::Direction;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

/// Upper bound on the OS auto-repeat delay. Without Release events, a Press
/// this soon after the previous event for the same key is a repeat.
const REPEAT_DELAY: Duration = Duration::from_millis(600);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Timestamp of the last event of any kind per key; outlives
    /// `last_active` so auto-repeat after the hold timeout is recognised.
    last_seen: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" → "held" during the
    /// most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    raw_events: Vec<KeyEvent>,

    /// Left-button presses this frame, as terminal (column, row).
    pub clicks: Vec<(u16, u16)>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            last_seen: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            clicks: Vec::new(),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation step.
    pub fn drain_events(&mut self) {
        self.begin_frame();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(ev) = event::read() {
                self.apply(ev, Instant::now());
            }
        }

        self.expire(Instant::now());
    }

    fn begin_frame(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.clicks.clear();
    }

    fn apply(&mut self, ev: Event, now: Instant) {
        match ev {
            Event::Key(key) => {
                self.raw_events.push(key);
                match key.kind {
                    KeyEventKind::Release if self.honor_release => {
                        self.last_active.remove(&key.code);
                    }
                    // Without confirmed enhancement, rely on timeout expiry
                    KeyEventKind::Release => {}
                    kind => {
                        let fresh = kind == KeyEventKind::Press && !self.is_repeat(key.code, now);
                        self.last_active.insert(key.code, now);
                        self.last_seen.insert(key.code, now);
                        if fresh {
                            self.fresh_presses.push(key.code);
                        }
                    }
                }
            }
            Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
                self.clicks.push((m.column, m.row));
            }
            _ => {}
        }
    }

    /// Drop keys that have timed out (fallback for terminals without Release).
    fn expire(&mut self, now: Instant) {
        if !self.honor_release {
            self.last_active.retain(|_, t| now.saturating_duration_since(*t) < HOLD_TIMEOUT);
        }
        self.last_seen.retain(|_, t| now.saturating_duration_since(*t) < REPEAT_DELAY);
    }

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.is_held_at(code, Instant::now())
    }

    /// Convenience: is any of these keys held?
    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Convenience: was any of these keys freshly pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        if self.honor_release {
            return self.last_active.contains_key(&code);
        }
        self.last_active.get(&code)
            .map(|t| now.saturating_duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    /// Terminals without enhancement report auto-repeat as plain Press.
    fn is_repeat(&self, code: KeyCode, now: Instant) -> bool {
        if self.honor_release {
            return self.last_active.contains_key(&code);
        }
        self.last_seen.get(&code)
            .map(|t| now.saturating_duration_since(*t) < REPEAT_DELAY)
            .unwrap_or(false)
    }
}

/// One direction out of several held: Up, then Down, then Left, then Right.
pub fn pick_direction(up: bool, down: bool, left: bool, right: bool) -> Option<Direction> {
    if up {
        Some(Direction::Up)
    } else if down {
        Some(Direction::Down)
    } else if left {
        Some(Direction::Left)
    } else if right {
        Some(Direction::Right)
    } else {
        None
    }
}
