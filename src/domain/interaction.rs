//! Interaction system: proximity test and the dialog open/close toggle.
//!
//! The same action both opens and closes a dialog. Opening scans the NPC
//! list in order and takes the first NPC within Manhattan distance 1; there
//! is no tie-break beyond list order.

use super::entity::{manhattan, Npc};

pub const INTERACT_RANGE: usize = 1;

/// Dialog state owned by the core. Drawing the box is the UI's job.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
    open: bool,
    text: String,
    speaker: Option<usize>,
}

impl InteractionState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Currently displayed text (empty when closed).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Index of the NPC whose dialog is showing.
    pub fn speaker(&self) -> Option<usize> {
        self.speaker
    }

    pub fn open(&mut self, speaker: usize, text: &str) {
        self.open = true;
        self.speaker = Some(speaker);
        self.text = text.to_string();
    }

    pub fn close(&mut self) {
        self.open = false;
        self.speaker = None;
        self.text.clear();
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Interaction {
    Opened { npc: usize },
    Closed,
    NothingNearby,
}

/// First NPC (list order) within interaction range of `player`.
pub fn nearby_npc(player: (usize, usize), npcs: &[Npc]) -> Option<usize> {
    npcs.iter().position(|n| manhattan(player, n.pos()) <= INTERACT_RANGE)
}

/// Toggle: close an open dialog, otherwise open the first nearby NPC's text.
/// With nobody in range the state is left untouched.
pub fn attempt_interact(state: &mut InteractionState, player: (usize, usize), npcs: &[Npc]) -> Interaction {
    if state.is_open() {
        state.close();
        return Interaction::Closed;
    }
    match nearby_npc(player, npcs) {
        Some(i) => {
            state.open(i, &npcs[i].dialog);
            Interaction::Opened { npc: i }
        }
        None => Interaction::NothingNearby,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Appearance;

    fn npc(x: usize, y: usize, dialog: &str) -> Npc {
        Npc { x, y, appearance: Appearance::Tunic, name: format!("npc@{x},{y}"), dialog: dialog.into() }
    }

    #[test]
    fn adjacent_opens_then_toggle_closes() {
        let npcs = vec![npc(15, 10, "work history")];
        let mut st = InteractionState::default();

        assert_eq!(attempt_interact(&mut st, (14, 10), &npcs), Interaction::Opened { npc: 0 });
        assert!(st.is_open());
        assert_eq!(st.text(), "work history");
        assert_eq!(st.speaker(), Some(0));

        // Closing does not care where the player is.
        assert_eq!(attempt_interact(&mut st, (1, 1), &npcs), Interaction::Closed);
        assert!(!st.is_open());
        assert_eq!(st.text(), "");
    }

    #[test]
    fn distance_two_is_out_of_range() {
        let npcs = vec![npc(15, 10, "a"), npc(20, 8, "b")];
        let mut st = InteractionState::default();
        // Diagonal neighbour: Manhattan distance 2.
        assert_eq!(attempt_interact(&mut st, (14, 9), &npcs), Interaction::NothingNearby);
        assert_eq!(attempt_interact(&mut st, (17, 10), &npcs), Interaction::NothingNearby);
        assert_eq!(st, InteractionState::default());
    }

    #[test]
    fn first_in_list_wins() {
        let npcs = vec![npc(5, 4, "first"), npc(5, 6, "second")];
        let mut st = InteractionState::default();
        assert_eq!(attempt_interact(&mut st, (5, 5), &npcs), Interaction::Opened { npc: 0 });
        assert_eq!(st.text(), "first");
    }

    #[test]
    fn nearby_lookup() {
        let npcs = vec![npc(5, 4, "x")];
        assert_eq!(nearby_npc((5, 5), &npcs), Some(0));
        assert_eq!(nearby_npc((6, 5), &npcs), None);
        assert_eq!(nearby_npc((1, 1), &[]), None);
    }
}
