//! Entities: the Player and the stationary NPCs.
//! NPCs never move or animate; only the player carries facing and an
//! animation phase.

/// Cardinal direction (movement intent and facing). No diagonals.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit grid offset `(dx, dy)`; y grows downward.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Frame input: sampled once per tick from the input collaborators.
/// Movement = level-triggered (held key), interact = edge-triggered (fresh press),
/// dismiss = a click on the dialog overlay or the dedicated close key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub movement: Option<Direction>,
    pub interact: bool,
    pub dismiss: bool,
}

/// Player animation phase. Frame 1 shows the walking pose.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AnimFrame {
    #[default]
    Idle,
    Stride,
}

impl AnimFrame {
    pub fn toggled(self) -> Self {
        match self {
            AnimFrame::Idle => AnimFrame::Stride,
            AnimFrame::Stride => AnimFrame::Idle,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: usize,
    pub y: usize,
    pub facing: Direction,
    pub anim_frame: AnimFrame,
}

impl Player {
    pub fn new(x: usize, y: usize) -> Self {
        Player {
            x,
            y,
            facing: Direction::Down,
            anim_frame: AnimFrame::Idle,
        }
    }

    pub fn pos(&self) -> (usize, usize) {
        (self.x, self.y)
    }
}

/// NPC outfit. Ids 1..=4 in content files.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Appearance {
    Robed,   // robe with pointed hat and belt
    Tunic,   // tunic with hair
    Crowned, // robe with crown
    Hooded,  // robe with hood
}

impl Appearance {
    pub fn from_id(id: u8) -> Option<Appearance> {
        match id {
            1 => Some(Appearance::Robed),
            2 => Some(Appearance::Tunic),
            3 => Some(Appearance::Crowned),
            4 => Some(Appearance::Hooded),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Npc {
    pub x: usize,
    pub y: usize,
    pub appearance: Appearance,
    pub name: String,
    /// Opaque dialog payload; `\n` marks a line break.
    pub dialog: String,
}

impl Npc {
    pub fn pos(&self) -> (usize, usize) {
        (self.x, self.y)
    }
}

/// |dx| + |dy| between two grid cells.
pub fn manhattan(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_deltas_are_unit_cardinal() {
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let (dx, dy) = dir.delta();
            assert_eq!(dx.abs() + dy.abs(), 1, "{dir:?} must move exactly one cell");
        }
        assert_eq!(Direction::Up.delta(), (0, -1));
    }

    #[test]
    fn anim_frame_toggles() {
        let f = AnimFrame::Idle;
        assert_eq!(f.toggled(), AnimFrame::Stride);
        assert_eq!(f.toggled().toggled(), AnimFrame::Idle);
    }

    #[test]
    fn appearance_ids() {
        assert_eq!(Appearance::from_id(1), Some(Appearance::Robed));
        assert_eq!(Appearance::from_id(4), Some(Appearance::Hooded));
        assert_eq!(Appearance::from_id(0), None);
        assert_eq!(Appearance::from_id(5), None);
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(manhattan((3, 4), (3, 4)), 0);
        assert_eq!(manhattan((3, 4), (4, 4)), 1);
        assert_eq!(manhattan((3, 4), (4, 5)), 2);
        assert_eq!(manhattan((0, 0), (5, 2)), 7);
    }
}
