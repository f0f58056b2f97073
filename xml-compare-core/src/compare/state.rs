use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Status of a paired node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum NodeStatus {
    #[default]
    Unchanged,
    /// Only present on the right.
    New,
    /// Only present on the left.
    Deleted,
    Updated,
}

impl NodeStatus {
    pub fn is_changed(self) -> bool {
        self != Self::Unchanged
    }

    /// Status as seen with left and right swapped.
    pub fn mirrored(self) -> Self {
        match self {
            Self::New => Self::Deleted,
            Self::Deleted => Self::New,
            other => other,
        }
    }

    /// One-character marker used by the text formats.
    pub fn marker(self) -> char {
        match self {
            Self::Unchanged => '=',
            Self::New => '+',
            Self::Deleted => '-',
            Self::Updated => '~',
        }
    }
}

impl Display for NodeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unchanged => "unchanged",
            Self::New => "new",
            Self::Deleted => "deleted",
            Self::Updated => "updated",
        };
        f.write_str(label)
    }
}

/// Which way a node moved among its siblings, from left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// Toward the start of the sibling list.
    Up,
    /// Toward the end of the sibling list.
    Down,
}

impl Direction {
    /// Direction of a node moving from `left_index` to `right_index`.
    pub fn between(left_index: usize, right_index: usize) -> Self {
        if left_index < right_index {
            Self::Down
        } else {
            Self::Up
        }
    }

    pub fn mirrored(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Move classification of a paired node.
///
/// `AndUpdated` marks a move combined with a content update where order
/// does not matter. `ThenUpdated` marks a move counted as an update because
/// order matters, whether or not the content changed too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum MovedState {
    #[default]
    None,
    Up,
    Down,
    UpAndUpdated,
    DownAndUpdated,
    UpThenUpdated,
    DownThenUpdated,
}

impl MovedState {
    pub fn moved(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
        }
    }

    pub fn and_updated(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::UpAndUpdated,
            Direction::Down => Self::DownAndUpdated,
        }
    }

    pub fn then_updated(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::UpThenUpdated,
            Direction::Down => Self::DownThenUpdated,
        }
    }

    pub fn is_moved(self) -> bool {
        self != Self::None
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::None => None,
            Self::Up | Self::UpAndUpdated | Self::UpThenUpdated => Some(Direction::Up),
            Self::Down | Self::DownAndUpdated | Self::DownThenUpdated => Some(Direction::Down),
        }
    }

    /// Same classification with the direction flipped.
    pub fn mirrored(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::UpAndUpdated => Self::DownAndUpdated,
            Self::DownAndUpdated => Self::UpAndUpdated,
            Self::UpThenUpdated => Self::DownThenUpdated,
            Self::DownThenUpdated => Self::UpThenUpdated,
        }
    }
}

impl Display for MovedState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "not moved",
            Self::Up => "moved up",
            Self::Down => "moved down",
            Self::UpAndUpdated => "moved up and updated",
            Self::DownAndUpdated => "moved down and updated",
            Self::UpThenUpdated => "moved up, then updated",
            Self::DownThenUpdated => "moved down, then updated",
        };
        f.write_str(label)
    }
}
