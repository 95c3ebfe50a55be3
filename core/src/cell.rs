use serde::{Deserialize, Serialize};

/// What occupies a single maze cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Passable,
    Wall,
}

impl CellKind {
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Passable)
    }

    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }
}
