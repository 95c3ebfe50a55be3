use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::MazeError;

/// Single coordinate axis used for grid rows, columns and positions.
pub type Coord = u8;

/// Grid cell coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Continuous pointer position in pixels `(x, y)`, as produced by a tracker.
pub type PixelPoint = (u32, u32);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit `(row, col)` displacement.
    pub const fn delta(self) -> (isize, isize) {
        use Direction::*;
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub const fn opposite(self) -> Self {
        use Direction::*;
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// Accepts single letters (`u`, `d`, `l`, `r`) and full words, any case.
    pub fn from_token(token: &str) -> Option<Self> {
        use Direction::*;
        let token = token.trim();
        [
            ("u", Up),
            ("up", Up),
            ("d", Down),
            ("down", Down),
            ("l", Left),
            ("left", Left),
            ("r", Right),
            ("right", Right),
        ]
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(token))
        .map(|(_, direction)| direction)
    }
}

impl FromStr for Direction {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or(MazeError::InvalidDirection)
    }
}

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
pub(crate) fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;
    let (rows, cols) = bounds;

    let next_row = row.checked_add_signed(d_row.try_into().ok()?)?;
    if next_row >= rows {
        return None;
    }

    let next_col = col.checked_add_signed(d_col.try_into().ok()?)?;
    if next_col >= cols {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterates the up-to-four orthogonal neighbours of `center` that lie inside `bounds`.
pub(crate) fn orthogonal_neighbors(center: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> {
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| apply_delta(center, direction.delta(), bounds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_delta_stays_inside_bounds() {
        assert_eq!(apply_delta((0, 0), Direction::Up.delta(), (8, 8)), None);
        assert_eq!(apply_delta((0, 0), Direction::Left.delta(), (8, 8)), None);
        assert_eq!(apply_delta((7, 7), Direction::Down.delta(), (8, 8)), None);
        assert_eq!(apply_delta((7, 7), Direction::Right.delta(), (8, 8)), None);
        assert_eq!(apply_delta((3, 4), Direction::Up.delta(), (8, 8)), Some((2, 4)));
        assert_eq!(apply_delta((3, 4), Direction::Right.delta(), (8, 8)), Some((3, 5)));
    }

    #[test]
    fn corner_has_two_neighbors() {
        let mut neighbors: alloc::vec::Vec<_> = orthogonal_neighbors((0, 0), (3, 3)).collect();
        neighbors.sort();
        assert_eq!(neighbors, [(0, 1), (1, 0)]);
        assert_eq!(orthogonal_neighbors((1, 1), (3, 3)).count(), 4);
    }

    #[test]
    fn direction_tokens_parse_case_insensitively() {
        assert_eq!(Direction::from_token("U"), Some(Direction::Up));
        assert_eq!(Direction::from_token(" left "), Some(Direction::Left));
        assert_eq!("Right".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!("north".parse::<Direction>(), Err(MazeError::InvalidDirection));
    }

    #[test]
    fn opposite_reverses_delta() {
        for direction in Direction::ALL {
            let (dr, dc) = direction.delta();
            assert_eq!(direction.opposite().delta(), (-dr, -dc));
        }
    }
}
