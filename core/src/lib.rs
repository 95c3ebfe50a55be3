#![no_std]

extern crate alloc;

use alloc::collections::VecDeque;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use types::orthogonal_neighbors;

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use profile::*;
pub use session::*;
pub use sink::*;
pub use source::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod profile;
mod session;
mod sink;
mod source;
mod types;

/// Immutable maze layout: a rectangular grid of cells plus the start and goal cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridParts")]
pub struct Grid {
    cells: Array2<CellKind>,
    size: Coord2,
    start: Coord2,
    goal: Coord2,
}

impl Grid {
    /// Validates an arbitrary cell array. Start and goal must be inside the grid and passable.
    pub fn new(cells: Array2<CellKind>, start: Coord2, goal: Coord2) -> Result<Self> {
        let (rows, cols) = cells.dim();
        if rows == 0 || cols == 0 {
            return Err(MazeError::EmptyGrid);
        }
        let size: Coord2 = (
            rows.try_into().map_err(|_| MazeError::OutOfBounds)?,
            cols.try_into().map_err(|_| MazeError::OutOfBounds)?,
        );
        check_bounds(size, start)?;
        check_bounds(size, goal)?;
        if cells[start.to_nd_index()].is_wall() || cells[goal.to_nd_index()].is_wall() {
            return Err(MazeError::BlockedEndpoint);
        }
        Ok(Self::new_unchecked(cells, size, start, goal))
    }

    pub(crate) fn new_unchecked(
        cells: Array2<CellKind>,
        size: Coord2,
        start: Coord2,
        goal: Coord2,
    ) -> Self {
        Self {
            cells,
            size,
            start,
            goal,
        }
    }

    /// Everything is passable except the listed walls.
    pub fn from_walls(size: Coord2, start: Coord2, goal: Coord2, walls: &[Coord2]) -> Result<Self> {
        Self::new(fill_cells(size, CellKind::Passable, CellKind::Wall, walls)?, start, goal)
    }

    /// Everything is a wall except the carved path cells.
    pub fn from_path(size: Coord2, start: Coord2, goal: Coord2, path: &[Coord2]) -> Result<Self> {
        Self::new(fill_cells(size, CellKind::Wall, CellKind::Passable, path)?, start, goal)
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn rows(&self) -> Coord {
        self.size.0
    }

    pub fn cols(&self) -> Coord {
        self.size.1
    }

    pub fn start(&self) -> Coord2 {
        self.start
    }

    pub fn goal(&self) -> Coord2 {
        self.goal
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        coords.0 < self.size.0 && coords.1 < self.size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        check_bounds(self.size, coords)
    }

    pub fn cell(&self, coords: Coord2) -> Result<CellKind> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    pub fn is_passable(&self, coords: Coord2) -> Result<bool> {
        self.cell(coords).map(CellKind::is_passable)
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_wall()).count()
    }

    pub fn iter_walls(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| cell.is_wall())
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    /// Cell enclosing the pixel `(x, y)` when each cell is `cell_size` pixels wide.
    pub fn cell_at_pixel(&self, (x, y): PixelPoint, cell_size: u32) -> Option<Coord2> {
        if cell_size == 0 {
            return None;
        }
        let row = Coord::try_from(y / cell_size).ok()?;
        let col = Coord::try_from(x / cell_size).ok()?;
        let coords = (row, col);
        self.contains(coords).then_some(coords)
    }

    /// Number of orthogonal steps on the shortest passable route from start to goal.
    pub fn shortest_path_len(&self) -> Option<usize> {
        let mut distance: Array2<Option<usize>> = Array2::from_elem(self.size.to_nd_index(), None);
        let mut to_visit = VecDeque::from([self.start]);
        distance[self.start.to_nd_index()] = Some(0);

        while let Some(coords) = to_visit.pop_front() {
            let steps = distance[coords.to_nd_index()]?;
            if coords == self.goal {
                return Some(steps);
            }
            for next in orthogonal_neighbors(coords, self.size) {
                if self[next].is_passable() && distance[next.to_nd_index()].is_none() {
                    distance[next.to_nd_index()] = Some(steps + 1);
                    to_visit.push_back(next);
                }
            }
        }

        None
    }
}

/// Serialized form of [`Grid`]; `size` is recomputed from `cells` on the way in.
#[derive(Deserialize)]
struct GridParts {
    cells: Array2<CellKind>,
    start: Coord2,
    goal: Coord2,
}

impl TryFrom<GridParts> for Grid {
    type Error = MazeError;

    fn try_from(parts: GridParts) -> Result<Self> {
        Self::new(parts.cells, parts.start, parts.goal)
    }
}

impl Index<Coord2> for Grid {
    type Output = CellKind;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.cells[(row as usize, col as usize)]
    }
}

fn check_bounds(size: Coord2, coords: Coord2) -> Result<Coord2> {
    if coords.0 < size.0 && coords.1 < size.1 {
        Ok(coords)
    } else {
        Err(MazeError::OutOfBounds)
    }
}

fn fill_cells(
    size: Coord2,
    base: CellKind,
    marked: CellKind,
    marks: &[Coord2],
) -> Result<Array2<CellKind>> {
    let mut cells = Array2::from_elem(size.to_nd_index(), base);
    for &coords in marks {
        check_bounds(size, coords)?;
        cells[coords.to_nd_index()] = marked;
    }
    Ok(cells)
}

/// Outcome of feeding one input into the state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    NoChange,
    Moved,
    Won,
    Collided,
}

impl MoveOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use MoveOutcome::*;
        match self {
            NoChange => false,
            Moved => true,
            Won => true,
            Collided => true,
        }
    }

    pub const fn changed_status(self) -> bool {
        matches!(self, Self::Won | Self::Collided)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_walls_marks_only_listed_cells() {
        let grid = Grid::from_walls((3, 4), (0, 0), (2, 3), &[(0, 1), (1, 1)]).unwrap();

        assert_eq!(grid.size(), (3, 4));
        assert_eq!(grid.wall_count(), 2);
        assert_eq!(grid.cell((0, 1)), Ok(CellKind::Wall));
        assert_eq!(grid.is_passable((2, 2)), Ok(true));
        assert_eq!(grid.iter_walls().collect::<alloc::vec::Vec<_>>(), [(0, 1), (1, 1)]);
    }

    #[test]
    fn from_path_carves_only_listed_cells() {
        let grid = Grid::from_path((2, 2), (0, 0), (1, 1), &[(0, 0), (0, 1), (1, 1)]).unwrap();

        assert_eq!(grid.wall_count(), 1);
        assert_eq!(grid[(1, 0)], CellKind::Wall);
        assert_eq!(grid.shortest_path_len(), Some(2));
    }

    #[test]
    fn blocked_endpoints_are_rejected() {
        assert_eq!(
            Grid::from_walls((2, 2), (0, 0), (1, 1), &[(1, 1)]),
            Err(MazeError::BlockedEndpoint)
        );
        assert_eq!(
            Grid::from_path((2, 2), (0, 0), (1, 1), &[(1, 1)]),
            Err(MazeError::BlockedEndpoint)
        );
    }

    #[test]
    fn invalid_shapes_are_rejected() {
        assert_eq!(Grid::from_walls((0, 3), (0, 0), (0, 0), &[]), Err(MazeError::EmptyGrid));
        assert_eq!(Grid::from_walls((2, 2), (0, 0), (2, 0), &[]), Err(MazeError::OutOfBounds));
        assert_eq!(Grid::from_walls((2, 2), (0, 0), (1, 1), &[(5, 5)]), Err(MazeError::OutOfBounds));
    }

    #[test]
    fn accessors_reject_out_of_bounds() {
        let grid = Grid::from_walls((8, 8), (0, 0), (7, 7), &[]).unwrap();

        assert_eq!(grid.is_passable((8, 0)), Err(MazeError::OutOfBounds));
        assert_eq!(grid.cell((0, 8)), Err(MazeError::OutOfBounds));
        assert!(!grid.contains((8, 8)));
    }

    #[test]
    fn pixels_map_to_enclosing_cell() {
        let grid = Grid::from_walls((8, 8), (0, 0), (7, 7), &[]).unwrap();

        assert_eq!(grid.cell_at_pixel((0, 0), 50), Some((0, 0)));
        assert_eq!(grid.cell_at_pixel((49, 49), 50), Some((0, 0)));
        assert_eq!(grid.cell_at_pixel((50, 120), 50), Some((2, 1)));
        assert_eq!(grid.cell_at_pixel((399, 399), 50), Some((7, 7)));
        assert_eq!(grid.cell_at_pixel((400, 10), 50), None);
        assert_eq!(grid.cell_at_pixel((10, 10), 0), None);
    }

    #[test]
    fn unreachable_goal_has_no_path() {
        let grid = Grid::from_walls((3, 3), (0, 0), (2, 2), &[(0, 1), (1, 0), (1, 1)]).unwrap();

        assert_eq!(grid.shortest_path_len(), None);
    }

    #[test]
    fn deserializing_revalidates() {
        let grid = Grid::from_walls((2, 2), (0, 0), (1, 1), &[(1, 0)]).unwrap();
        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(serde_json::from_value::<Grid>(json.clone()).unwrap(), grid);

        let mut walled_start = json.clone();
        walled_start["start"] = serde_json::json!([1, 0]);
        assert!(serde_json::from_value::<Grid>(walled_start).is_err());

        let mut oversized = json;
        oversized["size"] = serde_json::json!([5, 5]);
        let grid = serde_json::from_value::<Grid>(oversized).unwrap();
        assert_eq!(grid.size(), (2, 2));
        assert_eq!(grid.is_passable((2, 1)), Err(MazeError::OutOfBounds));
    }

    #[test]
    fn outcome_flags() {
        assert!(!MoveOutcome::NoChange.has_update());
        assert!(MoveOutcome::Won.has_update());
        assert!(MoveOutcome::Collided.changed_status());
        assert!(!MoveOutcome::Moved.changed_status());
    }
}
