use serde::{Deserialize, Serialize};

use crate::types::apply_delta;
use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Running,
    Won,
    LostCollision,
}

impl GameStatus {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::LostCollision)
    }
}

/// Maze state machine. Owns the player position and game status; the grid is read-only.
///
/// Discrete steps and tracked pointer samples differ:
/// a step into a wall is simply refused, while a pointer landing on a wall loses the game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EngineParts")]
pub struct MazeEngine {
    grid: Grid,
    cell_size: u32,
    player: Coord2,
    status: GameStatus,
}

impl MazeEngine {
    pub fn new(grid: Grid, cell_size: u32) -> Self {
        let player = grid.start();
        Self {
            grid,
            cell_size,
            player,
            status: Default::default(),
        }
    }

    pub fn from_profile(profile: Profile) -> Self {
        Self::new(profile.build(), profile.default_cell_size())
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn player_cell(&self) -> Coord2 {
        self.player
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn is_passable(&self, coords: Coord2) -> Result<bool> {
        self.grid.is_passable(coords)
    }

    /// Relative step. Leaving the grid or stepping into a wall is a silent no-op.
    pub fn attempt_move(&mut self, direction: Direction) -> MoveOutcome {
        if !self.status.is_running() {
            return MoveOutcome::NoChange;
        }

        let Some(next) = apply_delta(self.player, direction.delta(), self.grid.size()) else {
            log::trace!("{:?} from {:?} leaves the maze", direction, self.player);
            return MoveOutcome::NoChange;
        };

        if self.grid[next].is_wall() {
            log::trace!("{:?} from {:?} blocked by wall", direction, self.player);
            return MoveOutcome::NoChange;
        }

        self.player = next;
        log::debug!("player moved {:?} to {:?}", direction, next);
        self.arrive(next)
    }

    /// Absolute placement from a tracked pointer position, in pixels.
    ///
    /// Landing on a wall ends the game with [`GameStatus::LostCollision`] and sends the
    /// player back to the start cell. Positions outside the maze are ignored.
    pub fn report_pointer_sample(&mut self, sample: Option<PixelPoint>) -> MoveOutcome {
        if !self.status.is_running() {
            return MoveOutcome::NoChange;
        }

        let Some(point) = sample else {
            return MoveOutcome::NoChange;
        };

        let Some(cell) = self.grid.cell_at_pixel(point, self.cell_size) else {
            log::trace!("pointer {:?} outside the maze", point);
            return MoveOutcome::NoChange;
        };

        if self.grid[cell].is_wall() {
            self.player = self.grid.start();
            self.status = GameStatus::LostCollision;
            log::info!("pointer {:?} hit the wall at {:?}", point, cell);
            return MoveOutcome::Collided;
        }

        if cell == self.player {
            return MoveOutcome::NoChange;
        }

        self.player = cell;
        log::debug!("pointer placed player at {:?}", cell);
        self.arrive(cell)
    }

    /// Back to the start cell and [`GameStatus::Running`], from any state.
    pub fn reset(&mut self) {
        self.player = self.grid.start();
        self.status = GameStatus::Running;
        log::info!("maze reset, player at {:?}", self.player);
    }

    fn arrive(&mut self, cell: Coord2) -> MoveOutcome {
        if cell == self.grid.goal() {
            self.status = GameStatus::Won;
            log::info!("goal {:?} reached", cell);
            MoveOutcome::Won
        } else {
            MoveOutcome::Moved
        }
    }
}

#[derive(Deserialize)]
struct EngineParts {
    grid: Grid,
    cell_size: u32,
    player: Coord2,
    status: GameStatus,
}

impl TryFrom<EngineParts> for MazeEngine {
    type Error = MazeError;

    fn try_from(parts: EngineParts) -> Result<Self> {
        if !parts.grid.is_passable(parts.player)? {
            return Err(MazeError::BlockedPlayer);
        }
        Ok(Self {
            grid: parts.grid,
            cell_size: parts.cell_size,
            player: parts.player,
            status: parts.status,
        })
    }
}
