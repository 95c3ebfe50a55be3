use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("Unrecognized difficulty profile")]
    InvalidProfile,
    #[error("Cell lies outside the maze")]
    OutOfBounds,
    #[error("Start and goal cells must be passable")]
    BlockedEndpoint,
    #[error("Maze must have at least one row and one column")]
    EmptyGrid,
    #[error("Unrecognized direction")]
    InvalidDirection,
    #[error("Player must stand on a passable cell")]
    BlockedPlayer,
}

pub type Result<T> = core::result::Result<T, MazeError>;
