use core::fmt;
use core::str::FromStr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Named difficulty preset. Every profile deterministically maps to one fixed [`Grid`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    #[serde(rename = "easy")]
    Easy,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "hard")]
    Hard,
    #[serde(rename = "easy-1")]
    Easy1,
    #[serde(rename = "easy-2")]
    Easy2,
    #[serde(rename = "medium-1")]
    Medium1,
    #[serde(rename = "medium-2")]
    Medium2,
    #[serde(rename = "hard-1")]
    Hard1,
    #[serde(rename = "hard-2")]
    Hard2,
}

/// Builds the grid for a profile given by name.
pub fn build(name: &str) -> Result<Grid> {
    name.parse::<Profile>().map(Profile::build)
}

impl Profile {
    pub const ALL: [Profile; 9] = [
        Self::Easy,
        Self::Medium,
        Self::Hard,
        Self::Easy1,
        Self::Easy2,
        Self::Medium1,
        Self::Medium2,
        Self::Hard1,
        Self::Hard2,
    ];

    /// Numbered levels in the order the launcher offers them.
    pub const LEVELS: [Profile; 6] = [
        Self::Easy1,
        Self::Easy2,
        Self::Medium1,
        Self::Medium2,
        Self::Hard2,
        Self::Hard1,
    ];

    pub const fn name(self) -> &'static str {
        use Profile::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
            Easy1 => "easy-1",
            Easy2 => "easy-2",
            Medium1 => "medium-1",
            Medium2 => "medium-2",
            Hard1 => "hard-1",
            Hard2 => "hard-2",
        }
    }

    /// Level numbers start at 1.
    pub fn from_level(level: usize) -> Result<Self> {
        level
            .checked_sub(1)
            .and_then(|index| Self::LEVELS.get(index))
            .copied()
            .ok_or(MazeError::InvalidProfile)
    }

    /// Pixel width of one cell when the maze is drawn at its native size.
    pub const fn default_cell_size(self) -> u32 {
        self.blueprint().cell_size
    }

    pub const fn size(self) -> Coord2 {
        self.blueprint().size
    }

    pub fn build(self) -> Grid {
        let Blueprint {
            size,
            start,
            goal,
            layout,
            ..
        } = self.blueprint();
        let (base, marked, marks) = match layout {
            Layout::Walls(walls) => (CellKind::Passable, CellKind::Wall, walls),
            Layout::Path(path) => (CellKind::Wall, CellKind::Passable, path),
        };

        let mut cells = Array2::from_elem(size.to_nd_index(), base);
        for &coords in marks {
            cells[coords.to_nd_index()] = marked;
        }
        debug_assert!(cells[start.to_nd_index()].is_passable());
        debug_assert!(cells[goal.to_nd_index()].is_passable());

        Grid::new_unchecked(cells, size, start, goal)
    }

    const fn blueprint(self) -> Blueprint {
        use Profile::*;
        match self {
            Easy => Blueprint::large(Layout::Path(EASY_PATH)),
            Medium => Blueprint::large(Layout::Path(MEDIUM_PATH)),
            Hard => Blueprint::large(Layout::Path(HARD_PATH)),
            Easy1 => Blueprint::small(Layout::Walls(EASY_1_WALLS)),
            Easy2 => Blueprint::small(Layout::Walls(EASY_2_WALLS)),
            Medium1 => Blueprint::small(Layout::Walls(MEDIUM_1_WALLS)),
            Medium2 => Blueprint::small(Layout::Walls(MEDIUM_2_WALLS)),
            Hard1 => Blueprint::small(Layout::Walls(HARD_1_WALLS)),
            Hard2 => Blueprint::small(Layout::Walls(HARD_2_WALLS)),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = MazeError;

    /// Case-insensitive; a space or underscore may stand in for the hyphen.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|profile| names_match(profile.name(), s))
            .ok_or(MazeError::InvalidProfile)
    }
}

fn names_match(canonical: &str, candidate: &str) -> bool {
    canonical.len() == candidate.len()
        && canonical.bytes().zip(candidate.bytes()).all(|(a, b)| {
            let b = match b {
                b' ' | b'_' => b'-',
                other => other.to_ascii_lowercase(),
            };
            a == b
        })
}

#[derive(Copy, Clone, Debug)]
enum Layout {
    Walls(&'static [Coord2]),
    Path(&'static [Coord2]),
}

#[derive(Copy, Clone, Debug)]
struct Blueprint {
    size: Coord2,
    start: Coord2,
    goal: Coord2,
    cell_size: u32,
    layout: Layout,
}

impl Blueprint {
    const fn small(layout: Layout) -> Self {
        Self {
            size: (8, 8),
            start: (0, 0),
            goal: (7, 7),
            cell_size: 50,
            layout,
        }
    }

    const fn large(layout: Layout) -> Self {
        Self {
            size: (10, 10),
            start: (0, 0),
            goal: (9, 9),
            cell_size: 40,
            layout,
        }
    }
}

const EASY_PATH: &[Coord2] = &[
    (0, 0), (0, 1), (1, 1), (2, 1), (2, 2), (2, 3), (3, 3), (4, 3), (5, 3), (6, 3),
    (6, 4), (6, 5), (6, 6), (6, 7), (6, 8), (7, 8), (8, 8), (9, 8), (9, 9),
];

const MEDIUM_PATH: &[Coord2] = &[
    (0, 0), (0, 1), (1, 1), (1, 2), (2, 2), (2, 3), (3, 3), (3, 4), (4, 4), (4, 5),
    (5, 5), (5, 6), (6, 6), (6, 7), (7, 7), (7, 8), (8, 8), (8, 9), (9, 9),
];

const HARD_PATH: &[Coord2] = &[
    (0, 0), (1, 0), (1, 1), (2, 1), (3, 1), (3, 2), (3, 3), (3, 4), (4, 4), (5, 4),
    (5, 5), (5, 6), (5, 7), (6, 7), (7, 7), (8, 7), (8, 8), (9, 8), (9, 9),
];

const EASY_1_WALLS: &[Coord2] = &[
    (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7),
    (1, 2), (1, 3), (1, 4), (1, 5), (1, 6), (1, 7),
    (2, 2), (2, 3), (2, 4), (2, 5), (2, 6), (2, 7),
    (3, 2), (3, 3), (3, 4), (3, 5), (3, 6), (3, 7),
    (4, 2), (4, 3), (4, 4), (4, 5), (4, 6), (4, 7),
    (5, 2), (5, 3), (5, 4), (5, 5), (5, 6), (5, 7),
];

const EASY_2_WALLS: &[Coord2] = &[
    (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7),
    (1, 2), (1, 3), (1, 4), (1, 5), (1, 6), (1, 7),
    (2, 2), (2, 3), (2, 4), (2, 5), (2, 6), (2, 7),
    (5, 0), (5, 1), (5, 2), (5, 3), (5, 4), (5, 5),
    (6, 0), (6, 1), (6, 2), (6, 3), (6, 4), (6, 5),
    (7, 0), (7, 1), (7, 2), (7, 3), (7, 4), (7, 5),
];

const MEDIUM_1_WALLS: &[Coord2] = &[
    (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7),
    (1, 0), (1, 3), (1, 4), (1, 5), (1, 6), (1, 7),
    (2, 0), (2, 1), (2, 4), (2, 5), (2, 6), (2, 7),
    (3, 0), (3, 1), (3, 2), (3, 5), (3, 6), (3, 7),
    (4, 0), (4, 1), (4, 2), (4, 3), (4, 6), (4, 7),
    (5, 0), (5, 1), (5, 2), (5, 3), (5, 4), (5, 7),
    (6, 0), (6, 1), (6, 2), (6, 3), (6, 4), (6, 5),
    (7, 0), (7, 1), (7, 2), (7, 3), (7, 4), (7, 5), (7, 6),
];

const MEDIUM_2_WALLS: &[Coord2] = &[
    (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7),
    (1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6), (1, 7),
    (2, 1), (2, 2), (2, 3), (2, 4), (2, 5), (2, 6), (2, 7),
    (3, 3), (3, 4), (3, 5),
    (4, 0), (4, 3), (4, 4),
    (5, 0), (5, 1), (5, 6),
    (6, 0), (6, 1), (6, 2), (6, 5), (6, 6),
    (7, 0), (7, 1), (7, 2), (7, 3), (7, 4), (7, 5), (7, 6),
];

const HARD_1_WALLS: &[Coord2] = &[
    (0, 1), (0, 2), (0, 6), (0, 7),
    (1, 1), (1, 4),
    (2, 1), (2, 3), (2, 4), (2, 5), (2, 6),
    (3, 1), (3, 4),
    (4, 1), (4, 2), (4, 4), (4, 6), (4, 7),
    (5, 1), (5, 4),
    (6, 3), (6, 4), (6, 5), (6, 6),
    (7, 0), (7, 1), (7, 2), (7, 3), (7, 4), (7, 5), (7, 6),
];

const HARD_2_WALLS: &[Coord2] = &[
    (0, 1), (0, 2), (0, 3), (0, 7),
    (1, 1), (1, 2), (1, 3), (1, 5), (1, 7),
    (2, 3), (2, 5),
    (3, 0), (3, 1), (3, 3), (3, 5), (3, 6),
    (4, 3), (4, 6),
    (5, 1), (5, 2), (5, 3), (5, 4), (5, 6),
    (6, 3), (6, 6),
    (7, 0), (7, 1), (7, 5), (7, 6),
];
