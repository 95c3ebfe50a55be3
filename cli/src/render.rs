use penmaze_core::{Coord2, GameStatus, Grid, RenderEvent, RenderSink};

/// Reports render notifications on the console, either as log lines or as JSON lines on stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    json: bool,
}

impl ConsoleSink {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn emit(&mut self, event: RenderEvent) {
        if !self.json {
            log::info!("{:?}", event);
            return;
        }
        match serde_json::to_string(&event) {
            Ok(line) => println!("{line}"),
            Err(err) => log::warn!("failed to encode {:?}: {}", event, err),
        }
    }
}

impl RenderSink for ConsoleSink {
    fn player_cell_changed(&mut self, cell: Coord2) {
        self.emit(RenderEvent::PlayerCellChanged(cell));
    }

    fn status_changed(&mut self, status: GameStatus) {
        self.emit(RenderEvent::StatusChanged(status));
    }
}

/// Text picture of the maze: `#` wall, `.` open, `S` start, `G` goal, `@` player.
pub fn render_maze(grid: &Grid, player: Coord2) -> String {
    let mut out = String::new();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = (row, col);
            let glyph = if cell == player {
                '@'
            } else if cell == grid.goal() {
                'G'
            } else if cell == grid.start() {
                'S'
            } else if grid[cell].is_wall() {
                '#'
            } else {
                '.'
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

/// One-line summary printed after a game.
pub fn summary(status: GameStatus, player: Coord2) -> String {
    let verdict = match status {
        GameStatus::Running => "still running",
        GameStatus::Won => "goal reached",
        GameStatus::LostCollision => "hit a wall",
    };
    format!("{verdict}, player at ({}, {})", player.0, player.1)
}
