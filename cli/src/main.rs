use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use penmaze_core::{KeyedSource, MazeEngine, Profile, RenderSink, Session};
use penmaze_tracker::{
    CaptureLoop, FrameSource, Hsv, HsvRange, ImageSequence, PenTracker, sample_slot,
};
use std::path::PathBuf;
use std::sync::PoisonError;
use std::thread;
use std::time::Duration;

use crate::render::{ConsoleSink, render_maze, summary};
use crate::script::{ScriptStep, parse_script};
use crate::settings::{DEFAULT_TICK_MS, Settings};

mod render;
mod script;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "penmaze", version, about = "Grid maze played with the keyboard or a tracked virtual pen")]
struct Cli {
    /// Settings file (TOML); command-line flags override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in difficulty profiles
    Profiles,
    /// Play from a scripted sequence of key presses
    Play(PlayArgs),
    /// Play by tracking a coloured pen through a sequence of frames
    Track(TrackArgs),
}

#[derive(Args, Debug)]
struct MazeArgs {
    /// Difficulty profile, e.g. "easy" or "medium-2"
    #[arg(short, long, conflicts_with = "level")]
    profile: Option<String>,

    /// Numbered level from the launcher (1-6)
    #[arg(short, long)]
    level: Option<usize>,

    /// Pixel size of one maze cell
    #[arg(long)]
    cell_size: Option<u32>,

    /// Print render notifications as JSON lines
    #[arg(long)]
    events: bool,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    maze: MazeArgs,

    /// Key presses, e.g. "7d 7r" or "down,right,x" (x resets)
    #[arg(short, long)]
    moves: String,
}

#[derive(Args, Debug)]
struct TrackArgs {
    #[command(flatten)]
    maze: MazeArgs,

    /// Directory of frames, played in file-name order
    #[arg(short, long)]
    frames: PathBuf,

    /// Milliseconds between game ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Frames per second to pace playback at; unpaced by default
    #[arg(long)]
    fps: Option<u32>,

    /// Lower HSV bound of the pen colour, "h,s,v"
    #[arg(long)]
    lower: Option<Hsv>,

    /// Upper HSV bound of the pen colour, "h,s,v"
    #[arg(long)]
    upper: Option<Hsv>,

    /// Start the frames over when they run out
    #[arg(long = "loop")]
    looping: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .parse_default_env()
        .init();

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match cli.command {
        Command::Profiles => list_profiles(),
        Command::Play(args) => play(args, &settings),
        Command::Track(args) => track(args, &settings),
    }
}

fn list_profiles() -> Result<()> {
    println!("{:<10} {:>6} {:>5} {:>6} {:>6}", "profile", "size", "cell", "walls", "steps");
    for profile in Profile::ALL {
        let grid = profile.build();
        let (rows, cols) = grid.size();
        let steps = grid
            .shortest_path_len()
            .map_or_else(|| "-".to_owned(), |steps| steps.to_string());
        println!(
            "{:<10} {:>6} {:>5} {:>6} {:>6}",
            profile.name(),
            format!("{rows}x{cols}"),
            profile.default_cell_size(),
            grid.wall_count(),
            steps
        );
    }
    Ok(())
}

fn resolve_profile(args: &MazeArgs, settings: &Settings) -> Result<Profile> {
    if let Some(level) = args.level {
        return Profile::from_level(level).with_context(|| format!("no level {level}"));
    }
    match &args.profile {
        Some(name) => name
            .parse::<Profile>()
            .with_context(|| format!("unknown profile {name:?}")),
        None => Ok(settings.profile.unwrap_or(Profile::Easy)),
    }
}

fn new_session(args: &MazeArgs, settings: &Settings) -> Result<Session<ConsoleSink>> {
    let profile = resolve_profile(args, settings)?;
    let cell_size = args
        .cell_size
        .or(settings.cell_size)
        .unwrap_or_else(|| profile.default_cell_size());
    if cell_size == 0 {
        bail!("cell size must be at least one pixel");
    }

    log::info!("starting {} maze, {} px cells", profile, cell_size);
    let engine = MazeEngine::new(profile.build(), cell_size);
    Ok(Session::new(engine, ConsoleSink::new(args.events)))
}

fn finish(session: &Session<ConsoleSink>) {
    let engine = session.engine();
    print!("{}", render_maze(engine.grid(), engine.player_cell()));
    println!("{}", summary(engine.status(), engine.player_cell()));
}

fn play(args: PlayArgs, settings: &Settings) -> Result<()> {
    let steps = parse_script(&args.moves).context("invalid move script")?;
    let mut session = new_session(&args.maze, settings)?;
    let mut keys = KeyedSource::new();

    for step in steps {
        match step {
            ScriptStep::Move(direction) => {
                keys.push(direction);
                session.tick(&mut keys);
            }
            ScriptStep::Reset => session.reset(),
        }
    }

    finish(&session);
    Ok(())
}

fn track(args: TrackArgs, settings: &Settings) -> Result<()> {
    let mut config = settings.tracker;
    let range = HsvRange::new(
        args.lower.unwrap_or(config.range.lower),
        args.upper.unwrap_or(config.range.upper),
    )?;
    config.range = range;
    let tracker = PenTracker::new(config)?;

    let frames = ImageSequence::open(&args.frames)
        .with_context(|| format!("failed to list frames in {}", args.frames.display()))?
        .looping(args.looping);
    if frames.is_empty() {
        bail!("no image files in {}", args.frames.display());
    }
    log::info!("tracking {} frames from {}", frames.len(), args.frames.display());

    let mut session = new_session(&args.maze, settings)?;
    let pacing = Pacing {
        tick: Duration::from_millis(args.tick_ms.or(settings.tick_ms).unwrap_or(DEFAULT_TICK_MS)),
        frame_interval: args
            .fps
            .filter(|&fps| fps > 0)
            .map(|fps| Duration::from_secs(1) / fps),
    };

    let report = run_tracked(&mut session, tracker, frames, pacing)?;
    log::info!("processed {} frames, pen seen in {}", report.frames, report.detections);

    finish(&session);
    Ok(())
}

#[derive(Copy, Clone, Debug)]
struct Pacing {
    tick: Duration,
    frame_interval: Option<Duration>,
}

/// What the capture thread saw during one tracked game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct TrackReport {
    frames: u64,
    detections: usize,
    strokes: usize,
}

/// Runs the capture thread over `frames` and ticks `session` from the calling thread until
/// the game ends or the frames run out.
fn run_tracked<S, F>(
    session: &mut Session<S>,
    tracker: PenTracker,
    frames: F,
    pacing: Pacing,
) -> Result<TrackReport>
where
    S: RenderSink,
    F: FrameSource + Send + 'static,
{
    let (writer, mut reader) = sample_slot();
    let mut capture = CaptureLoop::new(tracker, writer);
    if let Some(interval) = pacing.frame_interval {
        capture = capture.with_frame_interval(interval);
    }
    let trail = capture.trail();
    let handle = capture.spawn(frames)?;

    loop {
        thread::sleep(pacing.tick);
        // read before ticking so the last published sample still gets its tick
        let capture_done = handle.is_finished();
        session.tick(&mut reader);
        if session.engine().is_finished() || capture_done {
            break;
        }
    }

    handle.stop();
    let processed = handle.join().context("pen capture failed")?;

    let trail = trail.lock().unwrap_or_else(PoisonError::into_inner);
    let report = TrackReport {
        frames: processed,
        detections: trail.iter().flatten().count(),
        strokes: trail.segments().count(),
    };
    log::debug!("pen trail holds {} points in {} strokes", trail.len(), report.strokes);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use image::{Rgb, RgbImage};
    use penmaze_core::{Coord2, EventLog, GameStatus, Grid, PixelPoint, RenderEvent};
    use penmaze_tracker::TrackerConfig;
    use std::fs;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_play() {
        let cli = Cli::try_parse_from(["penmaze", "play", "-p", "hard-2", "-m", "7d 7r", "--events"]).unwrap();

        let Command::Play(args) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(args.maze.profile.as_deref(), Some("hard-2"));
        assert_eq!(args.moves, "7d 7r");
        assert!(args.maze.events);
    }

    #[test]
    fn parses_track_colours() {
        let cli = Cli::try_parse_from([
            "penmaze", "track", "-f", "frames", "--lower", "35,80,40", "--upper", "85,255,255", "--loop",
        ])
        .unwrap();

        let Command::Track(args) = cli.command else {
            panic!("expected track");
        };
        assert_eq!(args.lower, Some(Hsv::new(35, 80, 40)));
        assert!(args.looping);
    }

    #[test]
    fn rejects_bad_colour() {
        assert!(Cli::try_parse_from(["penmaze", "track", "-f", "x", "--lower", "300,0,0"]).is_err());
    }

    #[test]
    fn profile_and_level_conflict() {
        assert!(Cli::try_parse_from(["penmaze", "play", "-p", "easy", "-l", "2", "-m", "d"]).is_err());
    }

    #[test]
    fn resolves_level_then_name_then_settings() {
        let settings = Settings {
            profile: Some(Profile::Medium),
            ..Default::default()
        };
        let maze = |profile: Option<&str>, level| MazeArgs {
            profile: profile.map(str::to_owned),
            level,
            cell_size: None,
            events: false,
        };

        assert_eq!(resolve_profile(&maze(None, Some(4)), &settings).unwrap(), Profile::Medium2);
        assert_eq!(resolve_profile(&maze(Some("easy 2"), None), &settings).unwrap(), Profile::Easy2);
        assert_eq!(resolve_profile(&maze(None, None), &settings).unwrap(), Profile::Medium);
        assert!(resolve_profile(&maze(Some("bogus"), None), &settings).is_err());
        assert!(resolve_profile(&maze(None, Some(9)), &settings).is_err());
    }

    #[test]
    fn scripted_session_reaches_goal() {
        let args = MazeArgs {
            profile: Some("easy-1".into()),
            level: None,
            cell_size: None,
            events: false,
        };
        let mut session = new_session(&args, &Settings::default()).unwrap();
        let mut keys = KeyedSource::new();

        for step in parse_script("7d 7r").unwrap() {
            if let ScriptStep::Move(direction) = step {
                keys.push(direction);
                session.tick(&mut keys);
            }
        }

        assert!(session.engine().is_finished());
        assert_eq!(session.engine().player_cell(), (7, 7));
    }

    /// Writes one 400×400 frame per pen position, a blue square centred on it.
    fn write_frames(name: &str, pens: &[PixelPoint]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("penmaze-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for (i, &(cx, cy)) in pens.iter().enumerate() {
            let frame = RgbImage::from_fn(400, 400, |x, y| {
                if x.abs_diff(cx) <= 5 && y.abs_diff(cy) <= 5 {
                    Rgb([20, 40, 230])
                } else {
                    Rgb([240, 240, 235])
                }
            });
            frame.save(dir.join(format!("frame-{i:02}.png"))).unwrap();
        }
        dir
    }

    fn play_frames(
        name: &str,
        walls: &[Coord2],
        pens: &[PixelPoint],
    ) -> (Session<EventLog>, TrackReport) {
        let dir = write_frames(name, pens);
        let frames = ImageSequence::open(&dir).unwrap();
        let tracker = PenTracker::new(TrackerConfig {
            resize_width: None,
            mirror: false,
            blur_sigma: 0.0,
            ..Default::default()
        })
        .unwrap();
        let grid = Grid::from_walls((8, 8), (0, 0), (7, 7), walls).unwrap();
        let mut session = Session::new(MazeEngine::new(grid, 50), EventLog::new());
        let pacing = Pacing {
            tick: Duration::from_millis(5),
            frame_interval: None,
        };

        let report = run_tracked(&mut session, tracker, frames, pacing).unwrap();
        fs::remove_dir_all(&dir).unwrap();
        (session, report)
    }

    #[test]
    fn tracked_pen_reaches_goal() {
        let (session, report) = play_frames("won", &[(3, 4)], &[(175, 175), (375, 375)]);

        assert_eq!(session.engine().status(), GameStatus::Won);
        assert_eq!(session.engine().player_cell(), (7, 7));
        assert_eq!(
            session.sink().events().last(),
            Some(&RenderEvent::StatusChanged(GameStatus::Won))
        );
        assert_eq!(
            report,
            TrackReport {
                frames: 2,
                detections: 2,
                strokes: 1,
            }
        );
    }

    #[test]
    fn tracked_pen_crossing_a_wall_loses() {
        let (session, report) = play_frames("collision", &[(3, 4)], &[(175, 175), (225, 175)]);

        assert_eq!(session.engine().status(), GameStatus::LostCollision);
        assert_eq!(session.engine().player_cell(), (0, 0));
        assert_eq!(report.frames, 2);
    }

    #[test]
    fn tracking_stops_when_frames_run_out() {
        let (session, report) = play_frames("idle", &[], &[(175, 175), (175, 225)]);

        assert_eq!(session.engine().status(), GameStatus::Running);
        assert_eq!(session.engine().player_cell(), (4, 3));
        assert_eq!(report.strokes, 1);
    }
}
