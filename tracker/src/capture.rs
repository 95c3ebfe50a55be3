use image::{ImageFormat, RgbImage};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::*;

/// Pen trail shared between the capture thread and whoever draws it.
pub type SharedTrail = Arc<Mutex<PenTrail>>;

/// Where frames come from. `Ok(None)` means the stream has ended.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}

/// Frames from any iterator, mostly for tests and synthetic input.
#[derive(Debug)]
pub struct FrameIter<I>(pub I);

impl<I: Iterator<Item = RgbImage>> FrameSource for FrameIter<I> {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        Ok(self.0.next())
    }
}

/// Image files played back in file-name order, standing in for a camera.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    next: usize,
    looping: bool,
}

impl ImageSequence {
    /// Every file in `dir` whose extension names an image format, sorted by path.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let mut paths = fs::read_dir(dir)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<io::Result<Vec<_>>>()?;
        paths.retain(|path| path.is_file() && ImageFormat::from_path(path).is_ok());
        paths.sort();
        Ok(Self::from_paths(paths))
    }

    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            next: 0,
            looping: false,
        }
    }

    /// Start over from the first frame instead of ending.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        if self.next >= self.paths.len() {
            if !self.looping || self.paths.is_empty() {
                return Ok(None);
            }
            self.next = 0;
        }

        let path = &self.paths[self.next];
        self.next += 1;
        log::trace!("reading frame {}", path.display());
        Ok(Some(image::open(path)?.to_rgb8()))
    }
}

/// Background loop turning frames into pointer samples.
#[derive(Debug)]
pub struct CaptureLoop {
    tracker: PenTracker,
    writer: SampleWriter,
    trail: SharedTrail,
    frame_interval: Option<Duration>,
}

impl CaptureLoop {
    pub fn new(tracker: PenTracker, writer: SampleWriter) -> Self {
        Self {
            tracker,
            writer,
            trail: Default::default(),
            frame_interval: None,
        }
    }

    /// Record samples into an existing trail instead of a private one.
    pub fn with_trail(mut self, trail: SharedTrail) -> Self {
        self.trail = trail;
        self
    }

    /// Sleep between frames, to pace sources that are faster than a camera.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = Some(interval);
        self
    }

    pub fn trail(&self) -> SharedTrail {
        self.trail.clone()
    }

    /// Runs on a dedicated thread until the source ends or [`CaptureHandle::stop`] is called.
    pub fn spawn<F>(self, frames: F) -> Result<CaptureHandle>
    where
        F: FrameSource + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread = thread::Builder::new().name("pen-capture".into()).spawn({
            let stop = stop.clone();
            move || self.run(frames, &stop)
        })?;
        Ok(CaptureHandle { stop, thread })
    }

    fn run(self, mut frames: impl FrameSource, stop: &AtomicBool) -> Result<u64> {
        let mut processed = 0;
        while !stop.load(Ordering::Relaxed) {
            let Some(frame) = frames.next_frame()? else {
                log::debug!("frame source ended after {} frames", processed);
                break;
            };

            let sample = self.tracker.locate(&frame);
            log::trace!("frame {}: pen at {:?}", processed, sample);
            self.trail
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(sample);
            self.writer.publish(sample);
            processed += 1;

            if let Some(interval) = self.frame_interval {
                thread::sleep(interval);
            }
        }
        Ok(processed)
    }
}

#[derive(Debug)]
pub struct CaptureHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<Result<u64>>,
}

impl CaptureHandle {
    /// Asks the loop to finish after the current frame.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Number of frames processed, or the error that ended the loop.
    pub fn join(self) -> Result<u64> {
        self.thread.join().map_err(|_| TrackerError::CaptureThread)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const PAPER: Rgb<u8> = Rgb([240, 240, 235]);

    fn tracker() -> PenTracker {
        PenTracker::new(TrackerConfig {
            resize_width: None,
            mirror: false,
            blur_sigma: 0.0,
            ..Default::default()
        })
        .unwrap()
    }

    fn frame(pen_at: Option<(u32, u32)>) -> RgbImage {
        let mut frame = RgbImage::from_pixel(80, 60, PAPER);
        if let Some((cx, cy)) = pen_at {
            for y in cy - 5..=cy + 5 {
                for x in cx - 5..=cx + 5 {
                    frame.put_pixel(x, y, Rgb([20, 40, 230]));
                }
            }
        }
        frame
    }

    #[test]
    fn processes_every_frame_and_keeps_latest() {
        let (writer, reader) = sample_slot();
        let frames = vec![frame(Some((10, 10))), frame(None), frame(Some((40, 30)))];
        let capture = CaptureLoop::new(tracker(), writer);
        let trail = capture.trail();

        let processed = capture.spawn(FrameIter(frames.into_iter())).unwrap().join().unwrap();

        assert_eq!(processed, 3);
        assert_eq!(reader.take(), Some((40, 30)));
        let trail = trail.lock().unwrap();
        assert_eq!(
            trail.iter().collect::<Vec<_>>(),
            [Some((40, 30)), None, Some((10, 10))]
        );
    }

    #[test]
    fn stop_ends_endless_source() {
        let (writer, _reader) = sample_slot();
        let handle = CaptureLoop::new(tracker(), writer)
            .with_frame_interval(Duration::from_millis(1))
            .spawn(FrameIter(std::iter::repeat_with(|| frame(None))))
            .unwrap();

        thread::sleep(Duration::from_millis(20));
        handle.stop();

        assert!(handle.join().is_ok());
    }

    #[test]
    fn empty_sequence_ends_immediately() {
        let mut frames = ImageSequence::from_paths(Vec::new()).looping(true);

        assert!(frames.is_empty());
        assert!(frames.next_frame().unwrap().is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut frames = ImageSequence::from_paths(vec![PathBuf::from("/nonexistent/frame.png")]);

        assert!(frames.next_frame().is_err());
    }

    #[test]
    fn sequence_reads_directory_in_order_and_loops() {
        let dir = std::env::temp_dir().join(format!("penmaze-frames-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        frame(Some((20, 20))).save(dir.join("b.png")).unwrap();
        frame(Some((60, 40))).save(dir.join("a.png")).unwrap();
        fs::write(dir.join("notes.txt"), "not a frame").unwrap();

        let mut frames = ImageSequence::open(&dir).unwrap().looping(true);
        let tracker = tracker();
        let seen: Vec<_> = (0..3)
            .map(|_| tracker.locate(&frames.next_frame().unwrap().unwrap()))
            .collect();

        fs::remove_dir_all(&dir).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(seen, [Some((60, 40)), Some((20, 20)), Some((60, 40))]);
    }
}
