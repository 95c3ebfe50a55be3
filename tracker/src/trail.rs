use penmaze_core::PixelPoint;
use std::collections::VecDeque;

pub const DEFAULT_TRAIL_LEN: usize = 1024;

/// One stroke of the pen trail between two consecutive detections.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub from: PixelPoint,
    pub to: PixelPoint,
    pub thickness: u32,
}

/// Bounded history of pen positions, newest first. Frames without a pen are kept as gaps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PenTrail {
    points: VecDeque<Option<PixelPoint>>,
    capacity: usize,
}

impl Default for PenTrail {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TRAIL_LEN)
    }
}

impl PenTrail {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Records the latest sample, dropping the oldest once full.
    pub fn push(&mut self, sample: Option<PixelPoint>) {
        if self.points.len() == self.capacity {
            self.points.pop_back();
        }
        self.points.push_front(sample);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Most recent sample, if the pen was seen in the last frame.
    pub fn latest(&self) -> Option<PixelPoint> {
        self.points.front().copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<PixelPoint>> + '_ {
        self.points.iter().copied()
    }

    /// Strokes joining consecutive detections. Older strokes are thinner.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        let capacity = self.capacity as f64;
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .enumerate()
            .filter_map(move |(i, pair)| match pair {
                (Some(to), Some(from)) => Some(Segment {
                    from: *from,
                    to: *to,
                    thickness: ((capacity / (i + 2) as f64).sqrt() * 2.5) as u32,
                }),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_and_bounded() {
        let mut trail = PenTrail::with_capacity(3);
        for x in 0..5 {
            trail.push(Some((x, 0)));
        }

        assert_eq!(trail.len(), 3);
        assert_eq!(trail.latest(), Some((4, 0)));
        assert_eq!(
            trail.iter().collect::<Vec<_>>(),
            [Some((4, 0)), Some((3, 0)), Some((2, 0))]
        );
    }

    #[test]
    fn gap_hides_latest() {
        let mut trail = PenTrail::default();
        trail.push(Some((1, 1)));
        trail.push(None);

        assert_eq!(trail.latest(), None);
        assert_eq!(trail.capacity(), DEFAULT_TRAIL_LEN);
    }

    #[test]
    fn segments_skip_gaps_and_thin_out() {
        let mut trail = PenTrail::default();
        trail.push(Some((0, 0)));
        trail.push(Some((1, 0)));
        trail.push(None);
        trail.push(Some((2, 0)));
        trail.push(Some((3, 0)));

        let segments: Vec<_> = trail.segments().collect();

        assert_eq!(
            segments,
            [
                Segment {
                    from: (2, 0),
                    to: (3, 0),
                    thickness: 56,
                },
                Segment {
                    from: (0, 0),
                    to: (1, 0),
                    thickness: 35,
                },
            ]
        );
    }

    #[test]
    fn clear_empties() {
        let mut trail = PenTrail::default();
        trail.push(Some((5, 5)));
        trail.clear();

        assert!(trail.is_empty());
        assert_eq!(trail.segments().count(), 0);
    }
}
