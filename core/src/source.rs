use alloc::collections::VecDeque;
use serde::{Deserialize, Serialize};

use crate::*;

/// One tick's worth of input for the state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSample {
    /// Discrete key press, applied as a relative step.
    Step(Direction),
    /// Latest tracked pointer position, applied as an absolute placement.
    Pointer(Option<PixelPoint>),
}

/// Anything that can say "where is the pointer now", polled once per tick.
///
/// Implementations must never block; returning `None` means there is nothing to feed this tick.
pub trait PositionSource {
    fn poll(&mut self) -> Option<InputSample>;
}

impl<S: PositionSource + ?Sized> PositionSource for &mut S {
    fn poll(&mut self) -> Option<InputSample> {
        (**self).poll()
    }
}

/// Key events waiting to be applied, one per tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyedSource {
    pending: VecDeque<Direction>,
}

impl KeyedSource {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, direction: Direction) {
        self.pending.push_back(direction);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl Extend<Direction> for KeyedSource {
    fn extend<T: IntoIterator<Item = Direction>>(&mut self, iter: T) {
        self.pending.extend(iter);
    }
}

impl FromIterator<Direction> for KeyedSource {
    fn from_iter<T: IntoIterator<Item = Direction>>(iter: T) -> Self {
        Self {
            pending: iter.into_iter().collect(),
        }
    }
}

impl PositionSource for KeyedSource {
    fn poll(&mut self) -> Option<InputSample> {
        self.pending.pop_front().map(InputSample::Step)
    }
}

/// Adapts a continuous coordinate feed, such as a pen tracker, into a position source.
///
/// Every poll produces a pointer sample; an absent coordinate is a normal result.
pub struct TrackedSource<F> {
    feed: F,
}

impl<F> TrackedSource<F>
where
    F: FnMut() -> Option<PixelPoint>,
{
    pub fn new(feed: F) -> Self {
        Self { feed }
    }
}

impl<F> PositionSource for TrackedSource<F>
where
    F: FnMut() -> Option<PixelPoint>,
{
    fn poll(&mut self) -> Option<InputSample> {
        Some(InputSample::Pointer((self.feed)()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn keyed_source_yields_in_order_then_nothing() {
        let mut source: KeyedSource = [Direction::Down, Direction::Right].into_iter().collect();
        source.push(Direction::Up);

        assert_eq!(source.pending(), 3);
        assert_eq!(source.poll(), Some(InputSample::Step(Direction::Down)));
        assert_eq!(source.poll(), Some(InputSample::Step(Direction::Right)));
        assert_eq!(source.poll(), Some(InputSample::Step(Direction::Up)));
        assert_eq!(source.poll(), None);
    }

    #[test]
    fn tracked_source_forwards_absence() {
        let mut samples = vec![None, Some((10, 20))];
        let mut source = TrackedSource::new(move || samples.pop().flatten());

        assert_eq!(source.poll(), Some(InputSample::Pointer(Some((10, 20)))));
        assert_eq!(source.poll(), Some(InputSample::Pointer(None)));
        assert_eq!(source.poll(), Some(InputSample::Pointer(None)));
    }
}
