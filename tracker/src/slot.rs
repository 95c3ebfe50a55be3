use penmaze_core::{InputSample, PixelPoint, PositionSource};
use std::sync::{Arc, Mutex, PoisonError};

/// Creates a single-slot, last-writer-wins channel for pointer samples.
///
/// The capture thread publishes into the [`SampleWriter`]; the tick thread takes from the
/// [`SampleReader`]. There is no queue, so intermediate samples are silently overwritten.
pub fn sample_slot() -> (SampleWriter, SampleReader) {
    let slot = Arc::new(Mutex::new(None));
    (
        SampleWriter { slot: slot.clone() },
        SampleReader { slot },
    )
}

type Slot = Arc<Mutex<Option<PixelPoint>>>;

#[derive(Clone, Debug)]
pub struct SampleWriter {
    slot: Slot,
}

impl SampleWriter {
    /// Replaces whatever is in the slot, including with "no pen visible".
    pub fn publish(&self, sample: Option<PixelPoint>) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = sample;
    }
}

#[derive(Debug)]
pub struct SampleReader {
    slot: Slot,
}

impl SampleReader {
    /// Takes the latest sample and leaves the slot empty.
    pub fn take(&self) -> Option<PixelPoint> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    pub fn peek(&self) -> Option<PixelPoint> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reading the slot as a tracked position source. Never runs dry.
impl PositionSource for SampleReader {
    fn poll(&mut self) -> Option<InputSample> {
        Some(InputSample::Pointer(self.take()))
    }
}
