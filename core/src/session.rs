use crate::*;

/// One game in progress: the state machine plus whoever is drawing it.
///
/// Each [`Session::tick`] reads at most one sample from a [`PositionSource`], feeds it to the
/// [`MazeEngine`] and forwards whatever changed to the [`RenderSink`].
#[derive(Debug)]
pub struct Session<S> {
    engine: MazeEngine,
    sink: S,
}

impl<S: RenderSink> Session<S> {
    /// Notifies the sink of the initial player cell and status.
    pub fn new(engine: MazeEngine, mut sink: S) -> Self {
        sink.player_cell_changed(engine.player_cell());
        sink.status_changed(engine.status());
        Self { engine, sink }
    }

    pub fn engine(&self) -> &MazeEngine {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_parts(self) -> (MazeEngine, S) {
        (self.engine, self.sink)
    }

    pub fn tick(&mut self, source: &mut impl PositionSource) -> MoveOutcome {
        match source.poll() {
            Some(sample) => self.apply(sample),
            None => MoveOutcome::NoChange,
        }
    }

    pub fn apply(&mut self, sample: InputSample) -> MoveOutcome {
        let before = self.engine.player_cell();
        let outcome = match sample {
            InputSample::Step(direction) => self.engine.attempt_move(direction),
            InputSample::Pointer(point) => self.engine.report_pointer_sample(point),
        };
        self.notify(before, outcome);
        outcome
    }

    /// Ticks until the source runs dry. Only meaningful for finite sources such as
    /// [`KeyedSource`]; a tracked source never runs dry.
    pub fn drain(&mut self, source: &mut impl PositionSource) -> MoveOutcome {
        let mut last = MoveOutcome::NoChange;
        while let Some(sample) = source.poll() {
            let outcome = self.apply(sample);
            if outcome.has_update() {
                last = outcome;
            }
        }
        last
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.sink.player_cell_changed(self.engine.player_cell());
        self.sink.status_changed(self.engine.status());
    }

    /// A collision can move the player too, back to the start cell.
    fn notify(&mut self, before: Coord2, outcome: MoveOutcome) {
        let player = self.engine.player_cell();
        if player != before {
            self.sink.player_cell_changed(player);
        }
        if outcome.changed_status() {
            self.sink.status_changed(self.engine.status());
        }
    }
}
