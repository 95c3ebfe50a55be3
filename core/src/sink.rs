use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Passive observer of the maze. Gets told what changed, never changes anything.
pub trait RenderSink {
    fn player_cell_changed(&mut self, _cell: Coord2) {}

    fn status_changed(&mut self, _status: GameStatus) {}
}

/// Null sink.
impl RenderSink for () {}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn player_cell_changed(&mut self, cell: Coord2) {
        (**self).player_cell_changed(cell)
    }

    fn status_changed(&mut self, status: GameStatus) {
        (**self).status_changed(status)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderEvent {
    PlayerCellChanged(Coord2),
    StatusChanged(GameStatus),
}

/// Sink that just remembers every notification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<RenderEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<RenderEvent> {
        core::mem::take(&mut self.events)
    }
}

impl RenderSink for EventLog {
    fn player_cell_changed(&mut self, cell: Coord2) {
        self.events.push(RenderEvent::PlayerCellChanged(cell));
    }

    fn status_changed(&mut self, status: GameStatus) {
        self.events.push(RenderEvent::StatusChanged(status));
    }
}
