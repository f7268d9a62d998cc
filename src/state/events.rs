//! Events emitted to the presentation layer.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use super::phase::GameOverReason;
use super::prefix::Turn;
use super::timer::TimerTick;
use super::validator::Rejection;

/// Something the UI should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// New prefix; the input field should be anchored to it
    TurnIssued {
        prefix: String,
        difficulty: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        available: Option<usize>,
    },
    /// Accepted word, as typed
    WordAccepted { word: String },
    FailAdded { fails: u32, reason: Rejection },
    Tick { time_left: u32, is_warning: bool },
    GameOver { reason: GameOverReason, score: usize },
}

impl GameEvent {
    pub fn turn_issued(turn: &Turn) -> Self {
        Self::TurnIssued {
            prefix: turn.prefix.clone(),
            difficulty: turn.difficulty,
            available: turn.available,
        }
    }

    pub fn tick(tick: TimerTick) -> Self {
        Self::Tick {
            time_left: tick.time_left,
            is_warning: tick.is_warning,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Receives every event a session emits, in order.
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> GameObserver for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Shared recorder. Clones see the same log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    /// Drain recorded events.
    pub fn take(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl GameObserver for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
