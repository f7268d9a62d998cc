//! Session phase state machine.
//!
//! Tracks where a session is and validates transitions.
//!
//! # State Diagram
//!
//! ```text
//! ┌──────────┐  start   ┌───────────────┐  submit   ┌────────────┐
//! │   Idle   │─────────▶│ AwaitingInput │──────────▶│ Evaluating │
//! └──────────┘          └───────────────┘◀──────────└─────┬──────┘
//!      ▲                        │        accept / reject  │
//!      │ reset                  │ expire                  │ exhausted
//!      │                        ▼                         │
//!      │                 ┌──────────────┐                 │
//!      └─────────────────│   GameOver   │◀────────────────┘
//!                        └──────────────┘
//! ```
//!
//! `start` is accepted from every phase: a new session replaces the old one.

use std::fmt;

use serde::Serialize;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    TooManyMistakes,
    TimeExpired,
}

impl GameOverReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooManyMistakes => "too_many_mistakes",
            Self::TimeExpired => "time_expired",
        }
    }
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyMistakes => write!(f, "Too many mistakes"),
            Self::TimeExpired => write!(f, "Time expired"),
        }
    }
}

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No game running
    #[default]
    Idle,

    /// A prefix is issued and the countdown is running
    AwaitingInput,

    /// A submission is being checked
    Evaluating,

    /// Session finished; input is refused until a new start
    GameOver { reason: GameOverReason },
}

impl SessionPhase {
    /// Check if a game is in progress.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::AwaitingInput | Self::Evaluating)
    }

    pub fn is_awaiting_input(&self) -> bool {
        matches!(self, Self::AwaitingInput)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, Self::GameOver { .. })
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        match self {
            Self::GameOver { reason } => Some(*reason),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingInput => "awaiting_input",
            Self::Evaluating => "evaluating",
            Self::GameOver { .. } => "game_over",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::AwaitingInput => write!(f, "AwaitingInput"),
            Self::Evaluating => write!(f, "Evaluating"),
            Self::GameOver { reason } => write!(f, "GameOver({})", reason.as_str()),
        }
    }
}

/// State transition events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Start,
    Submit,
    Accept,
    Reject,
    Exhausted,
    Expire,
    Reset,
}

/// Error when a state transition is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: SessionPhase,
    pub event: PhaseEvent,
    pub reason: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} via {:?}: {}",
            self.from, self.event, self.reason
        )
    }
}

impl std::error::Error for InvalidTransition {}

impl SessionPhase {
    /// Apply an event, returning the new phase or an error.
    pub fn apply(&self, event: PhaseEvent) -> Result<Self, InvalidTransition> {
        use PhaseEvent::*;
        use SessionPhase::*;

        let invalid = |reason: &'static str| InvalidTransition {
            from: *self,
            event,
            reason,
        };

        match (self, event) {
            // Start: any -> AwaitingInput
            (_, Start) => Ok(AwaitingInput),

            // Submit: AwaitingInput -> Evaluating
            (AwaitingInput, Submit) => Ok(Evaluating),
            (Evaluating, Submit) => Err(invalid("Already evaluating a submission")),
            (_, Submit) => Err(invalid("No turn in progress")),

            // Verdicts: Evaluating -> AwaitingInput / GameOver
            (Evaluating, Accept) | (Evaluating, Reject) => Ok(AwaitingInput),
            (Evaluating, Exhausted) => Ok(GameOver {
                reason: GameOverReason::TooManyMistakes,
            }),
            (_, Accept) | (_, Reject) | (_, Exhausted) => {
                Err(invalid("No submission under evaluation"))
            }

            // Expire: AwaitingInput -> GameOver
            (AwaitingInput, Expire) => Ok(GameOver {
                reason: GameOverReason::TimeExpired,
            }),
            (_, Expire) => Err(invalid("No countdown running")),

            // Reset: any but Idle -> Idle
            (Idle, Reset) => Err(invalid("Already idle")),
            (_, Reset) => Ok(Idle),
        }
    }

    /// Apply an event in place, returning error if invalid.
    pub fn apply_mut(&mut self, event: PhaseEvent) -> Result<(), InvalidTransition> {
        *self = self.apply(event)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_phase() {
        let phase = SessionPhase::default();
        assert_eq!(phase, SessionPhase::Idle);
        assert!(!phase.is_playing());
    }

    #[test]
    fn test_turn_cycle() {
        let mut phase = SessionPhase::Idle;

        phase.apply_mut(PhaseEvent::Start).unwrap();
        assert!(phase.is_awaiting_input());

        phase.apply_mut(PhaseEvent::Submit).unwrap();
        assert_eq!(phase, SessionPhase::Evaluating);
        assert!(phase.is_playing());

        phase.apply_mut(PhaseEvent::Reject).unwrap();
        assert!(phase.is_awaiting_input());

        phase.apply_mut(PhaseEvent::Submit).unwrap();
        phase.apply_mut(PhaseEvent::Accept).unwrap();
        assert!(phase.is_awaiting_input());
    }

    #[test]
    fn test_game_over_paths() {
        let exhausted = SessionPhase::Evaluating
            .apply(PhaseEvent::Exhausted)
            .unwrap();
        assert_eq!(
            exhausted.game_over_reason(),
            Some(GameOverReason::TooManyMistakes)
        );

        let expired = SessionPhase::AwaitingInput
            .apply(PhaseEvent::Expire)
            .unwrap();
        assert_eq!(expired.game_over_reason(), Some(GameOverReason::TimeExpired));

        // Terminal until reset or a new start
        assert!(expired.apply(PhaseEvent::Submit).is_err());
        assert!(expired.apply(PhaseEvent::Expire).is_err());
        assert_eq!(expired.apply(PhaseEvent::Reset).unwrap(), SessionPhase::Idle);
        assert_eq!(
            expired.apply(PhaseEvent::Start).unwrap(),
            SessionPhase::AwaitingInput
        );
    }

    #[test]
    fn test_invalid_transitions() {
        let idle = SessionPhase::Idle;

        // Can't submit before starting
        assert!(idle.apply(PhaseEvent::Submit).is_err());

        // Can't expire without a countdown
        assert!(idle.apply(PhaseEvent::Expire).is_err());

        // Can't reset twice
        assert!(idle.apply(PhaseEvent::Reset).is_err());

        // Verdicts need a submission
        let awaiting = SessionPhase::AwaitingInput;
        assert!(awaiting.apply(PhaseEvent::Accept).is_err());
        assert!(awaiting.apply(PhaseEvent::Exhausted).is_err());

        // Timer can't fire into an evaluation
        assert!(SessionPhase::Evaluating.apply(PhaseEvent::Expire).is_err());
    }

    #[test]
    fn test_display() {
        let phase = SessionPhase::GameOver {
            reason: GameOverReason::TimeExpired,
        };
        assert_eq!(format!("{}", phase), "GameOver(time_expired)");

        let err = SessionPhase::Idle.apply(PhaseEvent::Submit).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid transition from Idle via Submit: No turn in progress"
        );
    }
}
