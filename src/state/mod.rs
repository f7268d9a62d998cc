//! State management module for the word-chain turn engine.
//!
//! This module provides the core state types:
//!
//! - `dictionary` - Normalized word set, letters pool, words used this game
//! - `assets` - Loading dictionary and letters per language
//! - `prefix` - Adaptive prefix selection
//! - `validator` - Submission checks and input anchoring
//! - `fails` - Consecutive mistake counter
//! - `timer` - Per-turn countdown over an injectable scheduler
//! - `phase` - Session phase state machine
//! - `events` - Events for the presentation layer
//! - `session` - The game session tying everything together
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                            GameSession                               │
//! │                                                                      │
//! │  submit(word) ──▶ validate ──┬── accepted ──▶ PrefixSelector ──▶ Turn │
//! │                              │                     │                 │
//! │                              │              DictionaryIndex          │
//! │                              │              LettersPool / RNG        │
//! │                              └── rejected ──▶ FailCounter            │
//! │                                                   │ exhausted        │
//! │  on_interval(handle) ──▶ Timer ── expired ──┐     ▼                  │
//! │                                             └──▶ GameOver            │
//! │                                                                      │
//! │  every transition goes through SessionPhase; every change is a       │
//! │  GameEvent returned to the caller and sent to observers              │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

pub mod assets;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod events;
pub mod fails;
pub mod phase;
pub mod prefix;
pub mod rng;
pub mod session;
pub mod timer;
pub mod validator;

// Re-export commonly used types
pub use assets::{AssetSource, FsAssetSource, Language, SessionAssets};
pub use config::GameConfig;
pub use dictionary::{DictionaryIndex, LettersPool, WordsUsed};
pub use error::{AssetError, ConfigError, SessionError};
pub use events::{EventLog, GameEvent, GameObserver};
pub use fails::FailCounter;
pub use phase::{GameOverReason, InvalidTransition, PhaseEvent, SessionPhase};
pub use prefix::{PrefixSelector, Turn};
pub use rng::{GameRng, GameRngState, RandomSource, ScriptedRng};
pub use session::{GameSession, GameState, GameSummary};
pub use timer::{
    ManualScheduler, ScheduleHandle, Scheduler, Timer, TimerSignal, TimerState, TimerTick,
};
pub use validator::{anchor_input, backspace_allowed, validate, Rejection, Verdict};
