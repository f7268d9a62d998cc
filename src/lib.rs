//! Word-chain State Library
//!
//! This crate provides the turn engine for a timed word-chain game: players type
//! dictionary words that start with a prefix taken from the previous answer,
//! against a countdown and a limited number of mistakes.
//!
//! # Overview
//!
//! - **Prefix Selection** - Picks the next prefix from the previous word's suffix,
//!   weighing difficulty against how many unused words still match.
//!
//! - **Validation** - Dictionary, reuse, prefix and length checks for each submission.
//!
//! - **Countdown** - One live timer per session, driven by an injectable scheduler.
//!
//! - **Session State Machine** - Start, submit, tick and game over, with typed events
//!   for the presentation layer.
//!
//! # Design Principles
//!
//! 1. **State machines validate transitions** - Invalid phase changes are rejected
//!    with clear errors.
//!
//! 2. **No ambient state** - A session owns its dictionary, timer, RNG and clock.
//!
//! 3. **No rendering** - The UI subscribes to events; the engine never touches it.
//!
//! 4. **Deterministic when asked** - Randomness and time are both injected.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use wordchain_state::{
//!     DictionaryIndex, GameEvent, GameSession, Language, LettersPool, SessionAssets,
//! };
//!
//! let assets = SessionAssets::new(
//!     Language::En,
//!     DictionaryIndex::from_words(["cat", "catfish", "fishing"]),
//!     LettersPool::new(["c"]).unwrap(),
//! );
//! let mut session = GameSession::with_seed("game-1", assets, 42);
//!
//! // The first prefix always comes from the letters pool
//! let events = session.start().unwrap();
//! assert!(matches!(&events[0], GameEvent::TurnIssued { prefix, .. } if prefix == "C"));
//!
//! session.submit("cat").unwrap();
//! assert_eq!(session.score(), 1);
//!
//! // Drive the countdown from the host loop
//! session.advance(Duration::from_secs(1));
//! assert_eq!(session.time_left(), 14);
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
