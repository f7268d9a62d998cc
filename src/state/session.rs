//! Game session: the turn engine.
//!
//! A [`GameSession`] owns everything one game needs (assets, state, countdown,
//! randomness, clock) and exposes three handlers: [`GameSession::start`],
//! [`GameSession::submit`] and [`GameSession::on_interval`]. Each handler runs to
//! completion, returns the events it produced and forwards them to subscribed
//! observers in the same order.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::assets::{AssetSource, Language, SessionAssets};
use super::config::GameConfig;
use super::dictionary::WordsUsed;
use super::error::{ConfigError, SessionError};
use super::events::{GameEvent, GameObserver};
use super::fails::FailCounter;
use super::phase::{GameOverReason, PhaseEvent, SessionPhase};
use super::prefix::{PrefixSelector, Turn};
use super::rng::{GameRng, RandomSource};
use super::timer::{ManualScheduler, ScheduleHandle, Scheduler, Timer, TimerSignal, TimerState};
use super::validator::{validate, Verdict};

/// Per-game mutable state.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    words_used: WordsUsed,
    current_turn: Option<Turn>,
    difficulty: f64,
    fails: FailCounter,
    is_playing: bool,
}

impl GameState {
    fn fresh(max_fails: u32) -> Self {
        Self {
            words_used: WordsUsed::new(),
            current_turn: None,
            difficulty: 0.0,
            fails: FailCounter::new(max_fails),
            is_playing: true,
        }
    }

    pub fn words_used(&self) -> &WordsUsed {
        &self.words_used
    }

    pub fn current_turn(&self) -> Option<&Turn> {
        self.current_turn.as_ref()
    }

    /// Prefix of the current turn, empty before the first turn.
    pub fn current_prefix(&self) -> &str {
        self.current_turn
            .as_ref()
            .map(|t| t.prefix.as_str())
            .unwrap_or("")
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn fails(&self) -> u32 {
        self.fails.count()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }
}

/// Final result of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub session_id: String,
    pub language: Language,
    pub reason: GameOverReason,
    pub score: usize,
    /// Accepted words as typed, in order
    pub words: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// One playable game.
pub struct GameSession<R = GameRng, S = ManualScheduler> {
    /// Unique session ID
    id: String,

    config: GameConfig,
    selector: PrefixSelector,
    assets: SessionAssets,

    /// Current phase
    phase: SessionPhase,

    state: GameState,
    timer: Timer,
    rng: R,
    scheduler: S,

    /// Accepted words as typed
    history: Vec<String>,

    observers: Vec<Box<dyn GameObserver>>,

    /// When the current game started
    started_at: Option<DateTime<Utc>>,

    /// When the current game ended
    ended_at: Option<DateTime<Utc>>,
}

impl<R, S> fmt::Debug for GameSession<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("timer", &self.timer)
            .field("history", &self.history)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl GameSession<GameRng, ManualScheduler> {
    /// Session with default config, a seeded RNG and a virtual clock.
    pub fn with_seed(id: impl Into<String>, assets: SessionAssets, seed: u64) -> Self {
        Self::assemble(
            id.into(),
            GameConfig::default(),
            PrefixSelector::default(),
            assets,
            GameRng::new(seed),
            ManualScheduler::new(),
        )
    }
}

impl<R: RandomSource> GameSession<R, ManualScheduler> {
    /// Move the virtual clock forward and handle every firing that fell due.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        let due = self.scheduler.advance(elapsed);
        let mut events = Vec::new();
        for handle in due {
            events.extend(self.on_interval(handle));
        }
        events
    }
}

impl<R: RandomSource, S: Scheduler> GameSession<R, S> {
    /// Create an idle session.
    ///
    /// Fails when `config` does not describe a playable game.
    pub fn new(
        id: impl Into<String>,
        config: GameConfig,
        assets: SessionAssets,
        rng: R,
        scheduler: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let selector = PrefixSelector::from_config(&config)?;
        Ok(Self::assemble(id.into(), config, selector, assets, rng, scheduler))
    }

    fn assemble(
        id: String,
        config: GameConfig,
        selector: PrefixSelector,
        assets: SessionAssets,
        rng: R,
        scheduler: S,
    ) -> Self {
        Self {
            id,
            selector,
            state: GameState {
                fails: FailCounter::new(config.max_fails),
                ..GameState::default()
            },
            config,
            assets,
            phase: SessionPhase::Idle,
            timer: Timer::new(),
            rng,
            scheduler,
            history: Vec::new(),
            observers: Vec::new(),
            started_at: None,
            ended_at: None,
        }
    }

    /// Register an observer for all future events.
    pub fn subscribe(&mut self, observer: impl GameObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Start a new game, replacing any game in progress.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn start(&mut self) -> Result<Vec<GameEvent>, SessionError> {
        self.timer.cancel(&mut self.scheduler);
        self.phase.apply_mut(PhaseEvent::Start)?;

        self.state = GameState::fresh(self.config.max_fails);
        self.history.clear();
        self.started_at = Some(Utc::now());
        self.ended_at = None;

        info!(
            language = %self.assets.language,
            words = self.assets.dictionary.len(),
            "Starting game"
        );

        let mut events = Vec::new();
        self.issue_turn(None, 0.0, &mut events);
        Ok(events)
    }

    /// Swap in new assets (e.g. another language) and start.
    pub fn restart(&mut self, assets: SessionAssets) -> Result<Vec<GameEvent>, SessionError> {
        self.assets = assets;
        self.start()
    }

    /// Load assets from `source` and start.
    ///
    /// Fails only when the letters pool is unavailable.
    pub fn start_with<A: AssetSource + ?Sized>(
        &mut self,
        source: &A,
        language: Language,
    ) -> Result<Vec<GameEvent>, SessionError> {
        let assets = SessionAssets::load(source, language)?;
        self.restart(assets)
    }

    /// Submit a word for the current turn.
    ///
    /// Rejections are normal events; an `Err` means no turn was awaiting input.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn submit(&mut self, raw_word: &str) -> Result<Vec<GameEvent>, SessionError> {
        if !self.phase.is_awaiting_input() {
            return Err(SessionError::NotPlaying { phase: self.phase });
        }

        let word = raw_word.trim();
        self.phase.apply_mut(PhaseEvent::Submit)?;

        let verdict = validate(
            word,
            self.state.current_prefix(),
            &self.state.words_used,
            &self.assets.dictionary,
        );

        let mut events = Vec::new();
        match verdict {
            Verdict::Accepted => {
                self.state.words_used.insert(word);
                self.history.push(word.to_string());
                self.state.fails.reset();
                self.phase.apply_mut(PhaseEvent::Accept)?;

                debug!(%word, score = self.score(), "Word accepted");
                self.emit(
                    GameEvent::WordAccepted {
                        word: word.to_string(),
                    },
                    &mut events,
                );

                let difficulty = self.state.difficulty + self.config.difficulty_step;
                self.issue_turn(Some(word), difficulty, &mut events);
            }
            Verdict::Rejected(reason) => {
                let exhausted = self.state.fails.increment();
                debug!(%word, %reason, fails = self.state.fails.count(), "Word rejected");
                self.emit(
                    GameEvent::FailAdded {
                        fails: self.state.fails.count(),
                        reason,
                    },
                    &mut events,
                );

                if exhausted {
                    self.phase.apply_mut(PhaseEvent::Exhausted)?;
                    self.finish(GameOverReason::TooManyMistakes, &mut events);
                } else {
                    self.phase.apply_mut(PhaseEvent::Reject)?;
                }
            }
        }

        Ok(events)
    }

    /// Handle a scheduler firing. Stale handles produce no events.
    #[instrument(level = "trace", skip(self), fields(session_id = %self.id))]
    pub fn on_interval(&mut self, handle: ScheduleHandle) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.phase.is_awaiting_input() {
            return events;
        }

        let Some(signal) = self.timer.on_interval(&mut self.scheduler, handle) else {
            return events;
        };

        self.emit(GameEvent::tick(signal.tick()), &mut events);
        if let TimerSignal::Expired(_) = signal {
            if self.phase.apply_mut(PhaseEvent::Expire).is_ok() {
                self.finish(GameOverReason::TimeExpired, &mut events);
            }
        }
        events
    }

    /// Abandon or clear the session and return to idle.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.phase.apply_mut(PhaseEvent::Reset)?;
        self.timer.cancel(&mut self.scheduler);
        self.state = GameState {
            fails: FailCounter::new(self.config.max_fails),
            ..GameState::default()
        };
        self.history.clear();
        self.started_at = None;
        self.ended_at = None;
        Ok(())
    }

    fn issue_turn(
        &mut self,
        previous_word: Option<&str>,
        difficulty: f64,
        events: &mut Vec<GameEvent>,
    ) {
        let turn = self.selector.select_next(
            previous_word,
            difficulty,
            &self.assets.dictionary,
            &self.state.words_used,
            &self.assets.letters,
            &mut self.rng,
        );
        debug!(prefix = %turn.prefix, difficulty = turn.difficulty, "Turn issued");

        self.state.difficulty = turn.difficulty;
        let event = GameEvent::turn_issued(&turn);
        self.state.current_turn = Some(turn);
        self.emit(event, events);

        let tick = self.timer.start(
            &mut self.scheduler,
            self.config.time_limit_secs,
            self.config.timer_warning_secs,
            self.config.tick_interval(),
        );
        self.emit(GameEvent::tick(tick), events);
    }

    fn finish(&mut self, reason: GameOverReason, events: &mut Vec<GameEvent>) {
        self.timer.cancel(&mut self.scheduler);
        self.state.is_playing = false;
        self.ended_at = Some(Utc::now());

        let score = self.score();
        info!(%reason, score, "Game over");
        self.emit(GameEvent::GameOver { reason, score }, events);
    }

    fn emit(&mut self, event: GameEvent, events: &mut Vec<GameEvent>) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
        events.push(event);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn assets(&self) -> &SessionAssets {
        &self.assets
    }

    pub fn current_turn(&self) -> Option<&Turn> {
        self.state.current_turn()
    }

    pub fn fails(&self) -> u32 {
        self.state.fails()
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn time_left(&self) -> u32 {
        self.timer.time_left()
    }

    /// Number of accepted words.
    pub fn score(&self) -> usize {
        self.state.words_used.len()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Result of the finished game, if it has ended.
    pub fn summary(&self) -> Option<GameSummary> {
        let reason = self.phase.game_over_reason()?;
        Some(GameSummary {
            session_id: self.id.clone(),
            language: self.assets.language,
            reason,
            score: self.score(),
            words: self.history.clone(),
            started_at: self.started_at,
            ended_at: self.ended_at,
        })
    }

    /// Convert session state to JSON snapshot.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "session_id": self.id,
            "status": self.phase.as_str(),
            "language": self.assets.language.as_str(),
            "prefix": self.state.current_prefix(),
            "difficulty": self.state.difficulty,
            "fails": self.state.fails(),
            "max_fails": self.config.max_fails,
            "time_left": self.timer.time_left(),
            "score": self.score(),
            "words": self.history,
            "game_over_reason": self.phase.game_over_reason().map(|r| r.as_str()),
            "started_at": self.started_at.map(|t| t.to_rfc3339()),
            "ended_at": self.ended_at.map(|t| t.to_rfc3339())
        })
    }
}
