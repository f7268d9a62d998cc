//! Adaptive prefix selection.
//!
//! The next prefix is a suffix of the previous word. Longer suffixes are harder, so
//! the selector starts at the current difficulty and relaxes the suffix length one
//! step at a time. Each candidate is accepted with probability
//! `available / max_count_for_full_probability`, where `available` is the number of
//! unused dictionary words starting with it. When no candidate survives, the turn
//! starts from a random letter and difficulty drops back to zero.
//!
//! ```text
//! previous = "CATFISH", difficulty = 2.4
//!
//!   2.4 -> "SH"  (count 3,  p = 0.03)  draw 0.70  reject
//!   2.2 -> "SH"  (count 3,  p = 0.03)  draw 0.01  accept -> Turn { "SH", 2.4 }
//! ```

use serde::Serialize;
use tracing::debug;

use super::config::{GameConfig, DEFAULT_DIFFICULTY_STEP, DEFAULT_MAX_COUNT_FOR_FULL_PROBABILITY};
use super::dictionary::{DictionaryIndex, LettersPool, WordsUsed};
use super::error::ConfigError;
use super::rng::RandomSource;

/// One issued prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    /// Uppercase prefix the next word must start with
    pub prefix: String,
    /// Difficulty carried into the next selection
    pub difficulty: f64,
    /// Unused words matching the prefix, when it came from a suffix draw
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<usize>,
}

impl Turn {
    pub fn prefix_len(&self) -> usize {
        self.prefix.chars().count()
    }

    /// True when the prefix came from the letters pool.
    pub fn is_fallback(&self) -> bool {
        self.available.is_none()
    }
}

/// Chooses the prefix for each turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrefixSelector {
    max_count_for_full_probability: u32,
    difficulty_step: f64,
}

impl Default for PrefixSelector {
    fn default() -> Self {
        Self {
            max_count_for_full_probability: DEFAULT_MAX_COUNT_FOR_FULL_PROBABILITY,
            difficulty_step: DEFAULT_DIFFICULTY_STEP,
        }
    }
}

impl PrefixSelector {
    /// The relaxation loop only terminates for a finite, positive step.
    pub fn new(
        max_count_for_full_probability: u32,
        difficulty_step: f64,
    ) -> Result<Self, ConfigError> {
        if !difficulty_step.is_finite() || difficulty_step <= 0.0 {
            return Err(ConfigError::new("difficulty_step must be a positive number"));
        }
        if max_count_for_full_probability == 0 {
            return Err(ConfigError::new("max_count_for_full_probability must be positive"));
        }
        Ok(Self {
            max_count_for_full_probability,
            difficulty_step,
        })
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        Self::new(config.max_count_for_full_probability, config.difficulty_step)
    }

    pub fn difficulty_step(&self) -> f64 {
        self.difficulty_step
    }

    /// Select the next turn.
    ///
    /// The returned difficulty is `difficulty` unchanged when a suffix is accepted,
    /// even if a shorter suffix was used, and `0.0` on fallback.
    pub fn select_next<R: RandomSource + ?Sized>(
        &self,
        previous_word: Option<&str>,
        difficulty: f64,
        dictionary: &DictionaryIndex,
        used: &WordsUsed,
        letters: &LettersPool,
        rng: &mut R,
    ) -> Turn {
        if let Some(word) = previous_word {
            let chars: Vec<char> = word.chars().collect();
            let mut current = difficulty.min(chars.len() as f64);

            while current > 0.0 {
                let slice_len = (current.floor() as usize).max(1).min(chars.len());
                let suffix: String = chars[chars.len() - slice_len..]
                    .iter()
                    .collect::<String>()
                    .to_uppercase();
                let count = dictionary.count_available(&suffix, used);
                let probability = count as f64 / self.max_count_for_full_probability as f64;
                let draw = rng.next_f64();

                // Zero matches never accept, not even on a 0.0 draw; the draw is still spent
                if count > 0 && draw <= probability {
                    debug!(%suffix, count, difficulty, current, "Suffix accepted");
                    return Turn {
                        prefix: suffix,
                        difficulty,
                        available: Some(count),
                    };
                }

                current -= self.difficulty_step;
            }
        }

        let index = rng.pick_index(letters.len());
        let prefix = letters.get_upper(index).unwrap_or_default();
        debug!(%prefix, "Falling back to a random letter");
        Turn {
            prefix,
            difficulty: 0.0,
            available: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::rng::{GameRng, ScriptedRng};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn make_dictionary() -> DictionaryIndex {
        DictionaryIndex::from_words(["CAT", "CATFISH", "FISHING"])
    }

    fn make_letters() -> LettersPool {
        LettersPool::new(["a", "b", "c"]).unwrap()
    }

    #[test]
    fn test_first_turn_uses_fallback() {
        let selector = PrefixSelector::default();
        let mut rng = ScriptedRng::new().with_picks([1]);

        let turn = selector.select_next(
            None,
            3.0,
            &make_dictionary(),
            &WordsUsed::new(),
            &make_letters(),
            &mut rng,
        );

        assert_eq!(
            turn,
            Turn {
                prefix: "B".to_string(),
                difficulty: 0.0,
                available: None,
            }
        );
        // No acceptance draws on the first turn
        assert!(turn.is_fallback());
    }

    #[test]
    fn test_no_matches_falls_back() {
        // Nothing starts with "T", so no draw can accept
        let selector = PrefixSelector::default();
        let mut rng = ScriptedRng::new().with_draws([0.0, 0.0]).with_picks([2]);

        let turn = selector.select_next(
            Some("CAT"),
            0.2,
            &make_dictionary(),
            &WordsUsed::new(),
            &make_letters(),
            &mut rng,
        );

        assert_eq!(turn.prefix, "C");
        assert_eq!(turn.difficulty, 0.0);
        // 0.2 - 0.2 == 0.0 ends the loop after a single draw
        assert_eq!(rng.remaining_draws(), 1);
    }

    #[test]
    fn test_accepts_suffix_and_keeps_difficulty() {
        let selector = PrefixSelector::default();
        // "FISH" has one match: p = 0.01
        let mut rng = ScriptedRng::new().with_draws([0.005]);

        let turn = selector.select_next(
            Some("catfish"),
            4.0,
            &make_dictionary(),
            &WordsUsed::new(),
            &make_letters(),
            &mut rng,
        );

        assert_eq!(turn.prefix, "FISH");
        assert_eq!(turn.difficulty, 4.0);
        assert_eq!(turn.available, Some(1));
    }

    #[test]
    fn test_relaxes_to_shorter_suffix() {
        let dict = DictionaryIndex::from_words(["HAT", "HOT", "TOP", "TAP"]);
        let selector = PrefixSelector::new(2, 0.2).unwrap();
        // "AT" has no matches; at 1.8 the slice length drops to 1 ("T", 2 matches)
        let mut rng = ScriptedRng::new().with_draws([0.0, 0.0]);

        let turn = selector.select_next(
            Some("hat"),
            2.0,
            &dict,
            &WordsUsed::new(),
            &make_letters(),
            &mut rng,
        );

        assert_eq!(turn.prefix, "T");
        assert_eq!(turn.difficulty, 2.0);
        assert_eq!(turn.available, Some(2));
    }

    #[test]
    fn test_difficulty_clamped_to_word_length() {
        let dict = DictionaryIndex::from_words(["CAT", "CATS", "CAB"]);
        let selector = PrefixSelector::new(1, 0.2).unwrap();
        let mut rng = ScriptedRng::new().with_draws([0.0]);

        let turn = selector.select_next(
            Some("CA"),
            10.0,
            &dict,
            &WordsUsed::new(),
            &make_letters(),
            &mut rng,
        );

        assert_eq!(turn.prefix, "CA");
        assert_eq!(turn.difficulty, 10.0);
    }

    #[test]
    fn test_used_words_lower_the_count() {
        let selector = PrefixSelector::default();
        let mut used = WordsUsed::new();
        used.insert("FISHING");

        let mut rng = ScriptedRng::new().with_draws([0.0; 32]).with_picks([0]);
        let turn = selector.select_next(
            Some("FISH"),
            4.0,
            &make_dictionary(),
            &used,
            &make_letters(),
            &mut rng,
        );

        // Every suffix of FISH has zero unused matches
        assert!(turn.is_fallback());
        assert_eq!(turn.prefix, "A");
    }

    #[test]
    fn test_full_probability_always_accepts() {
        let words: Vec<String> = (0..150).map(|i| format!("S{}", i)).collect();
        let dict = DictionaryIndex::from_words(&words);
        let selector = PrefixSelector::default();
        let mut rng = ScriptedRng::new().with_draws([0.999]);

        let turn = selector.select_next(
            Some("BUS"),
            1.0,
            &dict,
            &WordsUsed::new(),
            &make_letters(),
            &mut rng,
        );

        assert_eq!(turn.prefix, "S");
        assert_eq!(turn.available, Some(150));
    }

    #[test]
    fn test_rejects_step_that_cannot_relax() {
        assert!(PrefixSelector::new(100, 0.0).is_err());
        assert!(PrefixSelector::new(100, -0.2).is_err());
        assert!(PrefixSelector::new(100, f64::NAN).is_err());
        assert!(PrefixSelector::new(100, f64::INFINITY).is_err());
        assert!(PrefixSelector::new(0, 0.2).is_err());

        let config = GameConfig {
            difficulty_step: 0.0,
            ..GameConfig::default()
        };
        let err = PrefixSelector::from_config(&config).unwrap_err();
        assert!(err.message.contains("difficulty_step"));
    }

    #[test]
    fn test_smallest_step_still_terminates() {
        let selector = PrefixSelector::new(100, 1e-3).unwrap();
        // Nothing matches "CAT" suffixes, so every draw rejects until the loop runs out
        let mut rng = ScriptedRng::new().with_draws([0.0; 4000]).with_picks([0]);

        let turn = selector.select_next(
            Some("CAT"),
            1.0,
            &DictionaryIndex::from_words(["DOG"]),
            &WordsUsed::new(),
            &make_letters(),
            &mut rng,
        );

        assert!(turn.is_fallback());
        assert_eq!(turn.prefix, "A");
    }

    #[test]
    fn test_default_matches_default_config() {
        assert_eq!(
            PrefixSelector::default(),
            PrefixSelector::from_config(&GameConfig::default()).unwrap()
        );
    }

    proptest! {
        #[test]
        fn prop_prefix_never_longer_than_previous_word(
            word in "[a-e]{1,8}",
            difficulty in 0.0f64..20.0,
            seed in any::<u64>(),
        ) {
            let dict = DictionaryIndex::from_words([
                "ABBA", "BEAD", "DEED", "CAB", "ACE", "BADE", "EBB", "DAB",
            ]);
            let selector = PrefixSelector::new(2, 0.2).unwrap();
            let mut rng = GameRng::new(seed);

            let turn = selector.select_next(
                Some(&word),
                difficulty,
                &dict,
                &WordsUsed::new(),
                &make_letters(),
                &mut rng,
            );

            prop_assert!(turn.prefix_len() <= word.chars().count());
            prop_assert!(turn.prefix_len() >= 1);
            if turn.is_fallback() {
                prop_assert_eq!(turn.difficulty, 0.0);
                prop_assert!(["A", "B", "C"].contains(&turn.prefix.as_str()));
            } else {
                prop_assert_eq!(turn.difficulty, difficulty);
                prop_assert!(word.to_uppercase().ends_with(&turn.prefix));
            }
        }
    }
}
