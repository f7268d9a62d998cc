//! Submission checks and prefix anchoring for the input field.

use std::fmt;

use serde::Serialize;

use super::dictionary::{DictionaryIndex, WordsUsed};

/// Why a submission was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    NotInDictionary,
    AlreadyUsed,
    WrongPrefix,
    TooShort,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInDictionary => "not_in_dictionary",
            Self::AlreadyUsed => "already_used",
            Self::WrongPrefix => "wrong_prefix",
            Self::TooShort => "too_short",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Check a raw submission.
///
/// Accepted iff the uppercased word is in the dictionary, not yet used, starts
/// with `prefix`, and is longer than one character. The length rule is absolute,
/// not relative to the prefix. The first failing check is reported.
pub fn validate(
    raw_word: &str,
    prefix: &str,
    used: &WordsUsed,
    dictionary: &DictionaryIndex,
) -> Verdict {
    let word = raw_word.to_uppercase();

    if !dictionary.contains(&word) {
        return Verdict::Rejected(Rejection::NotInDictionary);
    }
    if used.contains(&word) {
        return Verdict::Rejected(Rejection::AlreadyUsed);
    }
    if !word.starts_with(prefix) {
        return Verdict::Rejected(Rejection::WrongPrefix);
    }
    if word.chars().count() <= 1 {
        return Verdict::Rejected(Rejection::TooShort);
    }
    Verdict::Accepted
}

/// Normalize the input field so it always begins with `prefix`.
///
/// The text is uppercased. If the prefix was edited away, the first remaining
/// occurrence of it is removed and the prefix is put back in front.
pub fn anchor_input(prefix: &str, raw: &str) -> String {
    let value = raw.to_uppercase();
    if value.starts_with(prefix) {
        return value;
    }

    let rebuilt = format!("{}{}", prefix, value.replacen(prefix, "", 1));
    if rebuilt.starts_with(prefix) {
        rebuilt
    } else {
        prefix.to_string()
    }
}

/// Whether a backspace at the given selection may delete text.
///
/// A collapsed caret inside or right after the prefix would eat into it.
pub fn backspace_allowed(prefix: &str, selection_start: usize, selection_end: usize) -> bool {
    selection_start > prefix.chars().count() || selection_start != selection_end
}
