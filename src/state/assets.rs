//! Loading dictionary and letters assets.
//!
//! A missing or broken dictionary degrades the game (no word ever validates) but
//! does not stop it. Missing letters are fatal: the prefix fallback cannot run
//! without them.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use super::dictionary::{DictionaryIndex, LettersPool};
use super::error::AssetError;

/// Supported dictionary languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }

    pub fn dictionary_file(&self) -> &'static str {
        match self {
            Self::Es => "dictionary-es.json",
            Self::En => "dictionary-en.json",
        }
    }

    pub fn letters_file(&self) -> &'static str {
        match self {
            Self::Es => "letters-es.json",
            Self::En => "letters-en.json",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where dictionary and letters come from.
pub trait AssetSource {
    fn load_dictionary(&self, language: Language) -> Result<DictionaryIndex, AssetError>;

    fn load_letters(&self, language: Language) -> Result<LettersPool, AssetError>;
}

/// Reads the JSON asset files from a directory.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, file: &str) -> Result<(PathBuf, String), AssetError> {
        let path = self.root.join(file);
        let contents = std::fs::read_to_string(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        Ok((path, contents))
    }
}

impl AssetSource for FsAssetSource {
    fn load_dictionary(&self, language: Language) -> Result<DictionaryIndex, AssetError> {
        let (path, contents) = self.read(language.dictionary_file())?;
        let definitions: Map<String, Value> =
            serde_json::from_str(&contents).map_err(|source| AssetError::Parse { path, source })?;
        Ok(DictionaryIndex::from_definitions(&definitions))
    }

    fn load_letters(&self, language: Language) -> Result<LettersPool, AssetError> {
        let (path, contents) = self.read(language.letters_file())?;
        let letters: Vec<String> =
            serde_json::from_str(&contents).map_err(|source| AssetError::Parse { path, source })?;
        LettersPool::new(letters)
    }
}

/// Everything a session needs before the first turn.
#[derive(Debug, Clone)]
pub struct SessionAssets {
    pub language: Language,
    pub dictionary: DictionaryIndex,
    pub letters: LettersPool,
}

impl SessionAssets {
    pub fn new(language: Language, dictionary: DictionaryIndex, letters: LettersPool) -> Self {
        Self {
            language,
            dictionary,
            letters,
        }
    }

    /// Load both assets for `language`.
    ///
    /// A dictionary failure is logged and replaced by an empty dictionary.
    /// A letters failure is returned.
    #[instrument(skip(source))]
    pub fn load<S: AssetSource + ?Sized>(
        source: &S,
        language: Language,
    ) -> Result<Self, AssetError> {
        let letters = source.load_letters(language)?;
        let dictionary = match source.load_dictionary(language) {
            Ok(dictionary) => dictionary,
            Err(err) => {
                warn!(
                    %language,
                    error = %err,
                    "Dictionary unavailable, continuing with an empty one"
                );
                DictionaryIndex::empty()
            }
        };
        info!(%language, words = dictionary.len(), letters = letters.len(), "Language loaded");
        Ok(Self::new(language, dictionary, letters))
    }
}
