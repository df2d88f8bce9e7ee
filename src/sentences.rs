use include_dir::{include_dir, Dir};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static SENTENCE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/sentence_sets");

#[derive(Debug, Error)]
pub enum SentenceError {
    #[error("no built-in sentence set named `{0}`")]
    UnknownSet(String),
    #[error("sentence set `{name}` is malformed: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("sentence set `{0}` has no sentences")]
    Empty(String),
    #[error("sentence set `{name}` has an empty sentence at index {index}")]
    EmptySentence { name: String, index: usize },
}

/// Sentence sets shipped inside the binary
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BuiltinSet {
    #[default]
    Japanese,
    English,
}

impl BuiltinSet {
    pub fn load(&self) -> Result<SentenceSet, SentenceError> {
        SentenceSet::builtin(&self.to_string())
    }
}

#[derive(Deserialize)]
struct SentenceFile {
    name: String,
    sentences: Vec<String>,
}

/// Fixed, ordered, non-empty list of candidate sentences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceSet {
    name: String,
    sentences: Vec<String>,
}

impl SentenceSet {
    pub fn new(name: impl Into<String>, sentences: Vec<String>) -> Result<Self, SentenceError> {
        let name = name.into();
        if sentences.is_empty() {
            return Err(SentenceError::Empty(name));
        }
        if let Some(index) = sentences.iter().position(|s| s.is_empty()) {
            return Err(SentenceError::EmptySentence { name, index });
        }
        Ok(Self { name, sentences })
    }

    /// Load one of the embedded `<name>.json` sets
    pub fn builtin(name: &str) -> Result<Self, SentenceError> {
        let contents = SENTENCE_DIR
            .get_file(format!("{name}.json"))
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| SentenceError::UnknownSet(name.to_string()))?;

        let file: SentenceFile =
            serde_json::from_str(contents).map_err(|source| SentenceError::Malformed {
                name: name.to_string(),
                source,
            })?;

        Self::new(file.name, file.sentences)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    // never true, the constructor rejects empty sets
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.sentences.iter().map(String::as_str)
    }

    pub fn contains(&self, sentence: &str) -> bool {
        self.iter().any(|s| s == sentence)
    }

    /// Uniform pick by index; repeats are allowed
    pub fn pick<R: Rng>(&self, rng: &mut R) -> &str {
        &self.sentences[rng.gen_range(0..self.sentences.len())]
    }
}
