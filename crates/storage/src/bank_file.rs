//! Question bank files.
//!
//! A bank file is JSON shaped as
//! `{ meta: { course, edition?, chapters }, questions: [ { id, ch, type, q, opts?, ans, exp } ] }`.
//! Records here mirror that shape; conversion into `QuestionBank` validates
//! every question.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quiz_core::model::{
    BankError, BankMeta, BankName, ChapterKey, Question, QuestionBank, QuestionError, QuestionId,
    QuestionKind, QuestionType,
};

/// Errors raised while reading or validating a bank file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid bank json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error("invalid question bank {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: Box<BankLoadError>,
    },

    #[error("no question bank found (tried {})", display_paths(.tried))]
    NotFound { tried: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Wire shape of a whole bank file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankFile {
    pub meta: MetaRecord,
    pub questions: Vec<QuestionRecord>,
}

/// Wire shape of `meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRecord {
    pub course: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    #[serde(default)]
    pub chapters: BTreeMap<String, String>,
}

/// Wire shape of one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub ch: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub q: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opts: Option<Vec<String>>,
    pub ans: String,
    #[serde(default)]
    pub exp: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        let opts = match question.kind() {
            QuestionKind::MultipleChoice { options, .. } => Some(options.clone()),
            QuestionKind::TrueFalse { .. } => None,
        };
        Self {
            id: question.id().to_string(),
            ch: question.chapter().to_string(),
            kind: question.question_type().tag().to_owned(),
            q: question.prompt().to_owned(),
            opts,
            ans: question.correct_answer(),
            exp: question.explanation().to_owned(),
        }
    }

    /// Convert the record into a validated domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the type tag is unknown or the answer does
    /// not fit the question type.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        let id = QuestionId::new(self.id.trim());
        let chapter = ChapterKey::new(self.ch.trim());
        match QuestionType::parse_tag(&self.kind) {
            Some(QuestionType::MultipleChoice) => Question::multiple_choice(
                id,
                chapter,
                self.q,
                self.opts.unwrap_or_default(),
                &self.ans,
                self.exp,
            ),
            Some(QuestionType::TrueFalse) => {
                Question::true_false(id, chapter, self.q, &self.ans, self.exp)
            }
            None => Err(QuestionError::UnknownType { id, tag: self.kind }),
        }
    }
}

impl MetaRecord {
    #[must_use]
    pub fn from_meta(meta: &BankMeta) -> Self {
        Self {
            course: meta.course().to_owned(),
            edition: meta.edition().map(str::to_owned),
            chapters: meta
                .chapters()
                .iter()
                .map(|(key, name)| (key.to_string(), name.clone()))
                .collect(),
        }
    }

    /// Convert into domain metadata.
    ///
    /// # Errors
    ///
    /// Returns `BankError::EmptyCourse` if the course name is blank.
    pub fn into_meta(self) -> Result<BankMeta, BankError> {
        let chapters = self
            .chapters
            .into_iter()
            .map(|(key, name)| (ChapterKey::new(key.trim()), name))
            .collect();
        BankMeta::new(self.course, self.edition, chapters)
    }
}

impl BankFile {
    /// Validate the file contents into a `QuestionBank`.
    ///
    /// # Errors
    ///
    /// Returns the first question or bank validation failure.
    pub fn into_bank(self) -> Result<QuestionBank, BankLoadError> {
        let meta = self.meta.into_meta()?;
        let questions = self
            .questions
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(QuestionBank::new(meta, questions)?)
    }
}

//
// ─── LOADING ───────────────────────────────────────────────────────────────────
//

/// Where a loaded bank came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankSource {
    File(PathBuf),
    Fallback,
}

#[derive(Debug, Clone)]
pub struct LoadedBank {
    pub bank: QuestionBank,
    pub source: BankSource,
}

/// Parse and validate bank JSON.
///
/// # Errors
///
/// Returns `BankLoadError::Json` for malformed JSON, or a validation error.
pub fn parse_bank(json: &str) -> Result<QuestionBank, BankLoadError> {
    let file: BankFile = serde_json::from_str(json)?;
    file.into_bank()
}

/// Read and validate the bank at `path`.
///
/// # Errors
///
/// Returns `BankLoadError::Io` if the file cannot be read, or
/// `BankLoadError::Invalid` naming the file when it fails to parse or
/// validate.
pub fn load_bank(path: &Path) -> Result<QuestionBank, BankLoadError> {
    let data = std::fs::read_to_string(path).map_err(|source| BankLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bank(&data).map_err(|source| BankLoadError::Invalid {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

/// Load the first candidate that exists.
///
/// Missing files are skipped; a file that exists but fails to parse stops the
/// search with its error.
///
/// # Errors
///
/// Returns `BankLoadError::NotFound` if no candidate exists.
pub fn load_first(candidates: &[PathBuf]) -> Result<LoadedBank, BankLoadError> {
    for path in candidates {
        match load_bank(path) {
            Ok(bank) => {
                info!(
                    "loaded question bank from {} ({} questions)",
                    path.display(),
                    bank.len()
                );
                return Ok(LoadedBank {
                    bank,
                    source: BankSource::File(path.clone()),
                });
            }
            Err(BankLoadError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                debug!("tried {} - not found", path.display());
            }
            Err(err) => return Err(err),
        }
    }
    Err(BankLoadError::NotFound {
        tried: candidates.to_vec(),
    })
}

/// Load the first candidate, or the built-in fallback bank when none loads.
#[must_use]
pub fn load_or_fallback(candidates: &[PathBuf]) -> LoadedBank {
    match load_first(candidates) {
        Ok(loaded) => loaded,
        Err(err) => {
            match err {
                BankLoadError::NotFound { .. } => {
                    warn!("{err}; serving the fallback question bank");
                }
                _ => error!("{err}; serving the fallback question bank"),
            }
            LoadedBank {
                bank: fallback_bank(),
                source: BankSource::Fallback,
            }
        }
    }
}

/// Default file names searched for each bank.
#[must_use]
pub fn default_candidates(name: BankName) -> Vec<PathBuf> {
    let file = match name {
        BankName::Easy => "questionbank.json",
        BankName::Hard => "questionbank_hard.json",
    };
    vec![
        PathBuf::from(file),
        Path::new("..").join(file),
        Path::new("data").join(file),
    ]
}

/// Minimal one-question bank served when no bank file can be loaded.
///
/// # Panics
///
/// Panics if the built-in question fails validation.
#[must_use]
pub fn fallback_bank() -> QuestionBank {
    let chapters = [
        ("1", "Global Business"),
        ("2", "Institutions & Business Environment"),
        ("3", "Culture, Ethics & Informal Institutions"),
        ("4", "Resources, Capabilities & Strategy"),
    ]
    .into_iter()
    .map(|(key, name)| (ChapterKey::new(key), name.to_owned()))
    .collect();

    let meta = BankMeta::new("INB 300 - International Business", None, chapters)
        .expect("fallback meta should be valid");
    let question = Question::multiple_choice(
        QuestionId::new("FALLBACK-001"),
        ChapterKey::new("1"),
        "What is International Business?",
        vec![
            "Business within one country".into(),
            "Business across borders".into(),
            "Only exports".into(),
            "Only imports".into(),
        ],
        "B",
        "International business involves business activities across national borders.",
    )
    .expect("fallback question should be valid");
    QuestionBank::new(meta, vec![question]).expect("fallback bank should be valid")
}

//
// ─── CLEANUP ───────────────────────────────────────────────────────────────────
//

const CITATION_MARKER: &str = ":contentReference";

/// Strip a trailing `:contentReference[...]` citation and any dangling colon
/// from an explanation.
#[must_use]
pub fn clean_explanation(raw: &str) -> String {
    // Only a citation that runs to the end of the text is removed.
    let text = raw
        .match_indices(CITATION_MARKER)
        .map(|(pos, _)| pos)
        .find(|&pos| !raw[pos..].contains(is_line_terminator))
        .map_or(raw, |pos| &raw[..pos]);
    let trimmed = text.trim_end();
    let trimmed = trimmed.strip_suffix(':').unwrap_or(trimmed);
    trimmed.trim().to_owned()
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Clean every `exp` field of a bank document in place, keeping unknown
/// fields untouched. Returns how many explanations changed.
pub fn clean_bank_document(doc: &mut serde_json::Value) -> usize {
    let Some(questions) = doc.get_mut("questions").and_then(|q| q.as_array_mut()) else {
        return 0;
    };

    let mut changed = 0;
    for question in questions {
        let Some(exp) = question.get_mut("exp") else {
            continue;
        };
        let Some(current) = exp.as_str() else {
            continue;
        };
        let cleaned = clean_explanation(current);
        if cleaned != current {
            *exp = serde_json::Value::String(cleaned);
            changed += 1;
        }
    }
    changed
}
