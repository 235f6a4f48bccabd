use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::engine::MatchConfig;
use crate::models::Question;

const BUILTIN_QUESTIONS: &str = include_str!("questions.json");

/// Errors raised while loading a question bank or a config file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} must contain at least one question")]
    Empty(PathBuf),

    #[error("question {id} is invalid: {reason}")]
    InvalidQuestion { id: u32, reason: &'static str },

    #[error("no questions match subjects: {}", .0.join(", "))]
    NoMatchingSubjects(Vec<String>),
}

/// The five-question bank shipped with the binary.
pub fn default_questions() -> Vec<Question> {
    serde_json::from_str(BUILTIN_QUESTIONS).expect("built-in question bank is valid JSON")
}

pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let questions = parse_bank(&json_content, path)?;
    info!(path = %path.display(), count = questions.len(), "loaded question bank");
    Ok(questions)
}

/// Parses and validates a question bank held in memory.
pub fn parse_questions(json: &str) -> Result<Vec<Question>, LoadError> {
    parse_bank(json, Path::new("<inline>"))
}

fn parse_bank(json: &str, path: &Path) -> Result<Vec<Question>, LoadError> {
    let questions: Vec<Question> =
        serde_json::from_str(json).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if questions.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    let mut seen = HashSet::new();
    for question in &questions {
        question
            .validate()
            .map_err(|reason| LoadError::InvalidQuestion {
                id: question.id,
                reason,
            })?;

        if !seen.insert(question.id) {
            return Err(LoadError::InvalidQuestion {
                id: question.id,
                reason: "duplicate question id",
            });
        }
    }

    Ok(questions)
}

/// Keeps the questions whose subject is one of `subjects`, preserving order.
///
/// Matching ignores case. An empty subject list keeps the whole bank.
pub fn filter_by_subjects(
    questions: Vec<Question>,
    subjects: &[String],
) -> Result<Vec<Question>, LoadError> {
    if subjects.is_empty() {
        return Ok(questions);
    }

    let filtered: Vec<Question> = questions
        .into_iter()
        .filter(|q| subjects.iter().any(|s| s.eq_ignore_ascii_case(&q.subject)))
        .collect();

    if filtered.is_empty() {
        return Err(LoadError::NoMatchingSubjects(subjects.to_vec()));
    }

    debug!(count = filtered.len(), ?subjects, "filtered question bank");
    Ok(filtered)
}

pub fn load_config_from_json<P: AsRef<Path>>(path: P) -> Result<MatchConfig, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
