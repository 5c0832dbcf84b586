//! Corpus loading from a directory of JSON files.
//!
//! The corpus is re-read on every call; nothing is cached between requests.
//! Loading never fails as a whole: a missing directory or a broken file only
//! shrinks the returned collection.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::document::Document;
use crate::error::{RagError, Result};

/// Candidate data directories, relative to a base directory, in order of preference.
pub const DEFAULT_DATA_DIRS: &[&str] =
    &["public/data", "src/data", "data", "dist/src/data", "build/src/data"];

/// Value positions holding a token JSON does not allow (`NaN`, `undefined`, `Infinity`).
static NON_PORTABLE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([:\[,]\s*)(?:NaN|undefined|-?Infinity)(\s*[,}\]])")
        .expect("unreachable error: non-portable value pattern is valid")
});

/// A source of corpus documents.
///
/// Implementations are called once per chat request and must not fail:
/// unavailable storage yields an empty collection.
pub trait CorpusSource: Send + Sync {
    /// Load every document currently available.
    fn load(&self) -> Vec<Document>;
}

/// A corpus read from the first existing directory among a list of candidates.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    candidates: Vec<PathBuf>,
}

impl DirectoryCorpus {
    /// Create a corpus over explicit candidate directories.
    pub fn new<I, P>(candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { candidates: candidates.into_iter().map(Into::into).collect() }
    }

    /// Create a corpus over [`DEFAULT_DATA_DIRS`] below `base`.
    pub fn with_default_candidates(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self::new(DEFAULT_DATA_DIRS.iter().map(|dir| base.join(dir)))
    }

    /// The first candidate that exists and is a directory.
    pub fn resolve_dir(&self) -> Option<&Path> {
        self.candidates.iter().map(PathBuf::as_path).find(|path| path.is_dir())
    }
}

impl CorpusSource for DirectoryCorpus {
    fn load(&self) -> Vec<Document> {
        let Some(dir) = self.resolve_dir() else {
            warn!(candidates = ?self.candidates, "no corpus directory found");
            return Vec::new();
        };
        debug!(dir = %dir.display(), "found corpus directory");

        let mut documents = Vec::new();
        for path in discover_document_files(dir) {
            match parse_document_file(&path) {
                Ok(parsed) => {
                    debug!(file = %path.display(), entries = parsed.len(), "loaded corpus file");
                    documents.extend(parsed);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping corpus file");
                }
            }
        }

        info!(dir = %dir.display(), document_count = documents.len(), "corpus loaded");
        documents
    }
}

/// A fixed, in-memory corpus.
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
    documents: Vec<Document>,
}

impl StaticCorpus {
    /// Wrap an existing collection.
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

impl CorpusSource for StaticCorpus {
    fn load(&self) -> Vec<Document> {
        self.documents.clone()
    }
}

/// List the `.json` files directly inside `dir`, sorted by path.
pub fn discover_document_files(dir: impl AsRef<Path>) -> Vec<PathBuf> {
    let mut files = WalkDir::new(dir.as_ref())
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry.path().extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();

    files.sort();
    files
}

/// Parse one corpus file into documents.
///
/// A top-level array contributes one document per element; any other value
/// is a single document. Files that are not valid JSON get a second attempt
/// after [`sanitize_json`].
///
/// # Errors
///
/// Returns [`RagError::Io`] if the file cannot be read and
/// [`RagError::Parse`] if it is still invalid after sanitizing.
pub fn parse_document_file(path: &Path) -> Result<Vec<Document>> {
    let content = fs::read_to_string(path)
        .map_err(|source| RagError::Io { path: path.to_path_buf(), source })?;
    let content = content.trim_start_matches('\u{feff}');

    let value = match serde_json::from_str::<Value>(content) {
        Ok(value) => value,
        Err(e) => {
            debug!(file = %path.display(), error = %e, "retrying with sanitized content");
            serde_json::from_str::<Value>(&sanitize_json(content))
                .map_err(|source| RagError::Parse { path: path.to_path_buf(), source })?
        }
    };

    let origin = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(match value {
        Value::Array(items) => {
            items.into_iter().map(|item| Document::new(origin.clone(), item)).collect()
        }
        other => vec![Document::new(origin, other)],
    })
}

/// Replace bare `NaN`, `undefined` and `Infinity` values with `null`.
pub fn sanitize_json(content: &str) -> Cow<'_, str> {
    let mut cleaned = Cow::Borrowed(content);
    // Adjacent tokens share a delimiter, so one pass can leave some behind.
    while NON_PORTABLE_VALUE.is_match(&cleaned) {
        let next = NON_PORTABLE_VALUE.replace_all(&cleaned, "${1}null${2}").into_owned();
        cleaned = Cow::Owned(next);
    }
    cleaned
}
