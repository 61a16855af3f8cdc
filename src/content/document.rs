//! A single content file: front matter plus Markdown body.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use super::frontmatter::FrontMatter;
use crate::helpers;

/// Failures that abort one document without aborting the run.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {path:?}")]
    Read { path: PathBuf, source: io::Error },

    #[error("{path:?} is missing required option `{key}`")]
    MissingOption { path: PathBuf, key: &'static str },

    #[error("{path:?} declares slug {slug:?} which escapes the output directory")]
    UnsafeSlug { path: PathBuf, slug: String },

    #[error("failed to render {path:?} with template `{template}`")]
    Template {
        path: PathBuf,
        template: String,
        source: tera::Error,
    },

    #[error("failed to write {target:?}")]
    Write { target: PathBuf, source: io::Error },
}

#[derive(Debug, Clone)]
pub struct Document {
    pub front_matter: FrontMatter,
    pub body: String,
    /// Path the document was read from, used in diagnostics.
    pub source: PathBuf,
}

impl Document {
    /// Read and parse a content file from disk.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text, path))
    }

    /// Parse already-read content. Malformed front-matter lines are logged
    /// and dropped; the rest of the document still loads.
    pub fn parse(text: &str, source: &Path) -> Self {
        let (front_matter, body, malformed) = FrontMatter::parse(text);
        for bad in &malformed {
            warn!(
                "Skipping malformed front matter at {:?}:{}: {}",
                source, bad.line, bad.text
            );
        }
        Self {
            front_matter,
            body,
            source: source.to_path_buf(),
        }
    }

    /// Fetch an option that rendering cannot proceed without.
    pub fn require(&self, key: &'static str) -> Result<&str, DocumentError> {
        self.front_matter
            .get(key)
            .ok_or_else(|| DocumentError::MissingOption {
                path: self.source.clone(),
                key,
            })
    }
}

/// One published document as the index template and feed see it.
///
/// Serializes flat: every front-matter option side by side with the rendered
/// `html`. The rendered body wins over any `html` option a document declared
/// itself.
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    #[serde(flatten)]
    options: HashMap<String, String>,
    html: String,
    /// Parsed publish date; a sort key, never template data.
    #[serde(skip)]
    pub date: Option<DateTime<Utc>>,
}

impl IndexEntry {
    pub fn new(doc: &Document, html: String) -> Self {
        let date = doc.front_matter.date().and_then(helpers::parse_date);
        Self {
            options: doc.front_matter.options().clone(),
            html,
            date,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn slug(&self) -> Option<&str> {
        self.get("slug")
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}
