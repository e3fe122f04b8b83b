#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod scan;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use error::{ParseError, ScanError};
pub use scan::{scan, CancelToken, ScanOptions, ScanOutcome};

/// What a content directory holds. The kind is decided by which configured
/// source directory a file was found under, not by anything in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Author,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Author => "author",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Front-matter header values, keyed by field name. Kept ordered so
/// serializing a document is deterministic.
pub type Frontmatter = BTreeMap<String, serde_yaml::Value>;

/// A parsed content document: front-matter plus the raw body text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentDocument {
    pub kind: ContentKind,
    /// Derived from the file path relative to the scan root, extension
    /// stripped. Unique within a kind.
    pub slug: String,
    pub path: PathBuf,
    pub frontmatter: Frontmatter,
    pub body: String,
}

impl ContentDocument {
    /// Parse a document out of raw file contents. The file must open with a
    /// `---` line, followed by `key: value` front-matter, a closing `---`,
    /// and the body.
    pub fn parse(
        root: &Path,
        path: &Path,
        kind: ContentKind,
        raw: &str,
    ) -> Result<Self, ParseError> {
        let (header, body) = split_front_matter(path, raw)?;

        let frontmatter: Frontmatter = if header.trim().is_empty() {
            Frontmatter::new()
        } else {
            serde_yaml::from_str(&header).map_err(|source| ParseError::Frontmatter {
                path: path.to_path_buf(),
                source,
            })?
        };

        // Front-matter values are scalars or arrays of scalars; nested
        // mappings have no meaning to the pipeline.
        for (key, value) in &frontmatter {
            if value.is_mapping() {
                return Err(ParseError::UnsupportedValue {
                    path: path.to_path_buf(),
                    key: key.clone(),
                });
            }
        }

        Ok(Self {
            kind,
            slug: slug_for(root, path),
            path: path.to_path_buf(),
            frontmatter,
            body,
        })
    }
}

/// Split raw contents into the front-matter header and the body.
fn split_front_matter(path: &Path, raw: &str) -> Result<(String, String), ParseError> {
    let mut lines = raw.lines();

    match lines.next() {
        Some(line) if line.trim() == "---" => {}
        _ => {
            return Err(ParseError::MissingFrontmatter {
                path: path.to_path_buf(),
            })
        }
    }

    let mut header = String::new();
    let mut closed = false;

    for line in lines.by_ref() {
        if line.trim() == "---" {
            closed = true;
            break;
        }

        header.push_str(line);
        header.push('\n');
    }

    if !closed {
        return Err(ParseError::UnterminatedFrontmatter {
            path: path.to_path_buf(),
        });
    }

    let body = lines.collect::<Vec<&str>>().join("\n");
    Ok((header, body.trim_start().to_string()))
}

/// Derive a document slug from its path relative to the scan root.
fn slug_for(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut stripped = relative.to_path_buf();
    stripped.set_extension("");

    stripped
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<String>>()
        .join("/")
}
