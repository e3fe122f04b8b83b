use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A single document that could not be turned into a [`crate::ContentDocument`].
///
/// Parse errors are recorded and the scan moves on; they surface as warnings
/// on the assembled site model rather than aborting the build.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unable to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} does not start with a front-matter block")]
    MissingFrontmatter { path: PathBuf },

    #[error("front-matter block in {path} is never closed")]
    UnterminatedFrontmatter { path: PathBuf },

    #[error("malformed front-matter in {path}")]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("front-matter key `{key}` in {path} holds a nested mapping, expected a scalar or array")]
    UnsupportedValue { path: PathBuf, key: String },

    #[error("slug `{slug}` for {path} collides with an earlier document")]
    DuplicateSlug { path: PathBuf, slug: String },
}

impl ParseError {
    /// The file the error was recorded for.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::MissingFrontmatter { path }
            | Self::UnterminatedFrontmatter { path }
            | Self::Frontmatter { path, .. }
            | Self::UnsupportedValue { path, .. }
            | Self::DuplicateSlug { path, .. } => path,
        }
    }
}

/// A scan that was aborted as a whole, as opposed to individual document
/// failures. Raised when the cancel token trips or the scan deadline passes.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan of {root} was interrupted with {pending} of {total} files unread")]
    Interrupted {
        root: PathBuf,
        pending: usize,
        total: usize,
    },
}
