use std::path::PathBuf;

use config::ConfigError;
use content::{ContentKind, ScanError};
use thiserror::Error;

/// Assembly found a configured content path with nothing behind it, which is
/// almost always a misconfigured plugin. Fatal.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("content source `{path}` ({kind}) yielded no documents")]
    EmptySource { path: PathBuf, kind: ContentKind },
}

/// The fatal build failures. Parse errors are not among these; they are
/// recorded on the model as warnings.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error("a build runs exactly once; start over with a fresh build")]
    NotIdle,
}
