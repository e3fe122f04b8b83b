use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ignore::Walk;
use rayon::prelude::*;
use tracing::{info, trace, warn};

use crate::{ContentDocument, ContentKind, ParseError, ScanError};

/// Cooperative cancellation for an in-flight scan. Cloning hands out another
/// handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort the remaining scan. Files already parsed are discarded along
    /// with the rest; the scan surfaces a single aggregated error.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Knobs for a single scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Upper bound on how long file reads may keep going. Checked between
    /// files, so a scan overruns by at most one document parse.
    pub timeout: Option<Duration>,
    pub cancel: CancelToken,
}

/// Everything a scan produced: documents sorted by path, plus the per-file
/// errors that were recorded along the way.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub documents: Vec<ContentDocument>,
    pub errors: Vec<ParseError>,
}

/// The per-file result inside the parallel parse.
enum FileResult {
    Parsed(Box<ContentDocument>),
    Failed(ParseError),
    Skipped,
}

/// Walk the given root, parse every markdown file into a [`ContentDocument`],
/// and return the results ordered lexicographically by path.
///
/// Documents are parsed in parallel; nothing is shared between parses, and
/// the final sort makes the ordering independent of execution order. A file
/// that fails to parse is recorded and skipped rather than aborting the scan.
/// A missing root yields an empty outcome.
#[tracing::instrument(skip(options))]
pub fn scan<P: AsRef<Path> + Debug>(
    root: P,
    kind: ContentKind,
    options: &ScanOptions,
) -> Result<ScanOutcome, ScanError> {
    let root = root.as_ref();

    if !root.exists() {
        warn!("Content root {:?} does not exist, nothing to scan", root);
        return Ok(ScanOutcome::default());
    }

    let mut paths = discover_files(root);
    paths.sort();

    let total = paths.len();
    trace!("Discovered {total} content files at {root:?}");

    let deadline = options.timeout.map(|timeout| Instant::now() + timeout);

    let results: Vec<FileResult> = paths
        .par_iter()
        .map(|path| {
            if options.cancel.is_cancelled()
                || deadline.is_some_and(|deadline| Instant::now() >= deadline)
            {
                return FileResult::Skipped;
            }

            match fs::read_to_string(path) {
                Ok(raw) => match ContentDocument::parse(root, path, kind, &raw) {
                    Ok(document) => FileResult::Parsed(Box::new(document)),
                    Err(err) => FileResult::Failed(err),
                },
                Err(source) => FileResult::Failed(ParseError::Read {
                    path: path.clone(),
                    source,
                }),
            }
        })
        .collect();

    let pending = results
        .iter()
        .filter(|result| matches!(result, FileResult::Skipped))
        .count();

    if pending > 0 || options.cancel.is_cancelled() {
        return Err(ScanError::Interrupted {
            root: root.to_path_buf(),
            pending,
            total,
        });
    }

    let mut outcome = ScanOutcome::default();
    for result in results {
        match result {
            FileResult::Parsed(document) => outcome.documents.push(*document),
            FileResult::Failed(err) => outcome.errors.push(err),
            FileResult::Skipped => unreachable!("skipped files abort the scan"),
        }
    }

    outcome.documents.sort_by(|a, b| a.path.cmp(&b.path));
    dedupe_slugs(&mut outcome);

    info!(
        "Scanned {} {} documents at {:?} ({} recorded errors)",
        outcome.documents.len(),
        kind.as_str(),
        root,
        outcome.errors.len()
    );

    Ok(outcome)
}

fn discover_files(root: &Path) -> Vec<PathBuf> {
    Walk::new(root)
        .filter_map(Result::ok)
        .map(ignore::DirEntry::into_path)
        .filter(|path| {
            path.is_file()
                && matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("md" | "markdown")
                )
        })
        .collect()
}

/// Slugs are unique per kind. With the documents already in path order, the
/// lexicographically first file wins and later collisions are recorded.
fn dedupe_slugs(outcome: &mut ScanOutcome) {
    let mut seen = std::collections::HashSet::new();
    let mut kept = Vec::with_capacity(outcome.documents.len());

    for document in outcome.documents.drain(..) {
        if seen.insert(document.slug.clone()) {
            kept.push(document);
        } else {
            outcome.errors.push(ParseError::DuplicateSlug {
                path: document.path,
                slug: document.slug,
            });
        }
    }

    outcome.documents = kept;
}
