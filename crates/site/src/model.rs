use std::path::PathBuf;

use config::SiteConfig;
use content::{ContentDocument, ContentKind, ParseError, ScanOutcome};
use serde::Serialize;
use theme::ThemeDefinition;
use tracing::info;

use crate::AssemblyError;

/// The outcome of scanning one configured content path, kept next to the
/// path that was declared for it so assembly can cross-reference the two.
#[derive(Debug)]
pub struct ScannedSource {
    pub declared: PathBuf,
    pub kind: ContentKind,
    pub outcome: ScanOutcome,
}

/// The fully assembled site, ready for hand-off to a renderer.
///
/// Built once per build and never mutated afterwards; the next build starts
/// from scratch and replaces the model wholesale.
#[derive(Debug, Serialize)]
pub struct SiteModel {
    pub config: SiteConfig,
    pub theme: ThemeDefinition,
    pub documents: Vec<ContentDocument>,
    /// Per-document parse failures recorded during scanning. Not fatal.
    #[serde(serialize_with = "serialize_warnings")]
    pub warnings: Vec<ParseError>,
}

fn serialize_warnings<S: serde::Serializer>(
    warnings: &[ParseError],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(warnings.iter().map(ToString::to_string))
}

/// Combine the validated configuration, the resolved theme, and the scanned
/// sources into one immutable [`SiteModel`].
///
/// Every declared content path must have produced at least one document;
/// a path that yielded nothing fails the build.
#[tracing::instrument(skip_all)]
pub fn assemble(
    config: SiteConfig,
    theme: ThemeDefinition,
    sources: Vec<ScannedSource>,
) -> Result<SiteModel, AssemblyError> {
    let mut documents = Vec::new();
    let mut warnings = Vec::new();

    for source in sources {
        if source.outcome.documents.is_empty() {
            return Err(AssemblyError::EmptySource {
                path: source.declared,
                kind: source.kind,
            });
        }

        documents.extend(source.outcome.documents);
        warnings.extend(source.outcome.errors);
    }

    info!(
        "Assembled site model with {} documents and {} warnings",
        documents.len(),
        warnings.len()
    );

    Ok(SiteModel {
        config,
        theme,
        documents,
        warnings,
    })
}
