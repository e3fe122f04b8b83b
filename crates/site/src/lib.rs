#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod model;

use std::path::{Path, PathBuf};

use config::SiteConfig;
use content::{ContentKind, ScanOptions};
use theme::{ThemeDefinition, ThemeOverlay};
use tracing::{error, info};

pub use error::{AssemblyError, BuildError};
pub use model::{assemble, ScannedSource, SiteModel};

/// Where a build reads its inputs from.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// The site root; configured content paths are resolved against it.
    pub root: PathBuf,
    /// The configuration file, relative to the root.
    pub config_file: PathBuf,
    /// The theme overlay file, relative to the root.
    pub theme_file: PathBuf,
    pub scan: ScanOptions,
}

impl BuildOptions {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            config_file: PathBuf::from("Config.toml"),
            theme_file: PathBuf::from("theme.toml"),
            scan: ScanOptions::default(),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.root.join(&self.config_file)
    }

    fn theme_path(&self) -> PathBuf {
        self.root.join(&self.theme_file)
    }
}

/// The phases a build moves through, in order. `Ready` and `Failed` are
/// terminal; a failed build is not retried, a new one starts from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Idle,
    Loading,
    Scanning,
    Resolving,
    Assembling,
    Ready,
    Failed,
}

impl Default for BuildStage {
    fn default() -> Self {
        Self::Idle
    }
}

/// A single build of the site model.
///
/// Drives `Idle -> Loading -> Scanning -> Resolving -> Assembling -> Ready`,
/// handing each stage's output to the next as an immutable value. Any fatal
/// error stops the pipeline at `Failed` with nothing partial left behind.
#[derive(Debug, Default)]
pub struct Build {
    stage: BuildStage,
    failure: Option<String>,
}

impl Build {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    /// A description of the error that failed this build, if it failed.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Run the build to completion. Consumes the builder's one shot: calling
    /// this on anything but an idle build is an error.
    #[tracing::instrument(skip(self, options), fields(root = ?options.root))]
    pub fn run(&mut self, options: &BuildOptions) -> Result<SiteModel, BuildError> {
        if self.stage != BuildStage::Idle {
            return Err(BuildError::NotIdle);
        }

        match self.execute(options) {
            Ok(model) => {
                self.advance(BuildStage::Ready);
                Ok(model)
            }
            Err(err) => {
                error!("Build failed while {:?}: {err}", self.stage);
                self.failure = Some(err.to_string());
                self.stage = BuildStage::Failed;
                Err(err)
            }
        }
    }

    fn execute(&mut self, options: &BuildOptions) -> Result<SiteModel, BuildError> {
        self.advance(BuildStage::Loading);
        let config = SiteConfig::load(options.config_path())?;

        self.advance(BuildStage::Scanning);
        let sources = self.scan_sources(&config, options)?;

        self.advance(BuildStage::Resolving);
        let overlay = ThemeOverlay::load(options.theme_path())?;
        let resolved_theme = ThemeDefinition::default().resolve(overlay)?;

        self.advance(BuildStage::Assembling);
        let model = assemble(config, resolved_theme, sources)?;

        Ok(model)
    }

    /// Scan every content path the plugin list declares: posts always,
    /// authors only when the plugin asks for an authors page.
    fn scan_sources(
        &self,
        config: &SiteConfig,
        options: &BuildOptions,
    ) -> Result<Vec<ScannedSource>, BuildError> {
        let mut sources = Vec::new();

        for plugin in config.content_sources() {
            sources.push(self.scan_source(
                &plugin.content_posts,
                ContentKind::Post,
                options,
            )?);

            if plugin.authors_page {
                sources.push(self.scan_source(
                    &plugin.content_authors,
                    ContentKind::Author,
                    options,
                )?);
            }
        }

        Ok(sources)
    }

    fn scan_source(
        &self,
        declared: &Path,
        kind: ContentKind,
        options: &BuildOptions,
    ) -> Result<ScannedSource, BuildError> {
        let outcome = content::scan(options.root.join(declared), kind, &options.scan)?;

        Ok(ScannedSource {
            declared: declared.to_path_buf(),
            kind,
            outcome,
        })
    }

    fn advance(&mut self, stage: BuildStage) {
        info!("Build stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }
}
