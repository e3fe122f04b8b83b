#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod plugin;

use std::collections::HashSet;
use std::fmt::Debug;
use std::path::Path;

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

pub use error::ConfigError;
pub use plugin::{
    ContentSourceOptions, ManifestOptions, PluginConfig, Sources, CONTENT_SOURCE, MANIFEST,
};

/// Site-wide metadata, the `siteMetadata` mapping of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadata {
    pub title: String,
    pub name: String,
    pub site_url: String,
    pub description: String,
    #[serde(default)]
    pub hero: Hero,
    #[serde(default)]
    pub social: Vec<SocialLink>,
}

/// Settings for the landing page hero section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hero {
    pub heading: String,
    pub max_width: u32,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            heading: String::from("Welcome"),
            max_width: 400,
        }
    }
}

/// An entry in the social link list. Order is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}

/// The validated site configuration: metadata plus the ordered plugin list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub site_metadata: SiteMetadata,
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_metadata: SiteMetadata {
                title: String::from("A Rill Site"),
                name: String::from("Rill"),
                site_url: String::from("http://localhost:8000/"),
                description: String::new(),
                hero: Hero::default(),
                social: Vec::new(),
            },
            plugins: vec![PluginConfig::ContentSource(ContentSourceOptions::default())],
        }
    }
}

impl SiteConfig {
    /// Load the configuration file at the given path over the built-in
    /// defaults, then validate the result.
    #[tracing::instrument]
    pub fn load<P: AsRef<Path> + Debug>(path: P) -> Result<Self, ConfigError> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .extract()?;

        config.validate()?;
        info!("Loaded site configuration for {}", config.site_metadata.name);

        Ok(config)
    }

    /// Check the invariants the rest of the pipeline relies on: `title` and
    /// `siteUrl` are present, `siteUrl` is a well-formed URL, and plugin
    /// names are unique within the list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_metadata.title.is_empty() {
            return Err(ConfigError::EmptyField { field: "title" });
        }

        if self.site_metadata.site_url.is_empty() {
            return Err(ConfigError::EmptyField { field: "siteUrl" });
        }

        Url::parse(&self.site_metadata.site_url)?;

        let mut seen = HashSet::new();
        for plugin in &self.plugins {
            if !seen.insert(plugin.resolve_name()) {
                return Err(ConfigError::DuplicatePlugin(
                    plugin.resolve_name().to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The content sourcing plugins declared in the plugin list, in order.
    pub fn content_sources(&self) -> impl Iterator<Item = &ContentSourceOptions> {
        self.plugins.iter().filter_map(|plugin| match plugin {
            PluginConfig::ContentSource(options) => Some(options),
            _ => None,
        })
    }
}
