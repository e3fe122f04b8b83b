use std::path::PathBuf;

use serde::{Deserialize, Serialize, Serializer};

use crate::ConfigError;

/// Plugin identifier for the content sourcing plugin.
pub const CONTENT_SOURCE: &str = "content-source";
/// Plugin identifier for the web-app manifest plugin.
pub const MANIFEST: &str = "manifest";

/// A plugin declaration from the site configuration.
///
/// On disk every plugin is a `{ resolve, options }` pair. Known plugins get
/// strongly typed options; anything else is kept as-is so an unrecognized
/// plugin never breaks loading.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawPluginConfig")]
pub enum PluginConfig {
    ContentSource(ContentSourceOptions),
    Manifest(ManifestOptions),
    Opaque { resolve: String, options: toml::Value },
}

impl PluginConfig {
    /// The identifier this plugin was declared with.
    pub fn resolve_name(&self) -> &str {
        match self {
            Self::ContentSource(_) => CONTENT_SOURCE,
            Self::Manifest(_) => MANIFEST,
            Self::Opaque { resolve, .. } => resolve,
        }
    }
}

/// Options for the content sourcing plugin. The paths here are what the
/// scanner reads and what assembly cross-references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSourceOptions {
    pub content_posts: PathBuf,
    pub content_authors: PathBuf,
    pub base_path: String,
    pub authors_page: bool,
    pub sources: Sources,
}

impl Default for ContentSourceOptions {
    fn default() -> Self {
        Self {
            content_posts: PathBuf::from("content/posts"),
            content_authors: PathBuf::from("content/authors"),
            base_path: String::from("/"),
            authors_page: true,
            sources: Sources::default(),
        }
    }
}

/// Which backends the content sourcing plugin pulls from. Only the local
/// filesystem source is implemented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sources {
    pub local: bool,
}

impl Default for Sources {
    fn default() -> Self {
        Self { local: true }
    }
}

/// Options for the web-app manifest plugin.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestOptions {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub start_url: Option<String>,
    pub background_color: Option<String>,
    pub theme_color: Option<String>,
    pub display: Option<String>,
    pub icon: Option<PathBuf>,
}

/// The on-disk shape of a plugin declaration.
#[derive(Debug, Deserialize, Serialize)]
struct RawPluginConfig {
    resolve: String,
    options: Option<toml::Value>,
}

impl TryFrom<RawPluginConfig> for PluginConfig {
    type Error = ConfigError;

    fn try_from(raw: RawPluginConfig) -> Result<Self, Self::Error> {
        let options = raw
            .options
            .unwrap_or_else(|| toml::Value::Table(toml::Table::new()));

        match raw.resolve.as_str() {
            CONTENT_SOURCE => options
                .try_into()
                .map(Self::ContentSource)
                .map_err(|e| plugin_options_error(CONTENT_SOURCE, &e)),
            MANIFEST => options
                .try_into()
                .map(Self::Manifest)
                .map_err(|e| plugin_options_error(MANIFEST, &e)),
            _ => Ok(Self::Opaque {
                resolve: raw.resolve,
                options,
            }),
        }
    }
}

fn plugin_options_error(plugin: &str, err: &toml::de::Error) -> ConfigError {
    ConfigError::PluginOptions {
        plugin: plugin.to_string(),
        message: err.message().to_string(),
    }
}

impl Serialize for PluginConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Shell<'a, T: Serialize> {
            resolve: &'a str,
            options: &'a T,
        }

        match self {
            Self::ContentSource(options) => Shell {
                resolve: CONTENT_SOURCE,
                options,
            }
            .serialize(serializer),
            Self::Manifest(options) => Shell {
                resolve: MANIFEST,
                options,
            }
            .serialize(serializer),
            Self::Opaque { resolve, options } => Shell { resolve, options }.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_plugin_gets_typed_options() -> Result<(), ConfigError> {
        let decl = r#"
            resolve = "content-source"

            [options]
            contentPosts = "content/posts"
            contentAuthors = "content/authors"
            basePath = "/"
            authorsPage = true
        "#;

        let plugin: PluginConfig = toml::from_str(decl).map_err(|e| ConfigError::PluginOptions {
            plugin: CONTENT_SOURCE.to_string(),
            message: e.to_string(),
        })?;

        assert_eq!(
            plugin,
            PluginConfig::ContentSource(ContentSourceOptions::default())
        );

        Ok(())
    }

    #[test]
    fn unknown_plugin_is_kept_opaque() {
        let decl = r#"
            resolve = "feed"

            [options]
            limit = 20
        "#;

        let plugin: PluginConfig = toml::from_str(decl).unwrap();
        assert_eq!(plugin.resolve_name(), "feed");
        assert!(matches!(plugin, PluginConfig::Opaque { .. }));
    }

    #[test]
    fn missing_options_fall_back_to_defaults() {
        let plugin: PluginConfig = toml::from_str(r#"resolve = "content-source""#).unwrap();
        assert_eq!(
            plugin,
            PluginConfig::ContentSource(ContentSourceOptions::default())
        );
    }

    #[test]
    fn plugin_declaration_round_trips() {
        let plugin = PluginConfig::Manifest(ManifestOptions {
            name: Some("Rill".to_string()),
            short_name: Some("rill".to_string()),
            start_url: Some("/".to_string()),
            background_color: Some("#fff".to_string()),
            theme_color: Some("#fff".to_string()),
            display: Some("standalone".to_string()),
            icon: Some(PathBuf::from("src/assets/favicon.png")),
        });

        let serialized = toml::to_string(&plugin).unwrap();
        let parsed: PluginConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, plugin);
    }
}
