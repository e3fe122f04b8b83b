use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems. Any of these abort the build.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("field `{field}` must not be empty")]
    EmptyField { field: &'static str },

    #[error("`siteUrl` is not a well-formed URL")]
    InvalidSiteUrl(#[from] url::ParseError),

    #[error("plugin `{0}` is declared more than once")]
    DuplicatePlugin(String),

    #[error("invalid options for plugin `{plugin}`: {message}")]
    PluginOptions { plugin: String, message: String },

    #[error("unable to load configuration")]
    Load(#[from] Box<figment::Error>),

    #[error("unable to read theme overlay at {path}")]
    OverlayRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed theme overlay at {path}")]
    OverlayParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("initial color mode `{mode}` does not name a defined mode")]
    UnknownColorMode { mode: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}
