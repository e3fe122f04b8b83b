#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::path::Path;

use config::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A named set of colors. Nested groups hold variants, most notably the
/// `modes` group.
pub type ColorGroup = BTreeMap<String, ColorValue>;

/// One node of the theme color tree: either a color value or a nested group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Color(String),
    Group(ColorGroup),
}

/// A full theme: the color tree plus the mode the site starts in.
///
/// The default value is the built-in base palette that ships with the
/// pipeline; site overlays are merged on top of it with [`Self::resolve`].
/// The resolved definition is threaded through the build as a value, there is
/// no process-wide theme state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDefinition {
    pub initial_color_mode: String,
    pub colors: ColorGroup,
}

/// A partial theme supplied by the site, merged over the base definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeOverlay {
    pub initial_color_mode: Option<String>,
    pub colors: ColorGroup,
}

impl Default for ThemeDefinition {
    fn default() -> Self {
        let colors = [
            ("primary", color("#000")),
            ("secondary", color("#73737D")),
            ("accent", color("#6166DC")),
            ("grey", color("#73737D")),
            ("background", color("#fff")),
            (
                "gradient",
                color("linear-gradient(180deg, rgba(217, 219, 224, 0) 0%, #D9DBE0 100%)"),
            ),
            (
                "modes",
                ColorValue::Group(
                    [
                        (
                            "light".to_string(),
                            ColorValue::Group(
                                [
                                    ("primary".to_string(), color("#000")),
                                    ("background".to_string(), color("#fff")),
                                ]
                                .into(),
                            ),
                        ),
                        (
                            "dark".to_string(),
                            ColorValue::Group(
                                [
                                    ("primary".to_string(), color("#fff")),
                                    ("secondary".to_string(), color("#fff")),
                                    ("accent".to_string(), color("#E9DAAC")),
                                    ("background".to_string(), color("#111216")),
                                    (
                                        "gradient".to_string(),
                                        color(
                                            "linear-gradient(180deg, #111216 0%, rgba(66, 81, 98, 0.36) 100%)",
                                        ),
                                    ),
                                ]
                                .into(),
                            ),
                        ),
                    ]
                    .into(),
                ),
            ),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

        Self {
            initial_color_mode: String::from("light"),
            colors,
        }
    }
}

fn color(value: &str) -> ColorValue {
    ColorValue::Color(value.to_string())
}

impl ThemeOverlay {
    /// Read an overlay file. A missing file is simply an empty overlay; a
    /// file that does not parse is a configuration error.
    #[tracing::instrument]
    pub fn load<P: AsRef<Path> + Debug>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::OverlayRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&raw).map_err(|source| ConfigError::OverlayParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ThemeDefinition {
    /// Merge an overlay onto this definition, override-wins, depth-first:
    /// group meets group merges key-wise, anything else is replaced by the
    /// overlay value, and unknown overlay keys are added. The merge itself
    /// cannot fail; the initial-mode invariant is rechecked afterwards.
    #[tracing::instrument(skip(self, overlay))]
    pub fn resolve(mut self, overlay: ThemeOverlay) -> Result<Self, ConfigError> {
        if let Some(mode) = overlay.initial_color_mode {
            self.initial_color_mode = mode;
        }

        merge_groups(&mut self.colors, overlay.colors);
        self.validate()?;

        info!(
            "Resolved theme with initial color mode `{}`",
            self.initial_color_mode
        );
        Ok(self)
    }

    /// The mode variants defined under the `modes` key.
    pub fn modes(&self) -> Option<&ColorGroup> {
        match self.colors.get("modes") {
            Some(ColorValue::Group(modes)) => Some(modes),
            _ => None,
        }
    }

    /// `initial_color_mode` must name an existing mode key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .modes()
            .is_some_and(|modes| modes.contains_key(&self.initial_color_mode))
        {
            Ok(())
        } else {
            Err(ConfigError::UnknownColorMode {
                mode: self.initial_color_mode.clone(),
            })
        }
    }
}

/// Recursive deep-merge of one color group onto another.
fn merge_groups(base: &mut ColorGroup, overlay: ColorGroup) {
    for (key, overlay_value) in overlay {
        if let ColorValue::Group(overlay_group) = overlay_value {
            if let Some(ColorValue::Group(base_group)) = base.get_mut(&key) {
                merge_groups(base_group, overlay_group);
                continue;
            }

            base.insert(key, ColorValue::Group(overlay_group));
        } else {
            base.insert(key, overlay_value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group<const N: usize>(entries: [(&str, ColorValue); N]) -> ColorGroup {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    #[test]
    fn override_wins_for_leaf_values() -> Result<(), ConfigError> {
        let base = ThemeDefinition {
            initial_color_mode: String::from("dark"),
            colors: group([
                ("primary", color("#000")),
                (
                    "modes",
                    ColorValue::Group(group([(
                        "dark",
                        ColorValue::Group(group([("accent", color("#111"))])),
                    )])),
                ),
            ]),
        };

        let overlay = ThemeOverlay {
            initial_color_mode: None,
            colors: group([
                ("primary", color("#33455B")),
                (
                    "modes",
                    ColorValue::Group(group([(
                        "dark",
                        ColorValue::Group(group([("accent", color("#91BDFA"))])),
                    )])),
                ),
            ]),
        };

        let merged = base.resolve(overlay)?;

        assert_eq!(merged.colors.get("primary"), Some(&color("#33455B")));
        let dark = match merged.modes().and_then(|m| m.get("dark")) {
            Some(ColorValue::Group(dark)) => dark,
            other => panic!("expected dark mode group, got {other:?}"),
        };
        assert_eq!(dark.get("accent"), Some(&color("#91BDFA")));

        Ok(())
    }

    #[test]
    fn merge_is_idempotent() -> Result<(), ConfigError> {
        let overlay = ThemeOverlay {
            initial_color_mode: Some(String::from("dark")),
            colors: group([
                ("primary", color("#33455B")),
                ("accent", color("#82b2ff")),
                (
                    "modes",
                    ColorValue::Group(group([(
                        "dark",
                        ColorValue::Group(group([
                            ("gradient", color("none")),
                            ("accent", color("#91BDFA")),
                        ])),
                    )])),
                ),
            ]),
        };

        let once = ThemeDefinition::default().resolve(overlay.clone())?;
        let twice = once.clone().resolve(overlay)?;

        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn base_keys_survive_partial_overlay() -> Result<(), ConfigError> {
        let overlay = ThemeOverlay {
            initial_color_mode: None,
            colors: group([("primary", color("#33455B"))]),
        };

        let merged = ThemeDefinition::default().resolve(overlay)?;

        assert_eq!(merged.colors.get("primary"), Some(&color("#33455B")));
        assert_eq!(merged.colors.get("secondary"), Some(&color("#73737D")));
        assert!(merged.modes().is_some_and(|m| m.contains_key("dark")));

        Ok(())
    }

    #[test]
    fn unknown_overlay_keys_are_added() -> Result<(), ConfigError> {
        let overlay = ThemeOverlay {
            initial_color_mode: None,
            colors: group([("articleText", color("#08080B"))]),
        };

        let merged = ThemeDefinition::default().resolve(overlay)?;
        assert_eq!(merged.colors.get("articleText"), Some(&color("#08080B")));

        Ok(())
    }

    #[test]
    fn unknown_initial_mode_is_a_config_error() {
        let overlay = ThemeOverlay {
            initial_color_mode: Some(String::from("sepia")),
            colors: ColorGroup::new(),
        };

        let err = ThemeDefinition::default().resolve(overlay).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownColorMode { mode } if mode == "sepia"
        ));
    }

    #[test]
    fn overlay_loads_from_toml() -> Result<(), ConfigError> {
        let tmp_dir = tempfile::tempdir().unwrap();
        let path = tmp_dir.path().join("theme.toml");
        std::fs::write(
            &path,
            r##"
                initialColorMode = "dark"

                [colors]
                primary = "#33455B"
                gradient = "none"

                [colors.modes.dark]
                gradient = "none"
                accent = "#91BDFA"
            "##,
        )
        .unwrap();

        let overlay = ThemeOverlay::load(&path)?;
        assert_eq!(overlay.initial_color_mode.as_deref(), Some("dark"));

        let merged = ThemeDefinition::default().resolve(overlay)?;
        assert_eq!(merged.initial_color_mode, "dark");
        assert_eq!(merged.colors.get("gradient"), Some(&color("none")));

        Ok(())
    }

    #[test]
    fn missing_overlay_file_is_empty() -> Result<(), ConfigError> {
        let tmp_dir = tempfile::tempdir().unwrap();
        let overlay = ThemeOverlay::load(tmp_dir.path().join("theme.toml"))?;

        assert_eq!(overlay, ThemeOverlay::default());
        Ok(())
    }

    #[test]
    fn malformed_overlay_is_a_config_error() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let path = tmp_dir.path().join("theme.toml");
        std::fs::write(&path, "colors = 3").unwrap();

        let err = ThemeOverlay::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::OverlayParse { .. }));
    }
}
