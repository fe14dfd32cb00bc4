use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, primitives::Color};

/// Page geometry, spacing and colours used by the layout engine.
///
/// Every field has a default, so a config file only needs to name the values
/// it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub header_height: f32,
    pub footer_text: String,
    pub card_padding: f32,
    pub card_gap: f32,
    pub radar_radius: f32,
    pub bar_orientation: BarOrientation,
    pub theme: Theme,
    /// Derived EQ facet bars. Disabled unless set.
    pub eq_facets: Option<FacetFactors>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub primary: Color,
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub track: Color,
    pub card_background: Color,
    pub border: Color,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BarOrientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Multipliers deriving the EQ "self-awareness" and "empathy" facet bars from
/// a domain score. These are display approximations, not measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FacetFactors {
    pub self_awareness: f32,
    pub empathy: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 15.0,
            header_height: 14.0,
            footer_text: "Career Assessment Report".to_owned(),
            card_padding: 5.0,
            card_gap: 6.0,
            radar_radius: 50.0,
            bar_orientation: BarOrientation::default(),
            theme: Theme::default(),
            eq_facets: None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::rgb(79, 70, 229),
            accent: Color::rgb(147, 51, 234),
            text: Color::rgb(31, 41, 55),
            muted: Color::rgb(107, 114, 128),
            track: Color::rgb(229, 231, 235),
            card_background: Color::rgb(249, 250, 251),
            border: Color::rgb(209, 213, 219),
        }
    }
}

impl Default for FacetFactors {
    fn default() -> Self {
        Self {
            self_awareness: 0.9,
            empathy: 0.95,
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// First writable offset below the running header.
    pub fn body_top(&self) -> f32 {
        self.margin + self.header_height
    }

    pub fn body_bottom(&self) -> f32 {
        self.page_height - self.margin
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults_are_a4() {
        let config = LayoutConfig::default();
        assert_eq!(config.page_width, 210.0);
        assert_eq!(config.page_height, 297.0);
        assert_eq!(config.content_width(), 180.0);
        assert_eq!(config.body_top(), 29.0);
        assert_eq!(config.body_bottom(), 282.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = LayoutConfig::from_json_str(
            r#"{ "margin": 20, "barOrientation": "vertical", "eqFacets": {}, "theme": { "primary": { "r": 1, "g": 2, "b": 3 } } }"#,
        )
        .unwrap();

        assert_eq!(config.margin, 20.0);
        assert_eq!(config.bar_orientation, BarOrientation::Vertical);
        assert_eq!(config.eq_facets, Some(FacetFactors::default()));
        assert_eq!(config.theme.primary, Color::rgb(1, 2, 3));
        assert_eq!(config.theme.accent, Theme::default().accent);
        assert_eq!(config.page_height, 297.0);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            LayoutConfig::from_json_str("{ margin: }"),
            Err(ConfigError::Parse(_))
        ));
    }
}
