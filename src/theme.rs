//! Map styling: colors, fonts and inset layout

use crate::error::MapError;
use plotters::style::RGBColor;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// An opaque color parsed from `#RGB`, `#RRGGBB` or a basic color name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ThemeColor(pub u8, pub u8, pub u8);

impl ThemeColor {
    pub fn parse(value: &str) -> Result<Self, MapError> {
        let value = value.trim();
        let invalid = || MapError::Config(format!("unrecognized color {:?}", value));

        if let Some(hex) = value.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
            return match hex.len() {
                6 => Ok(ThemeColor(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                )),
                3 => {
                    let short = |i: usize| channel(&hex[i..i + 1]).map(|c| c * 17);
                    Ok(ThemeColor(short(0)?, short(1)?, short(2)?))
                }
                _ => Err(invalid()),
            };
        }

        match value.to_ascii_lowercase().as_str() {
            "black" => Ok(ThemeColor(0, 0, 0)),
            "white" => Ok(ThemeColor(255, 255, 255)),
            "red" => Ok(ThemeColor(255, 0, 0)),
            "green" => Ok(ThemeColor(0, 128, 0)),
            "blue" => Ok(ThemeColor(0, 0, 255)),
            "yellow" => Ok(ThemeColor(255, 255, 0)),
            "gold" => Ok(ThemeColor(255, 215, 0)),
            "gray" | "grey" => Ok(ThemeColor(128, 128, 128)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for ThemeColor {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ThemeColor::parse(&value)
    }
}

impl From<ThemeColor> for RGBColor {
    fn from(c: ThemeColor) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

/// Style settings for a render. Keys missing from a theme file keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub oceancolor: ThemeColor,
    pub landcolor: ThemeColor,
    pub watercolor: ThemeColor,
    pub bordercolor: ThemeColor,
    pub starcolor: ThemeColor,
    pub insetcolor: ThemeColor,
    pub textcolor: ThemeColor,
    pub fontfamily: String,
    /// Inset width and height as a fraction of the figure
    pub inset_size: f64,
    /// Gap between the marker and the inset, and between the inset and figure edges
    pub inset_margin: f64,
    /// Font sizes in points
    pub title_fontsize: f64,
    pub inset_title_fontsize: f64,
    pub caption_fontsize: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            oceancolor: ThemeColor(0x00, 0x00, 0x00),
            landcolor: ThemeColor(0x0F, 0x0F, 0x0F),
            watercolor: ThemeColor(0x29, 0x44, 0x9B),
            bordercolor: ThemeColor(0xA4, 0xA4, 0xA4),
            starcolor: ThemeColor(0xC8, 0xA5, 0x1C),
            insetcolor: ThemeColor(0x88, 0x00, 0x00),
            textcolor: ThemeColor(0xFF, 0xFF, 0xFF),
            fontfamily: "serif".to_string(),
            inset_size: 0.30,
            inset_margin: 0.02,
            title_fontsize: 6.0,
            inset_title_fontsize: 6.0,
            caption_fontsize: 5.5,
        }
    }
}

impl Theme {
    /// Load the default theme, overridden by the JSON object at `path` if given
    pub fn load(path: Option<&Path>) -> Result<Theme, MapError> {
        let Some(path) = path else {
            return Ok(Theme::default());
        };
        if !path.is_file() {
            return Err(MapError::not_found("Theme", path));
        }
        let text = fs::read_to_string(path)?;
        Theme::from_json_str(&text)
    }

    /// Merge a JSON object of overrides over the defaults
    pub fn from_json_str(text: &str) -> Result<Theme, MapError> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(MapError::Config(
                "theme JSON must be an object (dictionary)".to_string(),
            ));
        }
        let theme: Theme =
            serde_json::from_value(value).map_err(|e| MapError::Config(e.to_string()))?;
        theme.validate()?;
        Ok(theme)
    }

    fn validate(&self) -> Result<(), MapError> {
        if !(self.inset_size > 0.0 && self.inset_size < 1.0) {
            return Err(MapError::Config(format!(
                "inset_size must be between 0 and 1, got {}",
                self.inset_size
            )));
        }
        if !(self.inset_margin >= 0.0 && self.inset_margin < 0.5) {
            return Err(MapError::Config(format!(
                "inset_margin must be in [0, 0.5), got {}",
                self.inset_margin
            )));
        }
        for (name, size) in [
            ("title_fontsize", self.title_fontsize),
            ("inset_title_fontsize", self.inset_title_fontsize),
            ("caption_fontsize", self.caption_fontsize),
        ] {
            if !(size.is_finite() && size > 0.0) {
                return Err(MapError::Config(format!(
                    "{} must be positive, got {}",
                    name, size
                )));
            }
        }
        if self.fontfamily.trim().is_empty() {
            return Err(MapError::Config("fontfamily must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_colors() {
        assert_eq!(ThemeColor::parse("#29449b").unwrap(), ThemeColor(0x29, 0x44, 0x9B));
        assert_eq!(ThemeColor::parse("#FFF").unwrap(), ThemeColor(255, 255, 255));
        assert_eq!(ThemeColor::parse("White").unwrap(), ThemeColor(255, 255, 255));
        assert!(ThemeColor::parse("#12345").is_err());
        assert!(ThemeColor::parse("#GGGGGG").is_err());
        assert!(ThemeColor::parse("chartreuse-ish").is_err());
    }

    #[test]
    fn test_no_path_gives_defaults() {
        let theme = Theme::load(None).unwrap();
        assert_eq!(theme, Theme::default());
        assert_eq!(theme.inset_size, 0.30);
        assert_eq!(theme.fontfamily, "serif");
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let theme =
            Theme::from_json_str(r##"{"landcolor": "#123456", "inset_size": 0.25}"##).unwrap();
        assert_eq!(theme.landcolor, ThemeColor(0x12, 0x34, 0x56));
        assert_eq!(theme.inset_size, 0.25);
        assert_eq!(theme.oceancolor, Theme::default().oceancolor);
        assert_eq!(theme.caption_fontsize, 5.5);
    }

    #[test]
    fn test_integer_font_size_accepted() {
        let theme = Theme::from_json_str(r#"{"title_fontsize": 9}"#).unwrap();
        assert_eq!(theme.title_fontsize, 9.0);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        assert!(Theme::from_json_str(r#"{"linewidth": 3}"#).is_ok());
    }

    #[test]
    fn test_non_object_rejected() {
        let err = Theme::from_json_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, MapError::Config(_)));
        assert!(err.to_string().contains("must be an object"));
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(matches!(
            Theme::from_json_str(r#"{"inset_size": 1.5}"#),
            Err(MapError::Config(_))
        ));
        assert!(matches!(
            Theme::from_json_str(r#"{"starcolor": "sparkly"}"#),
            Err(MapError::Config(_))
        ));
        assert!(matches!(
            Theme::from_json_str(r#"{"caption_fontsize": "big"}"#),
            Err(MapError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r##"{{"textcolor": "#000000"}}"##).unwrap();
        let theme = Theme::load(Some(file.path())).unwrap();
        assert_eq!(theme.textcolor, ThemeColor(0, 0, 0));
    }

    #[test]
    fn test_missing_file() {
        let err = Theme::load(Some(Path::new("/no/such/theme.json"))).unwrap_err();
        assert!(err.to_string().contains("Theme file not found: /no/such/theme.json"));
    }
}
