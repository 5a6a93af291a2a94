//! Browser window size, written `WIDTHxHEIGHT` in config files and log lines.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Fixed browser window size; keeps PDF layout consistent between captures.
impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewportParseError {
    #[error("expected WIDTHxHEIGHT such as 1200x800, got '{0}'")]
    Format(String),
    #[error("{axis} '{value}' is not a positive integer")]
    Dimension { axis: &'static str, value: String },
}

fn parse_dimension(axis: &'static str, value: &str) -> Result<u32, ViewportParseError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ViewportParseError::Dimension {
            axis,
            value: value.trim().to_string(),
        }),
    }
}

impl FromStr for Viewport {
    type Err = ViewportParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| ViewportParseError::Format(s.to_string()))?;
        Ok(Viewport {
            width: parse_dimension("width", width)?,
            height: parse_dimension("height", height)?,
        })
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Config files may use either `"1200x800"` or `{ width = 1200, height = 800 }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ViewportSetting {
    Text(String),
    Table { width: u32, height: u32 },
}

impl<'de> Deserialize<'de> for Viewport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ViewportSetting::deserialize(deserializer)? {
            ViewportSetting::Text(text) => text.parse().map_err(de::Error::custom),
            ViewportSetting::Table { width, height } => Ok(Viewport { width, height }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Holder {
        viewport: Viewport,
    }

    #[test]
    fn parses_width_by_height() {
        let vp: Viewport = " 1024 x 768 ".parse().unwrap();
        assert_eq!(vp, Viewport { width: 1024, height: 768 });
        assert_eq!("800X600".parse::<Viewport>().unwrap().height, 600);
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!(
            "wide".parse::<Viewport>(),
            Err(ViewportParseError::Format("wide".to_string()))
        );
        assert!(matches!(
            "0x800".parse::<Viewport>(),
            Err(ViewportParseError::Dimension { axis: "width", .. })
        ));
        assert!(matches!(
            "1200x800x600".parse::<Viewport>(),
            Err(ViewportParseError::Dimension { axis: "height", .. })
        ));
    }

    #[test]
    fn display_matches_parse_format() {
        let vp = Viewport::default();
        assert_eq!(vp.to_string(), "1200x800");
        assert_eq!(vp.to_string().parse::<Viewport>().unwrap(), vp);
    }

    #[test]
    fn deserializes_from_string_or_table() {
        let text: Holder = toml::from_str("viewport = \"1280x720\"").unwrap();
        assert_eq!(text.viewport, Viewport { width: 1280, height: 720 });

        let table: Holder = toml::from_str("viewport = { width = 800, height = 600 }").unwrap();
        assert_eq!(table.viewport, Viewport { width: 800, height: 600 });
    }

    #[test]
    fn bad_string_is_a_deserialize_error() {
        let err = toml::from_str::<Holder>("viewport = \"1280\"").unwrap_err();
        assert!(err.to_string().contains("WIDTHxHEIGHT"), "got: {err}");
    }
}
