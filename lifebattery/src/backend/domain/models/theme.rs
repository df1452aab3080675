use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Presentation variant a profile is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Fluid,
    Pixel,
    Neon,
    Mono,
    Pastel,
    Trisolarans,
}

impl Theme {
    /// Every theme in the order the settings page lists them
    pub const ALL: [Theme; 7] = [
        Theme::Classic,
        Theme::Fluid,
        Theme::Pixel,
        Theme::Neon,
        Theme::Mono,
        Theme::Pastel,
        Theme::Trisolarans,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Fluid => "fluid",
            Theme::Pixel => "pixel",
            Theme::Neon => "neon",
            Theme::Mono => "mono",
            Theme::Pastel => "pastel",
            Theme::Trisolarans => "trisolarans",
        }
    }

    /// Only the baseline theme is free
    pub fn is_premium(&self) -> bool {
        !matches!(self, Theme::Classic)
    }

    /// Whether a user with the given entitlement may select this theme
    pub fn is_available(&self, entitled: bool) -> bool {
        entitled || !self.is_premium()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown theme: {0}")]
pub struct UnknownThemeError(pub String);

impl FromStr for Theme {
    type Err = UnknownThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Theme::ALL
            .iter()
            .copied()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownThemeError(s.to_string()))
    }
}
