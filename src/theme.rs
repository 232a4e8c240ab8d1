use serde::{Deserialize, Serialize};

/// Background the host uses for its dark theme
pub const DARK_BODY_BACKGROUND: &str = "#222222";

const DARK_CONTAINER_BACKGROUND: &str = "#1a1a1a";
const LIGHT_CONTAINER_BACKGROUND: &str = "#f0f0f0";
const DARK_PAGE_SHADOW: &str = "0 2px 5px rgba(0,0,0,0.3)";
const LIGHT_PAGE_SHADOW: &str = "0 2px 5px rgba(0,0,0,0.1)";

/// Host theme as handed to the viewer: `{ body: { color, background } }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub body: BodyStyle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyStyle {
    pub color: String,
    pub background: String,
}

impl Theme {
    pub fn new(color: impl Into<String>, background: impl Into<String>) -> Self {
        Self {
            body: BodyStyle {
                color: color.into(),
                background: background.into(),
            },
        }
    }

    pub fn dark() -> Self {
        Self::new("#ffffff", DARK_BODY_BACKGROUND)
    }

    pub fn light() -> Self {
        Self::new("#000000", "#ffffff")
    }

    pub fn is_dark(&self) -> bool {
        self.body.background.eq_ignore_ascii_case(DARK_BODY_BACKGROUND)
    }
}

/// Presentation attributes derived from a theme and applied to the
/// container, every page surface and the status line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ThemePalette {
    pub container_background: &'static str,
    pub page_background: String,
    pub text_color: String,
    pub page_shadow: &'static str,
    /// Dark mode draws page rasters through an inverting filter
    pub invert_pages: bool,
}

impl ThemePalette {
    pub fn from_theme(theme: &Theme) -> Self {
        let dark = theme.is_dark();
        Self {
            container_background: if dark {
                DARK_CONTAINER_BACKGROUND
            } else {
                LIGHT_CONTAINER_BACKGROUND
            },
            page_background: theme.body.background.clone(),
            text_color: theme.body.color.clone(),
            page_shadow: if dark {
                DARK_PAGE_SHADOW
            } else {
                LIGHT_PAGE_SHADOW
            },
            invert_pages: dark,
        }
    }

    /// CSS-style filter for page rasters
    pub fn page_filter(&self) -> &'static str {
        if self.invert_pages {
            "brightness(0.9) invert(0.9)"
        } else {
            "none"
        }
    }
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self {
            container_background: LIGHT_CONTAINER_BACKGROUND,
            page_background: "#ffffff".to_string(),
            text_color: "#000000".to_string(),
            page_shadow: LIGHT_PAGE_SHADOW,
            invert_pages: false,
        }
    }
}
