//! Color definitions for the Circley interface
//!
//! The palette mirrors the production stylesheet: one blue brand color on
//! white surfaces, a three-stop gray text ramp, and red/green status tones
//! for form feedback.
//!
//! # Themes
//!
//! Two variants are supported:
//! - Light: the shipped palette, white background
//! - Dark: the same ramp inverted, used when the saved color mode asks for it
//!
//! # Usage
//!
//! ```rust
//! use app_ui::theme::{Theme, ThemeVariant};
//!
//! let theme = Theme::for_variant(ThemeVariant::Light);
//! let heading = &theme.text.heading;
//! let button = &theme.primary;
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Color Types
// =============================================================================

/// A color represented as an RGB hex string (e.g., "#1e40af")
pub type Color = String;

// =============================================================================
// Brand Colors
// =============================================================================

/// Circley brand colors from the wordmark and call-to-action buttons
pub mod brand {
    /// Primary brand blue (buttons, links, active navigation)
    pub const PRIMARY: &str = "#1e40af";

    /// Sign-up accent green
    pub const ACCENT: &str = "#22c55e";

    /// Emergency red (SOS button and overlay)
    pub const DANGER: &str = "#ef4444";

    /// Pure white
    pub const WHITE: &str = "#ffffff";
}

// =============================================================================
// Palette Groups
// =============================================================================

/// Text color ramp from strongest to softest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPalette {
    /// Page and card headings
    pub heading: Color,
    /// Body copy
    pub body: Color,
    /// Secondary labels, helper text, placeholders
    pub muted: Color,
}

/// Background and edge colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfacePalette {
    /// Page and card background
    pub background: Color,
    /// Input and control borders
    pub border: Color,
    /// Hairline dividers between rows
    pub divider: Color,
}

/// Background/text pair for a status banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    /// Banner fill
    pub background: Color,
    /// Banner text
    pub text: Color,
}

/// Feedback tones for form results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTones {
    /// Confirmation banners (password updated, check-in recorded)
    pub success: Tone,
    /// Failure banners (rejected login, failed update)
    pub error: Tone,
}

// =============================================================================
// Theme Variant
// =============================================================================

/// Theme variant enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    /// Light theme
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl ThemeVariant {
    /// Get the color scheme name
    pub fn color_scheme(&self) -> &'static str {
        match self {
            ThemeVariant::Light => "light",
            ThemeVariant::Dark => "dark",
        }
    }
}

impl std::fmt::Display for ThemeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeVariant::Light => write!(f, "Light"),
            ThemeVariant::Dark => write!(f, "Dark"),
        }
    }
}

impl std::str::FromStr for ThemeVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ThemeVariant::Light),
            "dark" => Ok(ThemeVariant::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

// =============================================================================
// Theme Definition
// =============================================================================

/// Complete theme definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Which variant this theme renders
    pub variant: ThemeVariant,
    /// Brand color for buttons, links, and the active navigation tab
    pub primary: Color,
    /// Emergency red for the SOS surfaces
    pub danger: Color,
    /// Sign-up accent
    pub accent: Color,
    /// Text ramp
    pub text: TextPalette,
    /// Backgrounds and edges
    pub surface: SurfacePalette,
    /// Form feedback tones
    pub status: StatusTones,
}

impl Theme {
    /// Build the theme for a variant
    pub fn for_variant(variant: ThemeVariant) -> Theme {
        match variant {
            ThemeVariant::Light => light_theme(),
            ThemeVariant::Dark => dark_theme(),
        }
    }

    /// Check if this is a dark theme
    pub fn is_dark(&self) -> bool {
        self.variant == ThemeVariant::Dark
    }
}

impl Default for Theme {
    fn default() -> Self {
        light_theme()
    }
}

// =============================================================================
// Light Theme
// =============================================================================

/// Create the light theme
pub fn light_theme() -> Theme {
    Theme {
        variant: ThemeVariant::Light,
        primary: brand::PRIMARY.to_string(),
        danger: brand::DANGER.to_string(),
        accent: brand::ACCENT.to_string(),
        text: TextPalette {
            heading: "#111827".to_string(),
            body: "#374151".to_string(),
            muted: "#6b7280".to_string(),
        },
        surface: SurfacePalette {
            background: brand::WHITE.to_string(),
            border: "#d1d5db".to_string(),
            divider: "#e5e7eb".to_string(),
        },
        status: StatusTones {
            success: Tone {
                background: "#d1fae5".to_string(),
                text: "#065f46".to_string(),
            },
            error: Tone {
                background: "#fee2e2".to_string(),
                text: "#dc2626".to_string(),
            },
        },
    }
}

// =============================================================================
// Dark Theme
// =============================================================================

/// Create the dark theme
pub fn dark_theme() -> Theme {
    Theme {
        variant: ThemeVariant::Dark,
        // Brand blue lifted one stop so it reads on dark surfaces
        primary: "#3b82f6".to_string(),
        danger: brand::DANGER.to_string(),
        accent: brand::ACCENT.to_string(),
        text: TextPalette {
            heading: "#f9fafb".to_string(),
            body: "#e5e7eb".to_string(),
            muted: "#9ca3af".to_string(),
        },
        surface: SurfacePalette {
            background: "#111827".to_string(),
            border: "#4b5563".to_string(),
            divider: "#374151".to_string(),
        },
        status: StatusTones {
            success: Tone {
                background: "#064e3b".to_string(),
                text: "#a7f3d0".to_string(),
            },
            error: Tone {
                background: "#7f1d1d".to_string(),
                text: "#fecaca".to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_theme_is_light() {
        let theme = Theme::default();
        assert_eq!(theme.variant, ThemeVariant::Light);
        assert!(!theme.is_dark());
        assert_eq!(theme.variant.color_scheme(), "light");
    }

    #[test]
    fn test_light_palette_matches_stylesheet() {
        let theme = light_theme();
        assert_eq!(theme.primary, "#1e40af");
        assert_eq!(theme.danger, "#ef4444");
        assert_eq!(theme.surface.background, "#ffffff");
        assert_eq!(theme.surface.border, "#d1d5db");
        assert_eq!(theme.text.muted, "#6b7280");
        assert_eq!(theme.status.error.background, "#fee2e2");
        assert_eq!(theme.status.error.text, "#dc2626");
        assert_eq!(theme.status.success.background, "#d1fae5");
        assert_eq!(theme.status.success.text, "#065f46");
    }

    #[test]
    fn test_dark_theme_inverts_surfaces() {
        let light = light_theme();
        let dark = dark_theme();
        assert!(dark.is_dark());
        assert_eq!(dark.variant.color_scheme(), "dark");
        assert_ne!(dark.surface.background, light.surface.background);
        assert_ne!(dark.text.heading, light.text.heading);
        assert_eq!(dark.danger, light.danger);
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!(ThemeVariant::from_str("dark"), Ok(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str("LIGHT"), Ok(ThemeVariant::Light));
        assert!(ThemeVariant::from_str("dim").is_err());
        assert_eq!(ThemeVariant::Dark.to_string(), "Dark");
    }

    #[test]
    fn test_theme_for_variant() {
        assert_eq!(Theme::for_variant(ThemeVariant::Light), light_theme());
        assert_eq!(Theme::for_variant(ThemeVariant::Dark), dark_theme());
    }
}
