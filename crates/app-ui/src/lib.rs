//! User interface for Circely
//!
//! This crate provides the client UI layer: hash-based navigation, the
//! swipeable card stack, headless screen view-models, shared components,
//! and theming.
//!
//! Everything here is presentation state rather than pixels. Screens and
//! components produce serializable view-models a rendering shell walks,
//! and interaction arrives as plain method calls (pointer events on the
//! card stack, field writes on the forms, navigations on the router).
//!
//! # Modules
//!
//! - [`navigation`] - Path normalization, typed routes, and the hash router
//! - [`card_stack`] - Swipeable card deck with pointer gesture tracking
//! - [`screens`] - View-models for every routed screen
//! - [`components`] - Shared chrome: headers, status banners, bottom
//!   navigation, and the SOS overlay
//! - [`theme`] - Light and dark palettes
//!
//! # Example
//!
//! ```rust
//! use app_ui::navigation::{normalize_path, Route};
//! use app_ui::screens::PlaceholderScreen;
//! use app_ui::theme::{Theme, ThemeVariant};
//!
//! // Normalize a link target the way the address bar does
//! assert_eq!(normalize_path("#/log/goal"), "/log/goal/");
//! assert_eq!(Route::CheckIn.to_path(), "/checkin/");
//!
//! // Pick a theme
//! let theme = Theme::for_variant(ThemeVariant::Dark);
//! assert!(theme.is_dark());
//!
//! // Build a screen
//! let screen = PlaceholderScreen::rate();
//! assert_eq!(screen.header.title, "Rate");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod card_stack;
pub mod components;
pub mod navigation;
pub mod screens;
pub mod theme;

// Re-export commonly used types
pub use theme::{
    dark_theme, light_theme, StatusTones, SurfacePalette, TextPalette, Theme, ThemeVariant, Tone,
};

pub use navigation::{
    normalize_path, HashRouter, HashStation, InMemoryHashStation, LogView, NavigationTab, Route,
    RouteParams, Router,
};

pub use card_stack::{
    CardLayout, CardStack, DragTransform, LockedAxis, ReleaseOutcome, StackPhase, SwipeDirection,
};
