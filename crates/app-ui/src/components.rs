//! Shared interface components for Circley
//!
//! This module models the chrome that wraps every screen: page headers,
//! form status banners, the bottom navigation bar, and the SOS overlay.
//!
//! # Component Design
//!
//! Components are plain structs with serializable properties that the
//! host shell renders. Stateful chrome (the SOS overlay, the bottom
//! navigation) holds a handle to the shared [`SosChannel`] so a press
//! anywhere in the app reaches the same overlay.
//!
//! # Available Components
//!
//! - [`ScreenHeader`] - Eyebrow/title header with optional tagline
//! - [`FormStatus`] - Success/error banner shown under forms
//! - [`BottomNav`] - Persistent tab bar with the SOS button
//! - [`SosOverlay`] - Emergency support sheet

use crate::navigation::NavigationTab;
use crate::theme::{Theme, Tone};
use app_state::sos::SosChannel;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

// =============================================================================
// Screen Header
// =============================================================================

/// Eyebrow/title header shown at the top of a screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenHeader {
    /// Small label above the title
    pub eyebrow: String,
    /// Screen title
    pub title: String,
    /// Optional line under the title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

impl ScreenHeader {
    /// Create a header with an eyebrow and title
    pub fn new(eyebrow: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            eyebrow: eyebrow.into(),
            title: title.into(),
            tagline: None,
        }
    }

    /// Add a tagline under the title
    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = Some(tagline.into());
        self
    }
}

// =============================================================================
// Form Status
// =============================================================================

/// Outcome tone for a form status banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
}

/// Banner shown under a form after a submit attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormStatus {
    /// Banner tone
    pub tone: StatusTone,
    /// Banner message
    pub message: String,
}

impl FormStatus {
    /// Create a success banner
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            tone: StatusTone::Success,
            message: message.into(),
        }
    }

    /// Create an error banner
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tone: StatusTone::Error,
            message: message.into(),
        }
    }

    /// Background/text pair for this banner under a theme
    pub fn colors<'a>(&self, theme: &'a Theme) -> &'a Tone {
        match self.tone {
            StatusTone::Success => &theme.status.success,
            StatusTone::Error => &theme.status.error,
        }
    }
}

// =============================================================================
// Bottom Navigation
// =============================================================================

/// One rendered entry in the bottom navigation bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottomNavItem {
    /// Which tab this entry represents
    pub tab: NavigationTab,
    /// Visible label
    pub label: String,
    /// Normalized path the entry links to
    pub target: String,
    /// Whether the current path sits under this tab
    pub active: bool,
}

/// Persistent tab bar shown at the bottom of every screen
///
/// Four link tabs plus the SOS button. The SOS button is not a link: it
/// opens the shared emergency overlay through the [`SosChannel`].
#[derive(Debug, Clone)]
pub struct BottomNav {
    sos: Arc<SosChannel>,
}

impl BottomNav {
    /// Label on the SOS button
    pub const SOS_LABEL: &'static str = "SOS";

    /// Create a bottom bar wired to the shared SOS channel
    pub fn new(sos: Arc<SosChannel>) -> Self {
        Self { sos }
    }

    /// Render the link entries for the current path
    pub fn items(&self, current_path: &str) -> Vec<BottomNavItem> {
        NavigationTab::all()
            .into_iter()
            .map(|tab| BottomNavItem {
                tab,
                label: tab.label().to_string(),
                target: tab.root_route().to_path(),
                active: tab.is_active(current_path),
            })
            .collect()
    }

    /// Open the emergency overlay
    pub fn press_sos(&self) {
        self.sos.open();
    }
}

// =============================================================================
// SOS Overlay
// =============================================================================

/// Visual weight of an SOS overlay action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SosActionStyle {
    /// Filled red: the most urgent action
    Emergency,
    /// Filled brand blue
    Primary,
    /// Red outline
    OutlineEmergency,
}

/// One action in the SOS overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SosAction {
    /// Visible label
    pub label: String,
    /// Visual weight
    pub style: SosActionStyle,
    /// External link target, when the action dials out instead of
    /// acting inside the app
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl SosAction {
    fn emergency(label: &str, link: &str) -> Self {
        Self {
            label: label.to_string(),
            style: SosActionStyle::Emergency,
            link: Some(link.to_string()),
        }
    }

    fn primary(label: &str) -> Self {
        Self {
            label: label.to_string(),
            style: SosActionStyle::Primary,
            link: None,
        }
    }

    fn outline(label: &str) -> Self {
        Self {
            label: label.to_string(),
            style: SosActionStyle::OutlineEmergency,
            link: None,
        }
    }
}

/// Emergency support sheet reachable from every screen
///
/// Opens when any SOS button fires on the shared channel. Pressing the
/// backdrop or the Close button dismisses it.
#[derive(Debug, Clone)]
pub struct SosOverlay {
    channel: Arc<SosChannel>,
}

impl SosOverlay {
    /// Sheet title
    pub const TITLE: &'static str = "Emergency Support";

    /// Line under the title
    pub const SUBTITLE: &'static str =
        "You are not alone. Choose an option below for immediate help.";

    /// Label on the dismiss button
    pub const CLOSE_LABEL: &'static str = "Close";

    /// Create an overlay wired to the shared SOS channel
    pub fn new(channel: Arc<SosChannel>) -> Self {
        Self { channel }
    }

    /// The fixed action list, most urgent first
    pub fn actions() -> Vec<SosAction> {
        vec![
            SosAction::emergency("Call 988 Lifeline", "tel:988"),
            SosAction::primary("Contact My Sponsor"),
            SosAction::primary("Distress Flare"),
            SosAction::primary("Grounding Exercises"),
            SosAction::primary("Nearest Meeting"),
            SosAction::outline("Chat"),
        ]
    }

    /// Whether the sheet is currently shown
    pub fn is_open(&self) -> bool {
        self.channel.is_open()
    }

    /// Show the sheet
    pub fn open(&self) {
        self.channel.open();
    }

    /// Dismiss the sheet (Close button or backdrop press)
    pub fn close(&self) {
        self.channel.close();
    }

    /// Watch the open flag
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.channel.subscribe_open()
    }
}
