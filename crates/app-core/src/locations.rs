//! Recovery locations
//!
//! The shared location model used by the map screen and the check-in venue
//! catalog, the headless map view-model handed to the mapping widget, and
//! the find-support directory with its category tabs.

use serde::{Deserialize, Serialize};

/// Default map viewport center (continental US)
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 37.0902,
    lng: -95.7129,
};

/// Default map zoom level
pub const DEFAULT_ZOOM: u8 = 4;

/// Zoom level applied when focusing a single location
pub const FOCUS_ZOOM: u8 = 12;

/// Tile layer the mapping widget loads
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Attribution line for the tile layer
pub const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";

// =============================================================================
// Location Model
// =============================================================================

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

/// Whether a location is currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    /// Open for visitors
    Open,
    /// Currently closed
    Closed,
}

impl LocationStatus {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            LocationStatus::Open => "Open",
            LocationStatus::Closed => "Closed",
        }
    }
}

/// A recovery resource location
///
/// The map screen and the check-in venue catalog share this model; fields
/// one of them has no data for stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryLocation {
    /// Stable identifier
    pub id: String,
    /// Location name
    pub name: String,
    /// Venue category, e.g. "Treatment Center"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Street address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// City name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Distance from the member, e.g. "2.3 mi"
    pub distance: String,
    /// Open/closed status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LocationStatus>,
    /// Map coordinates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// The demo locations shown on the map screen
pub fn demo_locations() -> Vec<RecoveryLocation> {
    let rows = [
        ("1", "Hope Center", "San Francisco", LocationStatus::Open, "2.3 mi", 37.7749, -122.4194),
        ("2", "Recovery House", "Los Angeles", LocationStatus::Open, "5.1 mi", 34.0522, -118.2437),
        ("3", "Serenity Place", "San Diego", LocationStatus::Closed, "8.7 mi", 32.7157, -117.1611),
        ("4", "New Beginnings", "Oakland", LocationStatus::Open, "3.2 mi", 37.8044, -122.2712),
        ("5", "Safe Harbor", "Sacramento", LocationStatus::Open, "12.4 mi", 38.5816, -121.4944),
    ];

    rows.into_iter()
        .map(|(id, name, city, status, distance, lat, lng)| RecoveryLocation {
            id: id.to_string(),
            name: name.to_string(),
            category: None,
            address: None,
            city: Some(city.to_string()),
            distance: distance.to_string(),
            status: Some(status),
            coordinates: Some(Coordinates { lat, lng }),
        })
        .collect()
}

// =============================================================================
// Map View-Model
// =============================================================================

/// One marker handed to the mapping widget
///
/// The label carries the popup lines (name, city, status) separated by
/// newlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    /// Location id the marker represents
    pub id: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Popup text
    pub label: String,
}

/// Request raised toward the mapping widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapRequest {
    /// Re-center on a marker and open its popup
    Focus {
        /// Marker to focus
        marker_id: String,
        /// New viewport center
        center: Coordinates,
        /// New zoom level
        zoom: u8,
    },
    /// The widget should re-measure its container (raised when the
    /// list/map view mode changes)
    InvalidateSize,
}

/// Headless view-model for the mapping widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapModel {
    /// Viewport center
    pub center: Coordinates,
    /// Viewport zoom level
    pub zoom: u8,
    /// Markers to render
    pub markers: Vec<MapMarker>,
}

impl MapModel {
    /// Build the model for a set of locations
    ///
    /// Locations without coordinates get no marker.
    pub fn for_locations(locations: &[RecoveryLocation]) -> Self {
        let markers = locations
            .iter()
            .filter_map(|location| {
                let coordinates = location.coordinates?;
                let mut lines = vec![location.name.clone()];
                if let Some(city) = &location.city {
                    lines.push(city.clone());
                }
                if let Some(status) = location.status {
                    lines.push(status.label().to_string());
                }
                Some(MapMarker {
                    id: location.id.clone(),
                    lat: coordinates.lat,
                    lng: coordinates.lng,
                    label: lines.join("\n"),
                })
            })
            .collect();

        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            markers,
        }
    }

    /// Build a focus request for a marker, if it exists
    pub fn focus(&self, location_id: &str) -> Option<MapRequest> {
        self.markers
            .iter()
            .find(|marker| marker.id == location_id)
            .map(|marker| MapRequest::Focus {
                marker_id: marker.id.clone(),
                center: Coordinates {
                    lat: marker.lat,
                    lng: marker.lng,
                },
                zoom: FOCUS_ZOOM,
            })
    }
}

// =============================================================================
// Find-Support Directory
// =============================================================================

/// Category tab on the find-support screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindCategory {
    /// Individual therapists
    #[default]
    Therapists,
    /// Treatment centers
    Treatment,
    /// Recovery meetings
    Meetings,
    /// Sober living houses
    SoberLiving,
}

impl FindCategory {
    /// All categories in tab order
    pub const ALL: [FindCategory; 4] = [
        FindCategory::Therapists,
        FindCategory::Treatment,
        FindCategory::Meetings,
        FindCategory::SoberLiving,
    ];

    /// Tab label
    pub fn label(&self) -> &'static str {
        match self {
            FindCategory::Therapists => "Therapists",
            FindCategory::Treatment => "Treatment",
            FindCategory::Meetings => "Meetings",
            FindCategory::SoberLiving => "Sober living",
        }
    }
}

/// One row in the find-support results list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Provider name
    pub name: String,
    /// Detail badges, e.g. "Outpatient • 0.8 miles • Accepts Medicaid"
    pub detail: String,
    /// Rating badge, e.g. "4.7 ★"
    pub rating: String,
}

/// The demo results shown on the find-support screen
pub fn demo_directory() -> Vec<DirectoryEntry> {
    let rows = [
        (
            "Hope Recovery Therapy",
            "Outpatient • 0.8 miles • Accepts Medicaid",
            "4.7 ★",
        ),
        ("Northside Counseling", "Therapist • Telehealth available", "4.9 ★"),
        (
            "Downtown Recovery Center",
            "Residential • 15 beds • Sliding scale",
            "4.5 ★",
        ),
    ];

    rows.into_iter()
        .map(|(name, detail, rating)| DirectoryEntry {
            name: name.to_string(),
            detail: detail.to_string(),
            rating: rating.to_string(),
        })
        .collect()
}
