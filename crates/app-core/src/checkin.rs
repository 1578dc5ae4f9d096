//! Location check-in
//!
//! The check-in venue catalog, the live search filter over it, and the
//! mutation that records a confirmed check-in in the log book.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use app_state::mutation::{self, Mutation, MutationConfig};

use crate::journal::{LogBook, LogEntry};
use crate::locations::RecoveryLocation;

// =============================================================================
// Venue Catalog
// =============================================================================

/// The demo venues a member can check in to
pub fn demo_venues() -> Vec<RecoveryLocation> {
    let rows = [
        ("1", "Harbor Recovery Center", "Treatment Center", "123 Ocean View Rd", "0.3 mi"),
        ("2", "Sanctuary Sober Living", "Sober Living House", "45 Maple Street", "0.7 mi"),
        ("3", "Downtown AA – Noon Meeting", "AA Meeting", "Community Hall, 2nd Floor", "1.1 mi"),
        ("4", "Evening NA – Hope Group", "NA Meeting", "Faith Center, Room B", "1.6 mi"),
    ];

    rows.into_iter()
        .map(|(id, name, category, address, distance)| RecoveryLocation {
            id: id.to_string(),
            name: name.to_string(),
            category: Some(category.to_string()),
            address: Some(address.to_string()),
            city: None,
            distance: distance.to_string(),
            status: None,
            coordinates: None,
        })
        .collect()
}

/// Filter venues by a live search query
///
/// A blank query keeps the full catalog. Otherwise a venue matches when its
/// name, category, or address contains the query, case-insensitively.
pub fn filter_venues(venues: &[RecoveryLocation], query: &str) -> Vec<RecoveryLocation> {
    if query.trim().is_empty() {
        return venues.to_vec();
    }

    let needle = query.to_lowercase();
    venues
        .iter()
        .filter(|venue| {
            venue.name.to_lowercase().contains(&needle)
                || field_matches(venue.category.as_deref(), &needle)
                || field_matches(venue.address.as_deref(), &needle)
        })
        .cloned()
        .collect()
}

fn field_matches(field: Option<&str>, needle: &str) -> bool {
    field.map_or(false, |value| value.to_lowercase().contains(needle))
}

// =============================================================================
// Check-In Mutation
// =============================================================================

/// Parameters for confirming a check-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    /// Venue being checked in to
    pub location_id: String,
    /// Let the member's circle know about the check-in
    pub notify_circle: bool,
    /// Optional note to the circle
    pub note: String,
}

/// A confirmed check-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    /// Venue the member checked in to
    pub location_id: String,
    /// Whether the circle was notified
    pub notify_circle: bool,
    /// Note to the circle
    pub note: String,
    /// RFC 3339 timestamp of the confirmation
    pub timestamp: String,
}

/// Mutation that confirms a check-in
///
/// The confirmed record lands in the log book, and success invalidates the
/// "log" query scope so cached log reads refetch.
pub struct CheckInMutation {
    log: Arc<LogBook>,
}

impl CheckInMutation {
    /// Create the mutation over a log book
    pub fn new(log: Arc<LogBook>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl Mutation for CheckInMutation {
    type Input = CheckInRequest;
    type Output = CheckInRecord;

    async fn mutate(&self, input: Self::Input) -> mutation::Result<Self::Output> {
        let record = CheckInRecord {
            location_id: input.location_id,
            notify_circle: input.notify_circle,
            note: input.note,
            timestamp: Utc::now().to_rfc3339(),
        };

        tracing::info!(
            location_id = %record.location_id,
            notify_circle = record.notify_circle,
            "check-in confirmed"
        );
        self.log.record(LogEntry::Checkin(record.clone())).await;

        Ok(record)
    }

    fn config(&self) -> MutationConfig {
        MutationConfig {
            invalidate_scopes: vec!["log".to_string()],
            ..Default::default()
        }
    }
}
