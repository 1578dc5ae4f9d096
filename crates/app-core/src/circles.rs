//! Circles
//!
//! The member's support circles: cadence, host, next session, and
//! membership status, plus the demo dataset the client ships with.

use serde::{Deserialize, Serialize};

/// Membership status within a circle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    /// The member participates in this circle
    Active,
    /// The member has a pending invitation
    Invited,
}

impl Membership {
    /// Status pill label
    pub fn label(&self) -> &'static str {
        match self {
            Membership::Active => "Active",
            Membership::Invited => "Invited",
        }
    }

    /// Card action labels for this membership status
    pub fn actions(&self) -> [&'static str; 2] {
        match self {
            Membership::Active => ["Open chat", "View schedule"],
            Membership::Invited => ["View details", "Respond"],
        }
    }
}

/// A support circle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    /// Stable identifier
    pub id: String,
    /// Circle name
    pub name: String,
    /// Meeting cadence, e.g. "Daily at 8:00 AM"
    pub cadence: String,
    /// Number of members
    pub member_count: u32,
    /// When the circle meets next
    pub next_session: String,
    /// Host's display name
    pub host: String,
    /// The member's status in this circle
    pub membership: Membership,
}

impl Circle {
    /// Meta line under the circle name
    pub fn meta(&self) -> String {
        format!("{} • {} members", self.cadence, self.member_count)
    }
}

/// The demo circles shown on the circles screen
pub fn demo_circles() -> Vec<Circle> {
    vec![
        Circle {
            id: "morning-check-in".to_string(),
            name: "Morning Check-In".to_string(),
            cadence: "Daily at 8:00 AM".to_string(),
            member_count: 12,
            next_session: "Today, 8:00 AM".to_string(),
            host: "Alex".to_string(),
            membership: Membership::Active,
        },
        Circle {
            id: "weekend-sober-activities".to_string(),
            name: "Weekend Sober Activities".to_string(),
            cadence: "Saturdays".to_string(),
            member_count: 7,
            next_session: "Sat 4:00 PM".to_string(),
            host: "Jamie".to_string(),
            membership: Membership::Invited,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_circles_content() {
        let circles = demo_circles();
        assert_eq!(circles.len(), 2);

        let morning = &circles[0];
        assert_eq!(morning.name, "Morning Check-In");
        assert_eq!(morning.meta(), "Daily at 8:00 AM • 12 members");
        assert_eq!(morning.next_session, "Today, 8:00 AM");
        assert_eq!(morning.host, "Alex");
        assert_eq!(morning.membership, Membership::Active);

        let weekend = &circles[1];
        assert_eq!(weekend.name, "Weekend Sober Activities");
        assert_eq!(weekend.meta(), "Saturdays • 7 members");
        assert_eq!(weekend.next_session, "Sat 4:00 PM");
        assert_eq!(weekend.host, "Jamie");
        assert_eq!(weekend.membership, Membership::Invited);
    }

    #[test]
    fn membership_actions_follow_status() {
        assert_eq!(Membership::Active.label(), "Active");
        assert_eq!(
            Membership::Active.actions(),
            ["Open chat", "View schedule"]
        );
        assert_eq!(Membership::Invited.label(), "Invited");
        assert_eq!(Membership::Invited.actions(), ["View details", "Respond"]);
    }

    #[test]
    fn circle_serializes_camel_case() {
        let json = serde_json::to_string(&demo_circles()[0]).unwrap();
        assert!(json.contains("\"memberCount\":12"));
        assert!(json.contains("\"nextSession\""));
        assert!(json.contains("\"membership\":\"active\""));
    }
}
