//! Home updates deck
//!
//! The cards shown in the swipeable deck on the home screen, plus the
//! lookup behind the `/updates/:id/` detail route.

use serde::{Deserialize, Serialize};

/// Kind of update card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    /// Rolled-up summary of the member's day
    Today,
    /// Upcoming appointment
    Appointment,
    /// A reminder
    Reminder,
    /// Message from one of the member's circles
    Circle,
    /// Daily inspiration
    Inspiration,
}

/// One highlight row on the today-summary card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    /// Leading emoji
    pub icon: String,
    /// Highlight text
    pub text: String,
}

/// One card in the home updates deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCard {
    /// Stable identifier, also the detail-route parameter
    pub id: String,
    /// Card kind
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    /// Card title
    pub title: String,
    /// Secondary line (time, source, count)
    pub meta: String,
    /// Main card text
    pub body: String,
    /// Highlight rows (today-summary card only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<Highlight>,
}

impl UpdateCard {
    /// Path of the card's detail screen
    pub fn detail_path(&self) -> String {
        format!("/updates/{}/", self.id)
    }
}

fn card(id: &str, kind: UpdateKind, title: &str, meta: &str, body: &str) -> UpdateCard {
    UpdateCard {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        meta: meta.to_string(),
        body: body.to_string(),
        highlights: Vec::new(),
    }
}

fn highlight(icon: &str, text: &str) -> Highlight {
    Highlight {
        icon: icon.to_string(),
        text: text.to_string(),
    }
}

/// The demo cards in deck order
pub fn demo_updates() -> Vec<UpdateCard> {
    let mut today = card(
        "today",
        UpdateKind::Today,
        "Today summary",
        "3 highlights",
        "One step at a time — here’s what’s up next.",
    );
    today.highlights = vec![
        highlight("📅", "Therapy • 6:30 PM • Telehealth"),
        highlight("⏰", "Reminder • Pack for meeting • In 2 hours"),
        highlight("👥", "Circle • Sam: “Day 90 today… it gets lighter.”"),
    ];

    vec![
        today,
        card(
            "appt-101",
            UpdateKind::Appointment,
            "Upcoming appointment",
            "Today • 6:30 PM • Telehealth",
            "Therapy session with Dr. Cohen",
        ),
        card(
            "rem-204",
            UpdateKind::Reminder,
            "Reminder",
            "In 2 hours",
            "Pack your meeting book + plan your ride",
        ),
        card(
            "circle-880",
            UpdateKind::Circle,
            "From your circles",
            "Sam • Serenity Circle",
            "“Day 90 today. If you’re at day 1, I promise it gets lighter.”",
        ),
        card(
            "inspo-001",
            UpdateKind::Inspiration,
            "Daily reminder",
            "Reflection • Anytime",
            "Recovery is not a race. You don’t have to feel guilty if it takes you longer than you thought it would.",
        ),
    ]
}

/// Look up a demo card by id
pub fn find_update(id: &str) -> Option<UpdateCard> {
    demo_updates().into_iter().find(|card| card.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_updates_content() {
        let updates = demo_updates();
        assert_eq!(updates.len(), 5);

        let today = &updates[0];
        assert_eq!(today.id, "today");
        assert_eq!(today.kind, UpdateKind::Today);
        assert_eq!(today.meta, "3 highlights");
        assert_eq!(today.highlights.len(), 3);
        assert_eq!(today.highlights[0].icon, "📅");
        assert_eq!(
            today.highlights[2].text,
            "Circle • Sam: “Day 90 today… it gets lighter.”"
        );

        let appointment = &updates[1];
        assert_eq!(appointment.id, "appt-101");
        assert_eq!(appointment.meta, "Today • 6:30 PM • Telehealth");
        assert_eq!(appointment.body, "Therapy session with Dr. Cohen");
        assert!(appointment.highlights.is_empty());

        let inspiration = &updates[4];
        assert_eq!(inspiration.kind, UpdateKind::Inspiration);
        assert_eq!(inspiration.meta, "Reflection • Anytime");
    }

    #[test]
    fn find_update_by_id() {
        let card = find_update("circle-880").unwrap();
        assert_eq!(card.title, "From your circles");
        assert_eq!(card.meta, "Sam • Serenity Circle");

        assert!(find_update("missing").is_none());
    }

    #[test]
    fn detail_path_embeds_the_id() {
        let card = find_update("rem-204").unwrap();
        assert_eq!(card.detail_path(), "/updates/rem-204/");
    }

    #[test]
    fn card_serializes_with_a_type_field() {
        let card = find_update("appt-101").unwrap();
        let json = serde_json::to_string(&card).unwrap();

        assert!(json.contains("\"type\":\"appointment\""));
        assert!(!json.contains("\"kind\""));
        // Cards without highlight rows leave the field out entirely.
        assert!(!json.contains("highlights"));

        let parsed: UpdateCard = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, card);
    }
}
