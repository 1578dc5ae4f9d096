//! Recovery log
//!
//! Domain types behind the log screens (daily check-in, milestones, goals,
//! triggers) plus the in-memory log book that collects saved entries.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::checkin::CheckInRecord;

// =============================================================================
// Catalog Enums
// =============================================================================

/// Mood pill on the daily check-in screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// 🙏 Grateful (the pre-selected pill)
    #[default]
    Grateful,
    /// 🙂 Okay
    Okay,
    /// 😟 Stressed
    Stressed,
    /// 😞 Low
    Low,
    /// 🔥 Energized
    Energized,
}

impl Mood {
    /// All moods in display order
    pub const ALL: [Mood; 5] = [
        Mood::Grateful,
        Mood::Okay,
        Mood::Stressed,
        Mood::Low,
        Mood::Energized,
    ];

    /// Emoji shown on the pill
    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Grateful => "🙏",
            Mood::Okay => "🙂",
            Mood::Stressed => "😟",
            Mood::Low => "😞",
            Mood::Energized => "🔥",
        }
    }

    /// Text shown on the pill
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Grateful => "Grateful",
            Mood::Okay => "Okay",
            Mood::Stressed => "Stressed",
            Mood::Low => "Low",
            Mood::Energized => "Energized",
        }
    }

    /// Full pill text, emoji first
    pub fn pill(&self) -> String {
        format!("{} {}", self.emoji(), self.label())
    }
}

/// Reminder cadence for a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReminderCadence {
    /// Remind every day
    Daily,
    /// Remind every week
    Weekly,
    /// Remind on the target date only
    OnTargetDate,
    /// Never remind
    NoReminders,
}

impl ReminderCadence {
    /// All cadences in display order
    pub const ALL: [ReminderCadence; 4] = [
        ReminderCadence::Daily,
        ReminderCadence::Weekly,
        ReminderCadence::OnTargetDate,
        ReminderCadence::NoReminders,
    ];

    /// Toggle label
    pub fn label(&self) -> &'static str {
        match self {
            ReminderCadence::Daily => "Daily",
            ReminderCadence::Weekly => "Weekly",
            ReminderCadence::OnTargetDate => "On target date only",
            ReminderCadence::NoReminders => "No reminders",
        }
    }
}

/// What kind of thing a trigger is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerKind {
    /// A person
    Person,
    /// A place
    Place,
    /// A thing
    Thing,
    /// A date or recurring event
    DateEvent,
}

impl TriggerKind {
    /// All kinds in display order
    pub const ALL: [TriggerKind; 4] = [
        TriggerKind::Person,
        TriggerKind::Place,
        TriggerKind::Thing,
        TriggerKind::DateEvent,
    ];

    /// Toggle label
    pub fn label(&self) -> &'static str {
        match self {
            TriggerKind::Person => "Person",
            TriggerKind::Place => "Place",
            TriggerKind::Thing => "Thing",
            TriggerKind::DateEvent => "Date / event",
        }
    }
}

// =============================================================================
// Week at a Glance
// =============================================================================

/// Tone of a week-at-a-glance cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlanceTone {
    /// A good day
    Good,
    /// A middling day
    Ok,
    /// A rough day
    Bad,
}

/// One cell of the week-at-a-glance strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlanceDay {
    /// Short weekday label
    pub day: String,
    /// Mood emoji for the day
    pub emoji: String,
    /// Cell tone
    pub tone: GlanceTone,
}

/// The demo week shown under the daily check-in form
pub fn week_at_a_glance() -> Vec<GlanceDay> {
    let rows = [
        ("Mon", "😊", GlanceTone::Good),
        ("Tue", "😐", GlanceTone::Ok),
        ("Wed", "🙂", GlanceTone::Good),
        ("Thu", "😟", GlanceTone::Bad),
        ("Fri", "🔥", GlanceTone::Good),
        ("Sat", "😌", GlanceTone::Ok),
        ("Sun", "😊", GlanceTone::Good),
    ];

    rows.into_iter()
        .map(|(day, emoji, tone)| GlanceDay {
            day: day.to_string(),
            emoji: emoji.to_string(),
            tone,
        })
        .collect()
}

// =============================================================================
// Entry Models
// =============================================================================

/// A saved daily check-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// Entry date as the member typed it, e.g. "Today"
    pub date: String,
    /// Selected mood pill
    pub mood: Mood,
    /// Cravings or triggers that came up
    pub cravings: String,
    /// Wins to remember
    pub wins: String,
}

/// A saved sobriety milestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone title, e.g. "30 days sober"
    pub title: String,
    /// Milestone date
    pub date: String,
    /// What the milestone means to the member
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A saved recovery goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Goal text, e.g. "Go to 3 meetings this week"
    pub title: String,
    /// Optional target date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    /// Why the goal matters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    /// Selected reminder cadence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence: Option<ReminderCadence>,
}

/// A saved trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerEntry {
    /// Trigger kind
    pub kind: TriggerKind,
    /// What the trigger is
    pub name: String,
    /// Why it is a trigger or what usually happens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Where it happens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Notify when the member enters the location
    pub notify_on_location: bool,
    /// Remind the next time the event occurs
    pub remind_on_event: bool,
    /// Send a morning awareness reminder
    pub morning_reminder: bool,
    /// Optional event date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
}

/// Any entry the log book can hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entry", rename_all = "lowercase")]
pub enum LogEntry {
    /// Daily check-in
    Daily(DailyEntry),
    /// Sobriety milestone
    Milestone(Milestone),
    /// Recovery goal
    Goal(Goal),
    /// Trigger
    Trigger(TriggerEntry),
    /// Location check-in
    Checkin(CheckInRecord),
}

impl LogEntry {
    /// Short name of the entry kind
    pub fn kind(&self) -> &'static str {
        match self {
            LogEntry::Daily(_) => "daily",
            LogEntry::Milestone(_) => "milestone",
            LogEntry::Goal(_) => "goal",
            LogEntry::Trigger(_) => "trigger",
            LogEntry::Checkin(_) => "checkin",
        }
    }
}

// =============================================================================
// Log Book
// =============================================================================

/// In-memory collection of saved log entries
///
/// Entries live for the lifetime of the app; the export exists so a member
/// can take their log with them.
#[derive(Debug, Default)]
pub struct LogBook {
    entries: RwLock<Vec<LogEntry>>,
}

impl LogBook {
    /// Create an empty log book
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub async fn record(&self, entry: LogEntry) {
        tracing::info!(kind = entry.kind(), "log entry saved");
        self.entries.write().await.push(entry);
    }

    /// All entries in the order they were saved
    pub async fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().await.clone()
    }

    /// Number of saved entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the book has no entries yet
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Export every entry as pretty-printed JSON
    pub async fn export_json(&self) -> serde_json::Result<String> {
        let entries = self.entries.read().await;
        serde_json::to_string_pretty(&*entries)
    }
}
