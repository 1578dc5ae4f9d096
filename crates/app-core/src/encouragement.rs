//! Daily encouragement message
//!
//! One message from a fixed list is shown per day. Selection hashes the
//! local date key `YYYY-M-D` so every screen refresh on the same day lands
//! on the same message.

use chrono::{Datelike, Local, NaiveDate};

/// The rotating encouragement messages
pub const MESSAGES: [&str; 13] = [
    "You showed up today. That counts.",
    "Small steps, real progress.",
    "One day at a time — you’re building something strong.",
    "Your future self is rooting for you.",
    "Hard days don’t cancel your growth.",
    "Keep it simple. Keep it moving.",
    "Recovery is momentum — you’ve got it.",
    "You’re doing the work. Be proud of that.",
    "Stay close to what helps you stay well.",
    "Today is a win if you stay with it.",
    "You don’t have to do this perfectly — just honestly.",
    "You’re stronger than the urge.",
    "Breathe. Reset. Continue.",
];

/// Message shown when the list lookup has nothing to offer
pub const FALLBACK_MESSAGE: &str = "Keep going.";

/// Deterministic list index for a date
///
/// Hashes the date key `YYYY-M-D` (months and days unpadded) with
/// `hash = hash * 31 + byte` in wrapping unsigned 32-bit arithmetic, then
/// reduces modulo `list_length`. An empty list yields index 0.
pub fn daily_index(date: NaiveDate, list_length: usize) -> usize {
    let key = format!("{}-{}-{}", date.year(), date.month(), date.day());

    let mut hash: u32 = 0;
    for byte in key.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
    }

    if list_length == 0 {
        0
    } else {
        hash as usize % list_length
    }
}

/// The message for a specific date
pub fn message_for(date: NaiveDate) -> &'static str {
    MESSAGES
        .get(daily_index(date, MESSAGES.len()))
        .copied()
        .unwrap_or(FALLBACK_MESSAGE)
}

/// The message for today's local date
pub fn todays_message() -> &'static str {
    message_for(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn index_is_stable_for_a_date() {
        let day = date(2024, 5, 10);
        assert_eq!(
            daily_index(day, MESSAGES.len()),
            daily_index(day, MESSAGES.len())
        );
    }

    #[test]
    fn known_date_selects_expected_message() {
        // "2024-5-10" hashes to 534549348, and 534549348 % 13 == 8.
        assert_eq!(daily_index(date(2024, 5, 10), MESSAGES.len()), 8);
        assert_eq!(
            message_for(date(2024, 5, 10)),
            "Stay close to what helps you stay well."
        );
    }

    #[test]
    fn index_stays_in_range_across_a_month() {
        for day in 1..=31 {
            let idx = daily_index(date(2024, 1, day), MESSAGES.len());
            assert!(idx < MESSAGES.len());
        }
    }

    #[test]
    fn messages_vary_across_a_month() {
        let indices: Vec<usize> = (1..=31)
            .map(|day| daily_index(date(2024, 1, day), MESSAGES.len()))
            .collect();
        let first = indices[0];
        assert!(indices.iter().any(|&idx| idx != first));
    }

    #[test]
    fn empty_list_yields_zero() {
        assert_eq!(daily_index(date(2024, 5, 10), 0), 0);
    }

    #[test]
    fn list_has_thirteen_messages() {
        assert_eq!(MESSAGES.len(), 13);
    }
}
