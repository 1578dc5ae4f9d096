//! Sobriety counter
//!
//! Pure time helpers, the four counter display modes, and the ticker service
//! that recomputes the counter once per second. Day counts follow local
//! midnights: going to bed at 23:59 and waking at 00:01 is one more day even
//! though only two minutes elapsed.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch, RwLock};

/// Day offset used when no explicit start datetime is known
pub const DEFAULT_SOBRIETY_DAYS: i64 = 45;

// =============================================================================
// Time helpers
// =============================================================================

/// Elapsed time split into calendar-free components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    /// Whole days
    pub days: i64,
    /// Hours remainder (0-23)
    pub hours: i64,
    /// Minutes remainder (0-59)
    pub mins: i64,
    /// Seconds remainder (0-59)
    pub secs: i64,
}

/// Split a second count into days/hours/minutes/seconds
///
/// Negative inputs clamp to zero.
pub fn split_seconds(total: i64) -> TimeParts {
    let s = total.max(0);
    let days = s / 86_400;
    let rem = s - days * 86_400;
    let hours = rem / 3_600;
    let rem = rem - hours * 3_600;
    let mins = rem / 60;
    let secs = rem - mins * 60;
    TimeParts {
        days,
        hours,
        mins,
        secs,
    }
}

/// Render a number as at least two digits
pub fn pad2(n: i64) -> String {
    format!("{:02}", n.unsigned_abs())
}

/// Whole local-midnight boundaries crossed between two instants
///
/// Negative when `now` is before `start`.
pub fn days_between_local(start: DateTime<Local>, now: DateTime<Local>) -> i64 {
    now.date_naive()
        .signed_duration_since(start.date_naive())
        .num_days()
}

/// Seconds remaining until the next local midnight
///
/// Naive local arithmetic; a DST shift overnight skews this by the shift
/// amount on the transition night.
pub fn seconds_until_next_local_midnight(now: DateTime<Local>) -> i64 {
    let midnight = (now.date_naive() + Days::new(1)).and_time(NaiveTime::MIN);
    midnight
        .signed_duration_since(now.naive_local())
        .num_seconds()
        .max(0)
}

/// Resolve the counter's start instant
///
/// An explicit start datetime wins when it parses (RFC 3339, a naive
/// `YYYY-MM-DDTHH:MM:SS`, or a bare date). Otherwise the start is `now`
/// minus the given day offset.
pub fn resolve_start_date(start: Option<&str>, days: i64, now: DateTime<Local>) -> DateTime<Local> {
    if let Some(raw) = start {
        if let Some(parsed) = parse_start(raw) {
            return parsed;
        }
    }
    now - chrono::Duration::days(days)
}

fn parse_start(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Local.from_local_datetime(&naive).earliest();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Local
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .earliest();
    }
    None
}

// =============================================================================
// Counter Modes
// =============================================================================

/// Display mode for the sobriety counter, cycled by tapping the card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CounterMode {
    /// Whole day count
    Days,
    /// Day count plus an hour remainder
    DaysHours,
    /// Running `D:HH:MM:SS` clock
    #[default]
    Clock,
    /// Countdown to the next sober day
    NextDay,
}

impl CounterMode {
    /// All modes in cycle order
    pub const ALL: [CounterMode; 4] = [
        CounterMode::Days,
        CounterMode::DaysHours,
        CounterMode::Clock,
        CounterMode::NextDay,
    ];

    /// Stable identifier, used for persisted preferences
    pub fn id(&self) -> &'static str {
        match self {
            CounterMode::Days => "days",
            CounterMode::DaysHours => "daysHours",
            CounterMode::Clock => "clock",
            CounterMode::NextDay => "nextDay",
        }
    }

    /// Human-readable mode label
    pub fn label(&self) -> &'static str {
        match self {
            CounterMode::Days => "Days",
            CounterMode::DaysHours => "Days+Hours",
            CounterMode::Clock => "Clock",
            CounterMode::NextDay => "Next Day",
        }
    }

    /// The next mode in cycle order, wrapping at the end
    pub fn next(self) -> Self {
        match self {
            CounterMode::Days => CounterMode::DaysHours,
            CounterMode::DaysHours => CounterMode::Clock,
            CounterMode::Clock => CounterMode::NextDay,
            CounterMode::NextDay => CounterMode::Days,
        }
    }

    /// Parse a persisted identifier, falling back to the default mode
    pub fn from_id(id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|mode| mode.id() == id)
            .unwrap_or_default()
    }
}

// =============================================================================
// Counter
// =============================================================================

/// One rendered reading of the counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// Mode the reading was rendered for
    pub mode: CounterMode,
    /// Local-midnight day count
    pub days: i64,
    /// Main display line
    pub main: String,
    /// Secondary line under the main display
    pub sub: String,
    /// Accessibility label for the reading
    pub aria: String,
}

/// Sobriety counter anchored to a start instant
///
/// # Examples
/// ```
/// use app_core::sobriety::{CounterMode, SobrietyCounter};
/// use chrono::{Local, TimeZone};
///
/// let start = Local.with_ymd_and_hms(2024, 1, 12, 9, 0, 0).unwrap();
/// let now = Local.with_ymd_and_hms(2024, 1, 14, 10, 30, 5).unwrap();
/// let counter = SobrietyCounter::new(start);
///
/// let snapshot = counter.snapshot_at(CounterMode::Days, now);
/// assert_eq!(snapshot.main, "2");
/// assert_eq!(snapshot.sub, "days");
/// ```
#[derive(Debug, Clone)]
pub struct SobrietyCounter {
    start: DateTime<Local>,
}

impl SobrietyCounter {
    /// Create a counter with an explicit start instant
    pub fn new(start: DateTime<Local>) -> Self {
        Self { start }
    }

    /// Create a counter from a raw start string and day-offset fallback
    pub fn resolve(start: Option<&str>, days: i64) -> Self {
        Self::new(resolve_start_date(start, days, Local::now()))
    }

    /// The resolved start instant
    pub fn start(&self) -> DateTime<Local> {
        self.start
    }

    /// Render the counter for the current wall clock
    pub fn snapshot(&self, mode: CounterMode) -> CounterSnapshot {
        self.snapshot_at(mode, Local::now())
    }

    /// Render the counter at an explicit instant
    pub fn snapshot_at(&self, mode: CounterMode, now: DateTime<Local>) -> CounterSnapshot {
        let elapsed_secs = now.signed_duration_since(self.start).num_seconds().max(0);
        let elapsed = split_seconds(elapsed_secs);
        let days_local = days_between_local(self.start, now).max(0);
        let until_next = split_seconds(seconds_until_next_local_midnight(now));

        // Day digits follow local midnights; the HH:MM:SS remainder follows
        // raw elapsed time.
        let (main, sub, aria) = match mode {
            CounterMode::Days => (
                format!("{}", days_local),
                "days".to_string(),
                format!("{} days sober", days_local),
            ),
            CounterMode::DaysHours => (
                format!("{}d {}h", days_local, pad2(elapsed.hours)),
                "sober".to_string(),
                format!("{} days and {} hours sober", days_local, elapsed.hours),
            ),
            CounterMode::NextDay => {
                let h = pad2(until_next.hours);
                let m = pad2(until_next.mins);
                let s = pad2(until_next.secs);
                (
                    format!("{}:{}:{}", h, m, s),
                    format!("until day {}", days_local + 1),
                    format!(
                        "{} hours {} minutes {} seconds until day {}",
                        h,
                        m,
                        s,
                        days_local + 1
                    ),
                )
            }
            CounterMode::Clock => {
                let hh = pad2(elapsed.hours);
                let mm = pad2(elapsed.mins);
                let ss = pad2(elapsed.secs);
                (
                    format!("{}:{}:{}:{}", days_local, hh, mm, ss),
                    "DD:HH:MM:SS".to_string(),
                    format!(
                        "{} days {} hours {} minutes {} seconds sober",
                        days_local, hh, mm, ss
                    ),
                )
            }
        };

        CounterSnapshot {
            mode,
            days: days_local,
            main,
            sub,
            aria,
        }
    }
}

// =============================================================================
// Ticker Service
// =============================================================================

/// Sobriety clock publishing one [`CounterSnapshot`] per second
///
/// The current mode lives on the clock so the ticker task and the tap
/// handler observe the same value. Subscribers receive snapshots through a
/// watch channel.
pub struct SobrietyClock {
    counter: SobrietyCounter,
    mode: RwLock<CounterMode>,
    snapshot_tx: watch::Sender<CounterSnapshot>,
}

impl SobrietyClock {
    /// Create a clock seeded with an initial snapshot
    pub fn new(counter: SobrietyCounter, mode: CounterMode) -> Self {
        let (snapshot_tx, _) = watch::channel(counter.snapshot(mode));
        Self {
            counter,
            mode: RwLock::new(mode),
            snapshot_tx,
        }
    }

    /// The underlying counter
    pub fn counter(&self) -> &SobrietyCounter {
        &self.counter
    }

    /// The current display mode
    pub async fn mode(&self) -> CounterMode {
        *self.mode.read().await
    }

    /// The most recently published snapshot
    pub fn snapshot(&self) -> CounterSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<CounterSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Recompute and publish a snapshot for the current mode
    pub async fn tick(&self) {
        let mode = *self.mode.read().await;
        let _ = self.snapshot_tx.send(self.counter.snapshot(mode));
    }

    /// Switch to a specific display mode and publish immediately
    pub async fn set_mode(&self, mode: CounterMode) {
        {
            let mut current = self.mode.write().await;
            if *current == mode {
                return;
            }
            *current = mode;
        }
        let _ = self.snapshot_tx.send(self.counter.snapshot(mode));
    }

    /// Advance to the next display mode, publish, and return the new mode
    pub async fn cycle_mode(&self) -> CounterMode {
        let next = {
            let mut mode = self.mode.write().await;
            *mode = mode.next();
            *mode
        };
        let _ = self.snapshot_tx.send(self.counter.snapshot(next));
        next
    }

    /// Start the one-second ticker task
    ///
    /// The returned handle stops the task when dropped.
    pub fn start_ticking(self: &Arc<Self>, interval: Duration) -> TickerHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let clock = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut tick_interval = tokio::time::interval(interval);

            loop {
                tokio::select! {
                    _ = tick_interval.tick() => {
                        clock.tick().await;
                    }
                    _ = &mut stop_rx => {
                        break;
                    }
                }
            }

            tracing::debug!("sobriety ticker stopped");
        });

        TickerHandle {
            stop_tx: Some(stop_tx),
            _handle: handle,
        }
    }
}

/// Handle for the running ticker task
///
/// When dropped, the ticker task is stopped.
pub struct TickerHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl TickerHandle {
    /// Stop the ticker manually
    pub fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn split_seconds_splits_components() {
        let parts = split_seconds(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5);
        assert_eq!(parts.days, 2);
        assert_eq!(parts.hours, 3);
        assert_eq!(parts.mins, 4);
        assert_eq!(parts.secs, 5);
    }

    #[test]
    fn split_seconds_clamps_negative() {
        let parts = split_seconds(-10);
        assert_eq!(
            parts,
            TimeParts {
                days: 0,
                hours: 0,
                mins: 0,
                secs: 0
            }
        );
    }

    #[test]
    fn pad2_pads_single_digits() {
        assert_eq!(pad2(7), "07");
        assert_eq!(pad2(45), "45");
        assert_eq!(pad2(-3), "03");
        assert_eq!(pad2(0), "00");
    }

    #[test]
    fn seconds_until_midnight_counts_down() {
        assert_eq!(
            seconds_until_next_local_midnight(local(2024, 5, 10, 23, 59, 30)),
            30
        );
        assert_eq!(
            seconds_until_next_local_midnight(local(2024, 5, 10, 0, 0, 0)),
            86_400
        );
    }

    #[test]
    fn days_mode_counts_local_midnights() {
        // Two minutes of elapsed time, but a midnight was crossed.
        let counter = SobrietyCounter::new(local(2024, 5, 10, 23, 59, 0));
        let snapshot = counter.snapshot_at(CounterMode::Days, local(2024, 5, 11, 0, 1, 0));

        assert_eq!(snapshot.days, 1);
        assert_eq!(snapshot.main, "1");
        assert_eq!(snapshot.sub, "days");
        assert_eq!(snapshot.aria, "1 days sober");
    }

    #[test]
    fn clock_mode_pairs_day_count_with_elapsed_remainder() {
        let counter = SobrietyCounter::new(local(2024, 5, 10, 22, 0, 0));
        let snapshot = counter.snapshot_at(CounterMode::Clock, local(2024, 5, 11, 1, 30, 5));

        assert_eq!(snapshot.main, "1:03:30:05");
        assert_eq!(snapshot.sub, "DD:HH:MM:SS");
        assert_eq!(snapshot.aria, "1 days 03 hours 30 minutes 05 seconds sober");
    }

    #[test]
    fn days_hours_mode_renders_hours_remainder() {
        let counter = SobrietyCounter::new(local(2024, 5, 10, 8, 0, 0));
        let snapshot = counter.snapshot_at(CounterMode::DaysHours, local(2024, 5, 12, 10, 0, 0));

        assert_eq!(snapshot.main, "2d 02h");
        assert_eq!(snapshot.sub, "sober");
        assert_eq!(snapshot.aria, "2 days and 2 hours sober");
    }

    #[test]
    fn next_day_mode_counts_down_to_midnight() {
        let counter = SobrietyCounter::new(local(2024, 5, 1, 12, 0, 0));
        let snapshot = counter.snapshot_at(CounterMode::NextDay, local(2024, 5, 10, 23, 59, 30));

        assert_eq!(snapshot.main, "00:00:30");
        assert_eq!(snapshot.sub, "until day 10");
        assert_eq!(
            snapshot.aria,
            "00 hours 00 minutes 30 seconds until day 10"
        );
    }

    #[test]
    fn future_start_clamps_to_zero() {
        let counter = SobrietyCounter::new(local(2024, 5, 20, 0, 0, 0));
        let now = local(2024, 5, 10, 12, 0, 0);

        assert_eq!(counter.snapshot_at(CounterMode::Days, now).main, "0");
        assert_eq!(
            counter.snapshot_at(CounterMode::Clock, now).main,
            "0:00:00:00"
        );
    }

    #[test]
    fn mode_cycle_wraps() {
        assert_eq!(CounterMode::Days.next(), CounterMode::DaysHours);
        assert_eq!(CounterMode::DaysHours.next(), CounterMode::Clock);
        assert_eq!(CounterMode::Clock.next(), CounterMode::NextDay);
        assert_eq!(CounterMode::NextDay.next(), CounterMode::Days);

        let mut mode = CounterMode::Clock;
        for _ in 0..CounterMode::ALL.len() {
            mode = mode.next();
        }
        assert_eq!(mode, CounterMode::Clock);
    }

    #[test]
    fn mode_from_id_falls_back_to_clock() {
        assert_eq!(CounterMode::from_id("days"), CounterMode::Days);
        assert_eq!(CounterMode::from_id("daysHours"), CounterMode::DaysHours);
        assert_eq!(CounterMode::from_id("nextDay"), CounterMode::NextDay);
        assert_eq!(CounterMode::from_id("bogus"), CounterMode::Clock);
    }

    #[test]
    fn resolve_start_honors_parseable_datetime() {
        let now = local(2024, 1, 14, 9, 0, 0);
        let start = resolve_start_date(Some("2024-01-12T09:00:00"), 45, now);
        assert_eq!(days_between_local(start, now), 2);
    }

    #[test]
    fn resolve_start_falls_back_to_day_offset() {
        let now = local(2024, 5, 10, 12, 0, 0);

        let start = resolve_start_date(None, 45, now);
        assert_eq!(days_between_local(start, now), 45);

        let unparseable = resolve_start_date(Some("not a date"), 45, now);
        assert_eq!(days_between_local(unparseable, now), 45);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_publishes_snapshots() {
        let counter = SobrietyCounter::resolve(None, DEFAULT_SOBRIETY_DAYS);
        let clock = Arc::new(SobrietyClock::new(counter, CounterMode::Clock));
        let mut rx = clock.subscribe();

        let _handle = clock.start_ticking(Duration::from_secs(1));
        rx.changed().await.unwrap();

        assert_eq!(rx.borrow().mode, CounterMode::Clock);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_stops_after_handle_drop() {
        let counter = SobrietyCounter::resolve(None, DEFAULT_SOBRIETY_DAYS);
        let clock = Arc::new(SobrietyClock::new(counter, CounterMode::Clock));
        let mut rx = clock.subscribe();

        let handle = clock.start_ticking(Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(rx.has_changed().unwrap());

        handle.stop();
        // Let the task observe the stop before checking for silence.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = rx.borrow_and_update();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn cycle_mode_publishes_immediately() {
        let counter = SobrietyCounter::resolve(None, DEFAULT_SOBRIETY_DAYS);
        let clock = Arc::new(SobrietyClock::new(counter, CounterMode::Clock));
        let mut rx = clock.subscribe();

        let next = clock.cycle_mode().await;
        assert_eq!(next, CounterMode::NextDay);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().mode, CounterMode::NextDay);

        // Setting the same mode again is a no-op.
        clock.set_mode(CounterMode::NextDay).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn snapshot_serializes_mode_id() {
        let counter = SobrietyCounter::new(local(2024, 1, 12, 9, 0, 0));
        let snapshot = counter.snapshot_at(CounterMode::DaysHours, local(2024, 1, 14, 9, 0, 0));

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"daysHours\""));
    }
}
