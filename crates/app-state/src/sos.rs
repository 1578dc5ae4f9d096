//! Emergency support overlay state
//!
//! The SOS overlay can be opened from anywhere in the app (bottom navigation,
//! keyboard shortcut), so its open/closed state lives here rather than in any
//! one screen. Components subscribe through a watch channel for the current
//! value or a broadcast channel for transition events.

use parking_lot::RwLock;
use tokio::sync::{broadcast, watch};

/// Events emitted when the overlay transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SosEvent {
    /// The overlay was opened
    Opened,

    /// The overlay was closed
    Closed,
}

/// Shared open/closed state for the emergency support overlay.
///
/// Open and close are synchronous so UI event handlers can call them without
/// an executor handle. Share the channel via `Arc`.
#[derive(Debug)]
pub struct SosChannel {
    open: RwLock<bool>,
    open_tx: watch::Sender<bool>,
    events_tx: broadcast::Sender<SosEvent>,
}

impl SosChannel {
    /// Create a closed channel
    pub fn new() -> Self {
        let (open_tx, _) = watch::channel(false);
        let (events_tx, _) = broadcast::channel(16);

        Self {
            open: RwLock::new(false),
            open_tx,
            events_tx,
        }
    }

    /// Open the overlay. Does nothing if already open.
    pub fn open(&self) {
        let mut open = self.open.write();
        if !*open {
            *open = true;
            drop(open);
            let _ = self.open_tx.send(true);
            let _ = self.events_tx.send(SosEvent::Opened);
            tracing::info!("sos overlay opened");
        }
    }

    /// Close the overlay. Does nothing if already closed.
    pub fn close(&self) {
        let mut open = self.open.write();
        if *open {
            *open = false;
            drop(open);
            let _ = self.open_tx.send(false);
            let _ = self.events_tx.send(SosEvent::Closed);
        }
    }

    /// Flip the overlay state
    pub fn toggle(&self) {
        let now_open = {
            let mut open = self.open.write();
            *open = !*open;
            *open
        };

        let _ = self.open_tx.send(now_open);
        let _ = self.events_tx.send(if now_open {
            SosEvent::Opened
        } else {
            SosEvent::Closed
        });

        if now_open {
            tracing::info!("sos overlay opened");
        }
    }

    /// Whether the overlay is currently open
    pub fn is_open(&self) -> bool {
        *self.open.read()
    }

    /// Subscribe to the current open/closed value
    pub fn subscribe_open(&self) -> watch::Receiver<bool> {
        self.open_tx.subscribe()
    }

    /// Subscribe to transition events
    pub fn subscribe_events(&self) -> broadcast::Receiver<SosEvent> {
        self.events_tx.subscribe()
    }
}

impl Default for SosChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[tokio::test]
    async fn starts_closed() {
        let channel = SosChannel::new();
        assert!(!channel.is_open());
        assert!(!*channel.subscribe_open().borrow());
    }

    #[tokio::test]
    async fn open_and_close_update_state() {
        let channel = SosChannel::new();

        channel.open();
        assert!(channel.is_open());

        channel.close();
        assert!(!channel.is_open());
    }

    #[tokio::test]
    async fn open_notifies_watch_subscribers() {
        let channel = SosChannel::new();
        let mut rx = channel.subscribe_open();

        channel.open();

        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn transitions_emit_events() {
        let channel = SosChannel::new();
        let mut rx = channel.subscribe_events();

        channel.open();
        channel.close();

        assert_eq!(rx.try_recv().unwrap(), SosEvent::Opened);
        assert_eq!(rx.try_recv().unwrap(), SosEvent::Closed);
    }

    #[tokio::test]
    async fn repeated_open_emits_single_event() {
        let channel = SosChannel::new();
        let mut rx = channel.subscribe_events();

        channel.open();
        channel.open();

        assert_eq!(rx.try_recv().unwrap(), SosEvent::Opened);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn close_when_closed_is_silent() {
        let channel = SosChannel::new();
        let mut rx = channel.subscribe_events();

        channel.close();

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn toggle_flips_and_notifies() {
        let channel = SosChannel::new();
        let mut rx = channel.subscribe_events();

        channel.toggle();
        assert!(channel.is_open());

        channel.toggle();
        assert!(!channel.is_open());

        assert_eq!(rx.try_recv().unwrap(), SosEvent::Opened);
        assert_eq!(rx.try_recv().unwrap(), SosEvent::Closed);
    }
}
