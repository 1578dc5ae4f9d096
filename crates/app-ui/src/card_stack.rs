//! Swipeable card stack for browsable decks
//!
//! Shows one active card with up to two more peeking behind it. A horizontal
//! pointer drag past the commit threshold advances or retreats the deck;
//! anything short of it springs back. Vertical drags are treated as scroll
//! intent and leave the deck alone. The stack itself is a synchronous state
//! machine; animation phases are completed by [`CardStack::settle`], driven
//! either by the host's animation-end notification or by a [`SettleTimer`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

// =============================================================================
// Gesture Constants
// =============================================================================

/// Displacement before a gesture locks to an axis
pub const AXIS_LOCK_THRESHOLD: f32 = 8.0;
/// Horizontal distance a release must exceed to commit a swipe
pub const COMMIT_THRESHOLD: f32 = 110.0;
/// Horizontal distance at which a dragged card reaches the opacity floor
pub const FADE_DISTANCE: f32 = 520.0;
/// Divisor mapping horizontal displacement to rotation degrees
pub const ROTATION_DIVISOR: f32 = 20.0;
/// Rotation clamp while dragging, in degrees
pub const MAX_ROTATION_DEG: f32 = 10.0;
/// Rotation of a card animating off-screen, in degrees
pub const EXIT_ROTATION_DEG: f32 = 14.0;
/// Fraction of vertical displacement carried into the drag transform
pub const VERTICAL_DAMPING: f32 = 0.12;
/// Opacity floor while dragging
pub const MIN_DRAG_OPACITY: f32 = 0.25;
/// Length of the off-screen exit animation
pub const EXIT_DURATION: Duration = Duration::from_millis(180);
/// Length of the spring-back animation
pub const SETTLE_DURATION: Duration = Duration::from_millis(220);
/// Scale per stack depth, top card first
pub const PEEK_SCALES: [f32; 3] = [1.0, 0.975, 0.955];
/// Vertical offset per stack depth, top card first
pub const PEEK_OFFSETS: [f32; 3] = [0.0, 10.0, 18.0];

// =============================================================================
// Drag Transform
// =============================================================================

/// Transient transform applied to the top card
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragTransform {
    /// Horizontal translation in pixels
    pub x: f32,
    /// Vertical translation in pixels
    pub y: f32,
    /// Rotation in degrees
    pub rotation: f32,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
}

impl Default for DragTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

impl DragTransform {
    /// Whether the card sits in the idle pose
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// Gesture State
// =============================================================================

/// Axis a gesture has committed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockedAxis {
    /// Swipe intent
    Horizontal,
    /// Scroll intent
    Vertical,
}

/// Direction of a committed swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeDirection {
    /// Rightward drag, retreats to the previous card
    Right,
    /// Leftward drag, advances to the next card
    Left,
}

impl SwipeDirection {
    fn sign(&self) -> f32 {
        match self {
            SwipeDirection::Right => 1.0,
            SwipeDirection::Left => -1.0,
        }
    }
}

/// Outcome of releasing a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseOutcome {
    /// The card exits in the drag direction; the deck moves on settle
    Commit(SwipeDirection),
    /// The drag fell short; the card springs back to neutral
    SpringBack,
}

impl ReleaseOutcome {
    /// Length of the animation this release starts
    pub fn duration(&self) -> Duration {
        match self {
            ReleaseOutcome::Commit(_) => EXIT_DURATION,
            ReleaseOutcome::SpringBack => SETTLE_DURATION,
        }
    }
}

/// Animation phase of the top card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StackPhase {
    /// At rest
    #[default]
    Idle,
    /// Pointer down, tracking displacement
    Dragging,
    /// Animating off-screen ahead of an advance or retreat
    Exiting,
    /// Animating back to the idle pose
    SpringingBack,
}

/// In-flight pointer gesture on the top card
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Gesture {
    pointer_id: i64,
    start_x: f32,
    start_y: f32,
    dx: f32,
    dy: f32,
    locked: Option<LockedAxis>,
}

// =============================================================================
// Card Stack
// =============================================================================

/// Layout for one visible card in the stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardLayout {
    /// Index into the deck
    pub index: usize,
    /// Stack depth, `0` for the top card
    pub depth: usize,
    /// Resting scale at this depth
    pub scale: f32,
    /// Resting vertical offset at this depth
    pub y_offset: f32,
    /// Stacking order, higher on top
    pub z_index: i32,
    /// Whether this card receives pointer input
    pub interactive: bool,
}

/// Swipeable deck state.
///
/// The deck never fails: indices are clamped, unknown pointers are ignored,
/// and an empty deck ignores input entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardStack<T> {
    items: Vec<T>,
    active_index: usize,
    #[serde(skip)]
    transform: DragTransform,
    #[serde(skip)]
    phase: StackPhase,
    #[serde(skip)]
    gesture: Option<Gesture>,
    #[serde(skip)]
    pending: Option<SwipeDirection>,
}

impl<T> Default for CardStack<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> CardStack<T> {
    /// Create a deck over the given items
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            active_index: 0,
            transform: DragTransform::default(),
            phase: StackPhase::Idle,
            gesture: None,
            pending: None,
        }
    }

    /// Get the deck contents
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Get the number of cards
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the deck is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the active card index
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Get the active card
    pub fn active(&self) -> Option<&T> {
        self.items.get(self.active_index)
    }

    /// Get the transform currently applied to the top card
    pub fn transform(&self) -> DragTransform {
        self.transform
    }

    /// Get the current animation phase
    pub fn phase(&self) -> StackPhase {
        self.phase
    }

    /// Whether a settle animation is running
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, StackPhase::Exiting | StackPhase::SpringingBack)
    }

    /// Whether a drag is in flight
    pub fn is_dragging(&self) -> bool {
        self.phase == StackPhase::Dragging
    }

    /// Axis the in-flight gesture has locked to, if any
    pub fn locked_axis(&self) -> Option<LockedAxis> {
        self.gesture.as_ref().and_then(|g| g.locked)
    }

    /// Progress through the deck as a percentage
    pub fn progress_percent(&self) -> f32 {
        if self.items.is_empty() {
            0.0
        } else {
            (self.active_index + 1) as f32 / self.items.len() as f32 * 100.0
        }
    }

    /// Replace the deck contents.
    ///
    /// The active index is re-clamped into the new range and any in-flight
    /// gesture is discarded.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.active_index = self.active_index.min(self.max_index());
        self.reset_transform();
    }

    /// Advance to the next card, clamped at the end of the deck
    pub fn advance(&mut self) {
        self.advance_index();
        self.reset_transform();
    }

    /// Retreat to the previous card, clamped at the start of the deck
    pub fn retreat(&mut self) {
        self.retreat_index();
        self.reset_transform();
    }

    /// Jump straight to a card, clamped into range
    pub fn jump_to(&mut self, index: usize) {
        self.active_index = index.min(self.max_index());
        self.reset_transform();
    }

    /// Start a gesture on the top card.
    ///
    /// Only the primary button starts a drag; an empty deck and a card
    /// already committed off-screen ignore the press. Grabbing mid
    /// spring-back freezes the card and re-anchors the gesture origin.
    pub fn pointer_down(&mut self, pointer_id: i64, button: i16, x: f32, y: f32) {
        if self.items.is_empty() || button != 0 {
            return;
        }
        if self.phase == StackPhase::Exiting {
            return;
        }

        self.gesture = Some(Gesture {
            pointer_id,
            start_x: x,
            start_y: y,
            dx: 0.0,
            dy: 0.0,
            locked: None,
        });
        self.phase = StackPhase::Dragging;
    }

    /// Track pointer movement for the in-flight gesture.
    ///
    /// Displacement is always measured from the pointer-down origin. The
    /// first move past [`AXIS_LOCK_THRESHOLD`] on either axis locks the
    /// gesture to the larger displacement for its remainder.
    pub fn pointer_move(&mut self, pointer_id: i64, x: f32, y: f32) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        if gesture.pointer_id != pointer_id || self.phase != StackPhase::Dragging {
            return;
        }

        let dx = x - gesture.start_x;
        let dy = y - gesture.start_y;
        gesture.dx = dx;
        gesture.dy = dy;

        if gesture.locked.is_none() {
            let ax = dx.abs();
            let ay = dy.abs();
            if ax > AXIS_LOCK_THRESHOLD || ay > AXIS_LOCK_THRESHOLD {
                gesture.locked = Some(if ax >= ay {
                    LockedAxis::Horizontal
                } else {
                    LockedAxis::Vertical
                });
            }
        }

        // Scroll intent: the card stays put
        if gesture.locked == Some(LockedAxis::Vertical) {
            return;
        }

        let rotation = (dx / ROTATION_DIVISOR).clamp(-MAX_ROTATION_DEG, MAX_ROTATION_DEG);
        let opacity = (1.0 - dx.abs() / FADE_DISTANCE).clamp(MIN_DRAG_OPACITY, 1.0);
        self.transform = DragTransform {
            x: dx,
            y: dy * VERTICAL_DAMPING,
            rotation,
            opacity,
        };
    }

    /// Release the in-flight gesture.
    ///
    /// A horizontal drag past [`COMMIT_THRESHOLD`] sends the card
    /// off-screen and returns the committed direction; the deck index moves
    /// only once [`settle`] runs. Everything else springs back to neutral.
    ///
    /// [`settle`]: CardStack::settle
    pub fn pointer_up(&mut self, pointer_id: i64) -> Option<ReleaseOutcome> {
        if self.gesture.as_ref().map(|g| g.pointer_id) != Some(pointer_id) {
            return None;
        }
        let gesture = self.gesture.take()?;

        if gesture.locked == Some(LockedAxis::Vertical) {
            self.spring_back();
            return Some(ReleaseOutcome::SpringBack);
        }

        if gesture.dx.abs() > COMMIT_THRESHOLD {
            let direction = if gesture.dx > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            };
            self.transform = DragTransform {
                x: direction.sign() * FADE_DISTANCE,
                y: 0.0,
                rotation: direction.sign() * EXIT_ROTATION_DEG,
                opacity: 0.0,
            };
            self.phase = StackPhase::Exiting;
            self.pending = Some(direction);
            return Some(ReleaseOutcome::Commit(direction));
        }

        self.spring_back();
        Some(ReleaseOutcome::SpringBack)
    }

    /// Treat a platform pointer-cancel exactly like a release
    pub fn pointer_cancel(&mut self, pointer_id: i64) -> Option<ReleaseOutcome> {
        self.pointer_up(pointer_id)
    }

    /// Complete the current animation phase.
    ///
    /// After an exit this applies the committed advance or retreat and
    /// snaps the new top card into the idle pose; after a spring-back it
    /// returns the deck to rest. A no-op in any other phase, so a stale
    /// timer firing after the user has already grabbed the card is ignored.
    pub fn settle(&mut self) {
        match self.phase {
            StackPhase::Exiting => {
                match self.pending.take() {
                    Some(SwipeDirection::Right) => self.retreat_index(),
                    Some(SwipeDirection::Left) => self.advance_index(),
                    None => {}
                }
                self.transform = DragTransform::default();
                self.phase = StackPhase::Idle;
            }
            StackPhase::SpringingBack => {
                self.phase = StackPhase::Idle;
            }
            StackPhase::Idle | StackPhase::Dragging => {}
        }
    }

    /// Cards visible in the stack, top first, at most three
    pub fn visible_layouts(&self) -> Vec<CardLayout> {
        let mut layouts = Vec::new();
        if self.items.is_empty() {
            return layouts;
        }

        for depth in 0..PEEK_SCALES.len() {
            let index = self.active_index + depth;
            if index > self.max_index() {
                break;
            }
            layouts.push(CardLayout {
                index,
                depth,
                scale: PEEK_SCALES[depth],
                y_offset: PEEK_OFFSETS[depth],
                z_index: 10 + (3 - depth as i32),
                interactive: depth == 0,
            });
        }

        layouts
    }

    fn spring_back(&mut self) {
        self.transform = DragTransform::default();
        self.phase = StackPhase::SpringingBack;
    }

    fn reset_transform(&mut self) {
        self.transform = DragTransform::default();
        self.phase = StackPhase::Idle;
        self.gesture = None;
        self.pending = None;
    }

    fn advance_index(&mut self) {
        self.active_index = (self.active_index + 1).min(self.max_index());
    }

    fn retreat_index(&mut self) {
        self.active_index = self.active_index.saturating_sub(1);
    }

    fn max_index(&self) -> usize {
        self.items.len().saturating_sub(1)
    }
}

// =============================================================================
// Settle Timer
// =============================================================================

/// Fire-and-forget timer completing a deck's settle phase.
///
/// Dropping the timer before it fires cancels it without touching the deck.
pub struct SettleTimer {
    stop_tx: Option<oneshot::Sender<()>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl SettleTimer {
    /// Call [`CardStack::settle`] on the deck after `delay`
    pub fn schedule<T>(deck: Arc<Mutex<CardStack<T>>>, delay: Duration) -> Self
    where
        T: Send + 'static,
    {
        let (stop_tx, stop_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    if let Ok(mut deck) = deck.lock() {
                        deck.settle();
                    }
                }
                _ = stop_rx => {}
            }
        });

        Self {
            stop_tx: Some(stop_tx),
            _handle: handle,
        }
    }

    /// Schedule the settle matching a release outcome
    pub fn for_release<T>(deck: Arc<Mutex<CardStack<T>>>, outcome: ReleaseOutcome) -> Self
    where
        T: Send + 'static,
    {
        Self::schedule(deck, outcome.duration())
    }

    /// Cancel without settling
    pub fn cancel(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for SettleTimer {
    fn drop(&mut self) {
        self.abort();
    }
}

// =============================================================================
// Tests
// =============================================================================
