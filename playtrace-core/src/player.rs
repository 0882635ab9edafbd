//! Player handle abstraction
//!
//! The sampler never owns the media element it observes. Hosts hand it a
//! [`PlayerHandle`] that answers the handful of questions a tick asks.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Ordered set of `(start, end)` spans in media seconds
///
/// Mirrors the shape of a media element's `played` and `buffered` ranges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRanges {
    ranges: Vec<(f64, f64)>,
}

impl TimeRanges {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from explicit spans, kept in the order given
    pub fn from_ranges(ranges: Vec<(f64, f64)>) -> Self {
        Self { ranges }
    }

    /// Number of intervals
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether the collection has no intervals
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Start bound of the interval at `index`
    pub fn start(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).map(|(start, _)| *start)
    }

    /// End bound of the interval at `index`
    pub fn end(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).map(|(_, end)| *end)
    }

    /// End bound of the last interval, if any
    pub fn last_end(&self) -> Option<f64> {
        self.len().checked_sub(1).and_then(|last| self.end(last))
    }

    /// Append a span
    pub fn push(&mut self, start: f64, end: f64) {
        self.ranges.push((start, end));
    }
}

/// Capability to read a media element's playback state
///
/// Implementations are supplied by the host (a browser bridge, a native
/// player, a test double). Counters are expected to be monotonically
/// non-decreasing over the element's lifetime.
pub trait PlayerHandle: Send + Sync {
    /// Whether the element can currently be read
    ///
    /// A tick against an unavailable player fails without recording.
    fn is_available(&self) -> bool {
        true
    }

    /// Paused flag
    fn paused(&self) -> bool;

    /// Intrinsic video width in pixels
    fn video_width(&self) -> u32;

    /// Intrinsic video height in pixels
    fn video_height(&self) -> u32;

    /// Frames decoded so far
    fn decoded_frame_count(&self) -> u64;

    /// Frames dropped so far
    fn dropped_frame_count(&self) -> u64;

    /// Played ranges
    fn played(&self) -> TimeRanges;

    /// Buffered ranges
    fn buffered(&self) -> TimeRanges;
}

/// Plain snapshot of everything a [`PlayerHandle`] exposes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Element reachable
    pub available: bool,
    /// Paused flag
    pub paused: bool,
    /// Video width in pixels
    pub video_width: u32,
    /// Video height in pixels
    pub video_height: u32,
    /// Decoded frame counter
    pub decoded_frames: u64,
    /// Dropped frame counter
    pub dropped_frames: u64,
    /// Played ranges
    pub played: TimeRanges,
    /// Buffered ranges
    pub buffered: TimeRanges,
}

/// In-memory player whose state is pushed by the host
///
/// Useful when the real element lives elsewhere and reports its state over
/// some channel, and in tests.
#[derive(Debug)]
pub struct StaticPlayer {
    state: RwLock<PlayerState>,
}

impl StaticPlayer {
    /// Create an available, playing player with empty counters
    pub fn new() -> Self {
        Self::with_state(PlayerState {
            available: true,
            ..PlayerState::default()
        })
    }

    /// Create from a full state snapshot
    pub fn with_state(state: PlayerState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Replace the whole state
    pub fn set_state(&self, state: PlayerState) {
        *self.state.write() = state;
    }

    /// Mutate the state in place
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut PlayerState),
    {
        f(&mut self.state.write());
    }

    /// Current state snapshot
    pub fn state(&self) -> PlayerState {
        self.state.read().clone()
    }
}

impl Default for StaticPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerHandle for StaticPlayer {
    fn is_available(&self) -> bool {
        self.state.read().available
    }

    fn paused(&self) -> bool {
        self.state.read().paused
    }

    fn video_width(&self) -> u32 {
        self.state.read().video_width
    }

    fn video_height(&self) -> u32 {
        self.state.read().video_height
    }

    fn decoded_frame_count(&self) -> u64 {
        self.state.read().decoded_frames
    }

    fn dropped_frame_count(&self) -> u64 {
        self.state.read().dropped_frames
    }

    fn played(&self) -> TimeRanges {
        self.state.read().played.clone()
    }

    fn buffered(&self) -> TimeRanges {
        self.state.read().buffered.clone()
    }
}
