//! # Playtrace Core
//!
//! Periodic sampling of a video player's playback state.
//! This crate provides the player abstraction, the column-oriented sample
//! store and the sampler that fills it on a fixed schedule.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod player;
pub mod sample;
pub mod sampler;
pub mod store;

// Re-export main types
pub use error::{SamplerError, SamplerResult};
pub use player::{PlayerHandle, PlayerState, StaticPlayer, TimeRanges};
pub use sample::{Sample, SampleField, SampleTuple};
pub use sampler::{
    Clock, Sampler, SamplerConfig, SamplerStats, SystemClock, DEFAULT_SAMPLING_INTERVAL_MS,
};
pub use store::SampleStore;
