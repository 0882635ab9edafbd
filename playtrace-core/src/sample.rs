//! A single playback state sample

use serde::{Deserialize, Serialize};

/// One row of the sample history
///
/// Field order follows the tuple returned by [`Sample::into_tuple`]:
/// timestamp, paused, played until, buffered until, width, height, decoded
/// frames, dropped frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Wall-clock time of the tick, milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Paused flag
    pub paused: bool,
    /// End of the last played range in media seconds, 0 if none
    pub played_until: f64,
    /// End of the last buffered range in media seconds, 0 if none
    pub buffered_until: f64,
    /// Video width in pixels
    pub video_width: u32,
    /// Video height in pixels
    pub video_height: u32,
    /// Decoded frame counter
    pub decoded_frames: u64,
    /// Dropped frame counter
    pub dropped_frames: u64,
}

/// Fixed-order tuple form of a [`Sample`]
pub type SampleTuple = (u64, bool, f64, f64, u32, u32, u64, u64);

impl Sample {
    /// Convert to the fixed-order tuple
    pub fn into_tuple(self) -> SampleTuple {
        (
            self.timestamp,
            self.paused,
            self.played_until,
            self.buffered_until,
            self.video_width,
            self.video_height,
            self.decoded_frames,
            self.dropped_frames,
        )
    }

    /// Seconds of media buffered ahead of the playhead
    pub fn buffer_level(&self) -> f64 {
        (self.buffered_until - self.played_until).max(0.0)
    }

    /// Pixel resolution as `(width, height)`
    pub fn resolution(&self) -> (u32, u32) {
        (self.video_width, self.video_height)
    }
}

impl From<Sample> for SampleTuple {
    fn from(sample: Sample) -> Self {
        sample.into_tuple()
    }
}

/// Names of the eight recorded columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleField {
    /// Tick wall-clock time
    Timestamp,
    /// Paused flag
    Paused,
    /// Video width
    VideoWidth,
    /// Video height
    VideoHeight,
    /// Decoded frame counter
    DecodedFrames,
    /// Dropped frame counter
    DroppedFrames,
    /// End of last played range
    PlayedUntil,
    /// End of last buffered range
    BufferedUntil,
}

impl SampleField {
    /// All columns in store order
    pub const ALL: [SampleField; 8] = [
        SampleField::Timestamp,
        SampleField::Paused,
        SampleField::VideoWidth,
        SampleField::VideoHeight,
        SampleField::DecodedFrames,
        SampleField::DroppedFrames,
        SampleField::PlayedUntil,
        SampleField::BufferedUntil,
    ];

    /// Column key
    pub fn name(&self) -> &'static str {
        match self {
            SampleField::Timestamp => "timestamp",
            SampleField::Paused => "paused",
            SampleField::VideoWidth => "videoWidth",
            SampleField::VideoHeight => "videoHeight",
            SampleField::DecodedFrames => "decodedFrames",
            SampleField::DroppedFrames => "droppedFrames",
            SampleField::PlayedUntil => "played_until",
            SampleField::BufferedUntil => "buffered_until",
        }
    }
}

impl std::fmt::Display for SampleField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Sample {
        Sample {
            timestamp: 1_700_000_000_000,
            paused: false,
            played_until: 12.0,
            buffered_until: 30.5,
            video_width: 1920,
            video_height: 1080,
            decoded_frames: 100,
            dropped_frames: 2,
        }
    }

    #[test]
    fn test_tuple_order() {
        assert_eq!(
            sample().into_tuple(),
            (1_700_000_000_000, false, 12.0, 30.5, 1920, 1080, 100, 2)
        );
    }

    #[test]
    fn test_buffer_level_never_negative() {
        assert_eq!(sample().buffer_level(), 18.5);

        let behind = Sample {
            buffered_until: 0.0,
            ..sample()
        };
        assert_eq!(behind.buffer_level(), 0.0);
    }

    #[test]
    fn test_field_names() {
        let names: Vec<_> = SampleField::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names.len(), 8);
        assert_eq!(SampleField::PlayedUntil.to_string(), "played_until");
    }
}
