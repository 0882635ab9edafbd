//! Column-oriented history of playback samples
//!
//! Eight parallel sequences, one per recorded field. Every append writes one
//! value to each column, so all columns always share the same length.

use crate::error::{SamplerError, SamplerResult};
use crate::sample::{Sample, SampleField};
use serde::{Deserialize, Deserializer, Serialize};

/// Eight parallel columns of equal length
///
/// Serializes as an object keyed by column name, matching the key set
/// `timestamp, paused, videoWidth, videoHeight, decodedFrames, droppedFrames,
/// played_until, buffered_until`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SampleStore {
    columns: SampleColumns,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SampleColumns {
    timestamp: Vec<u64>,
    paused: Vec<bool>,
    #[serde(rename = "videoWidth")]
    video_width: Vec<u32>,
    #[serde(rename = "videoHeight")]
    video_height: Vec<u32>,
    #[serde(rename = "decodedFrames")]
    decoded_frames: Vec<u64>,
    #[serde(rename = "droppedFrames")]
    dropped_frames: Vec<u64>,
    played_until: Vec<f64>,
    buffered_until: Vec<f64>,
}

impl SampleColumns {
    fn lengths(&self) -> [(SampleField, usize); 8] {
        [
            (SampleField::Timestamp, self.timestamp.len()),
            (SampleField::Paused, self.paused.len()),
            (SampleField::VideoWidth, self.video_width.len()),
            (SampleField::VideoHeight, self.video_height.len()),
            (SampleField::DecodedFrames, self.decoded_frames.len()),
            (SampleField::DroppedFrames, self.dropped_frames.len()),
            (SampleField::PlayedUntil, self.played_until.len()),
            (SampleField::BufferedUntil, self.buffered_until.len()),
        ]
    }
}

impl<'de> Deserialize<'de> for SampleStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let columns = SampleColumns::deserialize(deserializer)?;
        let expected = columns.timestamp.len();
        match columns
            .lengths()
            .into_iter()
            .find(|(_, len)| *len != expected)
        {
            Some((field, actual)) => Err(serde::de::Error::custom(SamplerError::StoreCorrupted {
                field: field.name().to_string(),
                expected,
                actual,
            })),
            None => Ok(Self { columns }),
        }
    }
}

impl SampleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `capacity` samples per column
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: SampleColumns {
                timestamp: Vec::with_capacity(capacity),
                paused: Vec::with_capacity(capacity),
                video_width: Vec::with_capacity(capacity),
                video_height: Vec::with_capacity(capacity),
                decoded_frames: Vec::with_capacity(capacity),
                dropped_frames: Vec::with_capacity(capacity),
                played_until: Vec::with_capacity(capacity),
                buffered_until: Vec::with_capacity(capacity),
            },
        }
    }

    /// Append one value to every column
    pub fn push(&mut self, sample: Sample) {
        let c = &mut self.columns;
        c.timestamp.push(sample.timestamp);
        c.paused.push(sample.paused);
        c.video_width.push(sample.video_width);
        c.video_height.push(sample.video_height);
        c.decoded_frames.push(sample.decoded_frames);
        c.dropped_frames.push(sample.dropped_frames);
        c.played_until.push(sample.played_until);
        c.buffered_until.push(sample.buffered_until);
    }

    /// Number of recorded samples
    pub fn len(&self) -> usize {
        self.columns.timestamp.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row at `index`
    pub fn get(&self, index: usize) -> Option<Sample> {
        let c = &self.columns;
        Some(Sample {
            timestamp: *c.timestamp.get(index)?,
            paused: *c.paused.get(index)?,
            played_until: *c.played_until.get(index)?,
            buffered_until: *c.buffered_until.get(index)?,
            video_width: *c.video_width.get(index)?,
            video_height: *c.video_height.get(index)?,
            decoded_frames: *c.decoded_frames.get(index)?,
            dropped_frames: *c.dropped_frames.get(index)?,
        })
    }

    /// Most recent row
    pub fn last(&self) -> SamplerResult<Sample> {
        self.len()
            .checked_sub(1)
            .and_then(|index| self.get(index))
            .ok_or(SamplerError::NoSamples)
    }

    /// Iterate rows oldest first
    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }

    /// Rows as an owned vector
    pub fn to_samples(&self) -> Vec<Sample> {
        self.iter().collect()
    }

    /// Length of the named column
    pub fn column_len(&self, field: SampleField) -> usize {
        self.columns
            .lengths()
            .into_iter()
            .find(|(f, _)| *f == field)
            .map(|(_, len)| len)
            .unwrap_or(0)
    }

    /// Timestamp column
    pub fn timestamps(&self) -> &[u64] {
        &self.columns.timestamp
    }

    /// Paused column
    pub fn paused(&self) -> &[bool] {
        &self.columns.paused
    }

    /// Video width column
    pub fn video_widths(&self) -> &[u32] {
        &self.columns.video_width
    }

    /// Video height column
    pub fn video_heights(&self) -> &[u32] {
        &self.columns.video_height
    }

    /// Decoded frames column
    pub fn decoded_frames(&self) -> &[u64] {
        &self.columns.decoded_frames
    }

    /// Dropped frames column
    pub fn dropped_frames(&self) -> &[u64] {
        &self.columns.dropped_frames
    }

    /// Played-until column
    pub fn played_until(&self) -> &[f64] {
        &self.columns.played_until
    }

    /// Buffered-until column
    pub fn buffered_until(&self) -> &[f64] {
        &self.columns.buffered_until
    }
}

impl FromIterator<Sample> for SampleStore {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut store = SampleStore::new();
        store.extend(iter);
        store
    }
}

impl Extend<Sample> for SampleStore {
    fn extend<I: IntoIterator<Item = Sample>>(&mut self, iter: I) {
        for sample in iter {
            self.push(sample);
        }
    }
}
