//! Splice buffer configuration

use super::crossfade::CrossfadeCurve;
use crate::error::{FramingError, Result};
use crate::ring::RingCursor;

/// Minimum block length accepted by a splice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpliceMode {
    /// Blocks must be longer than `2 * overlap_size`, so fade-in, body and
    /// fade-out never touch
    #[default]
    Strict,

    /// Blocks only need `overlap_size` samples
    Relaxed,
}

impl SpliceMode {
    /// Whether a block of `len` samples can be spliced with `overlap` samples of crossfade
    pub fn accepts(&self, len: usize, overlap: usize) -> bool {
        match self {
            SpliceMode::Strict => overlap.checked_mul(2).map_or(false, |min| len > min),
            SpliceMode::Relaxed => len >= overlap,
        }
    }
}

/// Geometry and splice policy of an overlap-add buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OlaConfig {
    pub num_channels: usize,

    /// Resolved samples storable per channel
    pub capacity: usize,

    /// Samples per output frame; reads advance by whole frames
    pub frame_size: usize,

    /// Crossfade width used when splicing writes
    pub overlap_size: usize,

    pub min_frames: usize,
    pub keep_frames: usize,
    pub splice_mode: SpliceMode,
    pub curve: CrossfadeCurve,
}

impl Default for OlaConfig {
    fn default() -> Self {
        Self {
            num_channels: 1,
            capacity: 4096,
            frame_size: 512,
            overlap_size: 128,
            min_frames: 1,
            keep_frames: 0,
            splice_mode: SpliceMode::Strict,
            curve: CrossfadeCurve::EnergyPreserving,
        }
    }
}

impl OlaConfig {
    pub fn new(num_channels: usize, capacity: usize, frame_size: usize, overlap_size: usize) -> Self {
        Self {
            num_channels,
            capacity,
            frame_size,
            overlap_size,
            ..Self::default()
        }
    }

    pub fn with_min_frames(mut self, min_frames: usize) -> Self {
        self.min_frames = min_frames;
        self
    }

    pub fn with_keep_frames(mut self, keep_frames: usize) -> Self {
        self.keep_frames = keep_frames;
        self
    }

    pub fn with_splice_mode(mut self, splice_mode: SpliceMode) -> Self {
        self.splice_mode = splice_mode;
        self
    }

    pub fn with_curve(mut self, curve: CrossfadeCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.cursor().map(|_| ())
    }

    /// Cursor model with the pending tail held in `overlap_size` reserved slots
    pub(crate) fn cursor(&self) -> Result<RingCursor> {
        if self.num_channels == 0 {
            return Err(FramingError::config("Channel count must be non-zero."));
        }
        RingCursor::with_reserve(
            self.capacity,
            self.frame_size,
            self.frame_size,
            self.min_frames,
            self.keep_frames,
            self.overlap_size,
        )
    }
}
