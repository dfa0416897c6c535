//! Framing buffer configuration

use crate::error::{FramingError, Result};
use crate::ring::RingCursor;

/// Geometry and read policy of a framing buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramingConfig {
    /// Number of independent channels
    pub num_channels: usize,

    /// Units storable per channel
    pub capacity: usize,

    /// Units per frame
    pub frame_size: usize,

    /// Units between the starts of consecutive frames
    pub hop_size: usize,

    /// Frames required before any read succeeds (default: 1)
    pub min_frames: usize,

    /// Frames left in place after each read (default: 0)
    pub keep_frames: usize,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            num_channels: 1,
            capacity: 4096,
            frame_size: 1024,
            hop_size: 256,
            min_frames: 1,
            keep_frames: 0,
        }
    }
}

impl FramingConfig {
    pub fn new(num_channels: usize, capacity: usize, frame_size: usize, hop_size: usize) -> Self {
        Self {
            num_channels,
            capacity,
            frame_size,
            hop_size,
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

    /// Check the configuration without allocating any storage
    pub fn validate(&self) -> Result<()> {
        self.cursor().map(|_| ())
    }

    pub(crate) fn cursor(&self) -> Result<RingCursor> {
        if self.num_channels == 0 {
            return Err(FramingError::config("Channel count must be non-zero."));
        }
        RingCursor::new(
            self.capacity,
            self.frame_size,
            self.hop_size,
            self.min_frames,
            self.keep_frames,
        )
    }
}
