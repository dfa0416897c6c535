//! Framing ring buffer for flat sample streams
//!
//! Accepts blocks of any length and hands them back as fixed-size, possibly
//! overlapping frames. Each read returns one contiguous window covering the
//! requested frames; frame `i` starts at offset `i * hop_size` in the window.

use ndarray::{Array2, ArrayView2};
use tracing::{debug, trace};

use super::config::FramingConfig;
use crate::error::Result;
use crate::ring::{resolve_span, ChannelStorage, RingCursor};

/// Multi-channel framing ring buffer of samples
#[derive(Debug, Clone)]
pub struct FramingRingBuffer<T> {
    config: FramingConfig,
    cursor: RingCursor,
    storage: ChannelStorage<T>,
}

impl<T: Copy + Default> FramingRingBuffer<T> {
    /// Create a new buffer
    ///
    /// # Errors
    /// `InvalidConfiguration` if the geometry is unusable (zero channels,
    /// zero capacity, frame larger than capacity, zero hop, zero min frames).
    pub fn new(config: FramingConfig) -> Result<Self> {
        let cursor = config.cursor()?;
        let storage = ChannelStorage::new(config.num_channels, config.capacity, 1)?;

        debug!(
            channels = config.num_channels,
            capacity = config.capacity,
            frame_size = config.frame_size,
            hop_size = config.hop_size,
            min_frames = config.min_frames,
            keep_frames = config.keep_frames,
            "framing buffer created"
        );

        Ok(Self {
            config,
            cursor,
            storage,
        })
    }

    /// Write a whole `[channel][sample]` block
    ///
    /// # Returns
    /// `Ok(false)` if the block does not fit; nothing is written in that case.
    pub fn write<S: AsRef<[T]>>(&mut self, data: &[S]) -> Result<bool> {
        self.write_range(data, 0, 0)
    }

    /// Write samples `[offset, offset + count)` of every channel of `data`
    ///
    /// # Arguments
    /// * `data` - Input block, one slice per channel, all the same length
    /// * `offset` - First sample to write
    /// * `count` - Samples to write; `0` writes through the end of the block
    ///
    /// # Errors
    /// `ShapeMismatch` for a wrong or ragged channel layout, `Range` when the
    /// requested span does not lie inside the block. Both are checked before
    /// available space.
    pub fn write_range<S: AsRef<[T]>>(
        &mut self,
        data: &[S],
        offset: usize,
        count: usize,
    ) -> Result<bool> {
        let len = self.storage.check_flat_block(data)?;
        let span = resolve_span(len, offset, count)?;

        if span.is_empty() {
            return Ok(true);
        }
        if !self.cursor.can_write(span.len()) {
            trace!(requested = span.len(), space = self.cursor.available_space(), "write rejected");
            return Ok(false);
        }

        let slot = self.cursor.write_cursor();
        for (c, channel) in data.iter().enumerate() {
            self.storage.write_units(c, slot, &channel.as_ref()[span.clone()]);
        }
        self.cursor.commit_write(span.len());

        Ok(true)
    }

    /// Write columns `[offset, offset + count)` of a `(channels, samples)` array
    pub fn write_view(&mut self, data: ArrayView2<'_, T>, offset: usize, count: usize) -> Result<bool> {
        self.storage.check_channel_count(data.nrows())?;
        let span = resolve_span(data.ncols(), offset, count)?;

        if span.is_empty() {
            return Ok(true);
        }
        if !self.cursor.can_write(span.len()) {
            trace!(requested = span.len(), space = self.cursor.available_space(), "write rejected");
            return Ok(false);
        }

        let slot = self.cursor.write_cursor();
        for (c, row) in data.rows().into_iter().enumerate() {
            let row = row.slice(ndarray::s![span.clone()]);
            match row.as_slice() {
                Some(samples) => self.storage.write_units(c, slot, samples),
                None => self.storage.write_units(c, slot, &row.to_vec()),
            }
        }
        self.cursor.commit_write(span.len());

        Ok(true)
    }

    /// Append one sample per channel
    pub fn push(&mut self, samples: &[T]) -> Result<bool> {
        self.storage.check_channel_count(samples.len())?;

        if !self.cursor.can_write(1) {
            trace!("push rejected, buffer full");
            return Ok(false);
        }

        let slot = self.cursor.write_cursor();
        for (c, sample) in samples.iter().enumerate() {
            self.storage.write_units(c, slot, std::slice::from_ref(sample));
        }
        self.cursor.commit_write(1);

        Ok(true)
    }

    /// Read `num_frames` overlapping frames as one contiguous window
    ///
    /// # Arguments
    /// * `out` - Resized to `[num_channels][window_len]` on success
    /// * `num_frames` - Frames to read; `0` reads every available frame
    ///
    /// # Returns
    /// `false` if fewer than `min_frames` (or `num_frames`) frames are available.
    /// `out` is left untouched in that case.
    pub fn read(&mut self, out: &mut Vec<Vec<T>>, num_frames: usize) -> bool {
        let plan = match self.cursor.plan_read(num_frames) {
            Some(plan) => plan,
            None => {
                trace!(requested = num_frames, available = self.cursor.available_frames(), "read rejected");
                return false;
            }
        };

        out.resize_with(self.config.num_channels, Vec::new);
        for (c, channel) in out.iter_mut().enumerate() {
            channel.resize(plan.window_len, T::default());
            self.storage.read_units(c, plan.start, channel);
        }
        self.cursor.commit_read(&plan);

        true
    }

    /// Read `num_frames` frames into a new `(channels, window_len)` array
    pub fn read_array(&mut self, num_frames: usize) -> Option<Array2<T>> {
        let plan = self.cursor.plan_read(num_frames)?;

        let mut flat = vec![T::default(); self.config.num_channels * plan.window_len];
        for (c, channel) in flat.chunks_mut(plan.window_len).enumerate() {
            self.storage.read_units(c, plan.start, channel);
        }
        let window = Array2::from_shape_vec((self.config.num_channels, plan.window_len), flat).ok()?;
        self.cursor.commit_read(&plan);

        Some(window)
    }

    /// Pre-load filler so that one more hop makes the buffer ready
    ///
    /// # Returns
    /// `false` if the filler does not fit.
    pub fn prime(&mut self, fill: T) -> bool {
        let units = self.cursor.prime_units();
        if !self.cursor.can_write(units) {
            trace!(units, space = self.cursor.available_space(), "prime rejected");
            return false;
        }

        self.storage.fill_units(self.cursor.write_cursor(), units, fill);
        self.cursor.commit_write(units);
        debug!(units, "framing buffer primed");

        true
    }

    /// Drop all buffered samples
    pub fn clear(&mut self) {
        self.cursor.clear();
        debug!("framing buffer cleared");
    }

    /// Get number of whole frames ready to read
    pub fn available_frames(&self) -> usize {
        self.cursor.available_frames()
    }

    /// Get number of buffered units
    pub fn available_units(&self) -> usize {
        self.cursor.available_units()
    }

    /// Get number of units that can still be written
    pub fn available_space(&self) -> usize {
        self.cursor.available_space()
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    /// Check if no space is left
    pub fn is_full(&self) -> bool {
        self.cursor.is_full()
    }

    /// Check if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }

    /// Check if at least `min_frames` frames are readable
    pub fn ready(&self) -> bool {
        self.cursor.ready()
    }

    /// Get number of channels
    pub fn num_channels(&self) -> usize {
        self.config.num_channels
    }

    /// Get frame length
    pub fn frame_size(&self) -> usize {
        self.config.frame_size
    }

    /// Get hop between frame starts
    pub fn hop_size(&self) -> usize {
        self.config.hop_size
    }

    /// Get frames required before a read succeeds
    pub fn min_frames(&self) -> usize {
        self.config.min_frames
    }

    /// Get frames retained after each read
    pub fn keep_frames(&self) -> usize {
        self.config.keep_frames
    }

    /// Get the buffer configuration
    pub fn config(&self) -> &FramingConfig {
        &self.config
    }
}
