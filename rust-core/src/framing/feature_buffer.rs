//! Framing ring buffer for feature-vector streams
//!
//! Same cursor model as the sample buffer, but each time step holds a
//! fixed-size feature vector (e.g. a mel band or embedding per hop).
//! Layout is `[channel][time][feature]`; the ring wraps along time.

use ndarray::{s, Array3, ArrayView3, Axis};
use tracing::{debug, trace};

use super::config::FramingConfig;
use crate::error::{FramingError, Result};
use crate::ring::{resolve_span, ChannelStorage, RingCursor};

/// Multi-channel framing ring buffer of feature vectors
#[derive(Debug, Clone)]
pub struct FeatureRingBuffer<T> {
    config: FramingConfig,
    feature_dim: usize,
    cursor: RingCursor,
    storage: ChannelStorage<T>,
}

impl<T: Copy + Default> FeatureRingBuffer<T> {
    /// Create a new buffer
    ///
    /// # Arguments
    /// * `config` - Geometry in time steps (capacity, frame and hop)
    /// * `feature_dim` - Elements per time step, fixed for the buffer's lifetime
    pub fn new(config: FramingConfig, feature_dim: usize) -> Result<Self> {
        if feature_dim == 0 {
            return Err(FramingError::config("Feature dimension must be non-zero."));
        }
        let cursor = config.cursor()?;
        let storage = ChannelStorage::new(config.num_channels, config.capacity, feature_dim)?;

        debug!(
            channels = config.num_channels,
            feature_dim,
            capacity = config.capacity,
            frame_size = config.frame_size,
            hop_size = config.hop_size,
            "feature buffer created"
        );

        Ok(Self {
            config,
            feature_dim,
            cursor,
            storage,
        })
    }

    /// Write a whole `[channel][time][feature]` block
    pub fn write<C, U>(&mut self, data: &[C]) -> Result<bool>
    where
        C: AsRef<[U]>,
        U: AsRef<[T]>,
    {
        self.write_range(data, 0, 0)
    }

    /// Write time steps `[offset, offset + count)` of every channel of `data`
    ///
    /// `count == 0` writes through the end of the block. Every feature vector
    /// inside the span is checked before anything is copied.
    pub fn write_range<C, U>(&mut self, data: &[C], offset: usize, count: usize) -> Result<bool>
    where
        C: AsRef<[U]>,
        U: AsRef<[T]>,
    {
        self.storage.check_channel_count(data.len())?;
        let len = data.first().map_or(0, |ch| ch.as_ref().len());
        for (c, channel) in data.iter().enumerate().skip(1) {
            if channel.as_ref().len() != len {
                return Err(FramingError::shape(format!(
                    "Input channels have inconsistent time lengths (channel 0: {}, channel {}: {}).",
                    len,
                    c,
                    channel.as_ref().len()
                )));
            }
        }

        let span = resolve_span(len, offset, count)?;
        for (c, channel) in data.iter().enumerate() {
            for t in span.clone() {
                self.storage.check_unit(channel.as_ref()[t].as_ref(), c, t)?;
            }
        }

        if span.is_empty() {
            return Ok(true);
        }
        if !self.cursor.can_write(span.len()) {
            trace!(requested = span.len(), space = self.cursor.available_space(), "write rejected");
            return Ok(false);
        }

        let start = self.cursor.write_cursor();
        for (c, channel) in data.iter().enumerate() {
            for (i, unit) in channel.as_ref()[span.clone()].iter().enumerate() {
                let slot = self.cursor.slot_after(start, i);
                self.storage.write_units(c, slot, unit.as_ref());
            }
        }
        self.cursor.commit_write(span.len());

        Ok(true)
    }

    /// Write time steps `[offset, offset + count)` of a `(channels, time, features)` array
    pub fn write_view(&mut self, data: ArrayView3<'_, T>, offset: usize, count: usize) -> Result<bool> {
        let (channels, time, features) = data.dim();
        self.storage.check_channel_count(channels)?;
        if features != self.feature_dim {
            return Err(FramingError::shape(format!(
                "Feature dimension ({}) does not match buffer feature dimension ({}).",
                features, self.feature_dim
            )));
        }
        let span = resolve_span(time, offset, count)?;

        if span.is_empty() {
            return Ok(true);
        }
        if !self.cursor.can_write(span.len()) {
            trace!(requested = span.len(), space = self.cursor.available_space(), "write rejected");
            return Ok(false);
        }

        let slot = self.cursor.write_cursor();
        for (c, channel) in data.axis_iter(Axis(0)).enumerate() {
            let steps = channel.slice(s![span.clone(), ..]);
            match steps.as_slice() {
                Some(elements) => self.storage.write_units(c, slot, elements),
                None => {
                    let elements: Vec<T> = steps.iter().copied().collect();
                    self.storage.write_units(c, slot, &elements);
                }
            }
        }
        self.cursor.commit_write(span.len());

        Ok(true)
    }

    /// Append one feature vector per channel
    pub fn push<U: AsRef<[T]>>(&mut self, step: &[U]) -> Result<bool> {
        self.storage.check_channel_count(step.len())?;
        for (c, unit) in step.iter().enumerate() {
            self.storage.check_unit(unit.as_ref(), c, 0)?;
        }

        if !self.cursor.can_write(1) {
            trace!("push rejected, buffer full");
            return Ok(false);
        }

        let slot = self.cursor.write_cursor();
        for (c, unit) in step.iter().enumerate() {
            self.storage.write_units(c, slot, unit.as_ref());
        }
        self.cursor.commit_write(1);

        Ok(true)
    }

    /// Read `num_frames` frames into `out`, resized to `[channels][window_len][feature_dim]`
    ///
    /// `num_frames == 0` reads every available frame. Returns `false` and leaves
    /// `out` untouched when not enough frames are available.
    pub fn read(&mut self, out: &mut Vec<Vec<Vec<T>>>, num_frames: usize) -> bool {
        let plan = match self.cursor.plan_read(num_frames) {
            Some(plan) => plan,
            None => {
                trace!(requested = num_frames, available = self.cursor.available_frames(), "read rejected");
                return false;
            }
        };

        out.resize_with(self.config.num_channels, Vec::new);
        for (c, channel) in out.iter_mut().enumerate() {
            channel.resize_with(plan.window_len, Vec::new);
            for (t, unit) in channel.iter_mut().enumerate() {
                unit.resize(self.feature_dim, T::default());
                let slot = self.cursor.slot_after(plan.start, t);
                self.storage.read_units(c, slot, unit);
            }
        }
        self.cursor.commit_read(&plan);

        true
    }

    /// Read `num_frames` frames into a new `(channels, window_len, feature_dim)` array
    pub fn read_array(&mut self, num_frames: usize) -> Option<Array3<T>> {
        let plan = self.cursor.plan_read(num_frames)?;

        let per_channel = plan.window_len * self.feature_dim;
        let mut flat = vec![T::default(); self.config.num_channels * per_channel];
        for (c, channel) in flat.chunks_mut(per_channel).enumerate() {
            self.storage.read_units(c, plan.start, channel);
        }
        let shape = (self.config.num_channels, plan.window_len, self.feature_dim);
        let window = Array3::from_shape_vec(shape, flat).ok()?;
        self.cursor.commit_read(&plan);

        Some(window)
    }

    /// Pre-load filler vectors so that one more hop makes the buffer ready
    pub fn prime(&mut self, fill: T) -> bool {
        let units = self.cursor.prime_units();
        if !self.cursor.can_write(units) {
            trace!(units, space = self.cursor.available_space(), "prime rejected");
            return false;
        }

        self.storage.fill_units(self.cursor.write_cursor(), units, fill);
        self.cursor.commit_write(units);
        debug!(units, "feature buffer primed");

        true
    }

    /// Drop all buffered feature vectors
    pub fn clear(&mut self) {
        self.cursor.clear();
        debug!("feature buffer cleared");
    }

    /// Get number of whole frames ready to read
    pub fn available_frames(&self) -> usize {
        self.cursor.available_frames()
    }

    /// Buffered time steps
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

    /// Get elements per feature vector
    pub fn feature_dim(&self) -> usize {
        self.feature_dim
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
