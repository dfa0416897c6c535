//! Overlap-add splice buffer
//!
//! Write path: each block's first `overlap_size` samples are faded in and
//! added onto the faded-out tail of the previous block; the rest overwrites
//! the ring, with its last `overlap_size` samples faded out to become the
//! next splice's tail. That tail is still pending and is not readable.
//!
//! Read path: contiguous, non-overlapping frames (hop == frame size).

use ndarray::Array2;
use tracing::{debug, trace};

use super::config::{OlaConfig, SpliceMode};
use super::crossfade::{generate_crossfade, Sample};
use crate::error::Result;
use crate::ring::{ChannelStorage, RingCursor};

/// Multi-channel crossfading splice buffer
#[derive(Debug, Clone)]
pub struct OlaRingBuffer<T> {
    config: OlaConfig,
    cursor: RingCursor,

    /// `capacity + overlap_size` slots per channel; the write cursor marks the
    /// start of the pending tail
    storage: ChannelStorage<T>,

    /// Fade-in gains, `overlap_size` long
    fade_in: Vec<T>,
}

impl<T: Sample> OlaRingBuffer<T> {
    /// Create a new buffer with silent storage
    pub fn new(config: OlaConfig) -> Result<Self> {
        let cursor = config.cursor()?;
        let storage = ChannelStorage::new(config.num_channels, cursor.slots(), 1)?;
        let fade_in = generate_crossfade(config.curve, config.overlap_size);

        debug!(
            channels = config.num_channels,
            capacity = config.capacity,
            frame_size = config.frame_size,
            overlap_size = config.overlap_size,
            mode = ?config.splice_mode,
            curve = ?config.curve,
            "splice buffer created"
        );

        Ok(Self {
            config,
            cursor,
            storage,
            fade_in,
        })
    }

    /// Splice a `[channel][sample]` block onto the pending tail
    ///
    /// # Returns
    /// `Ok(false)` if the block is too short for the splice mode, or if its
    /// net advance (`len - overlap_size`) does not fit. Nothing is written then.
    ///
    /// # Errors
    /// `ShapeMismatch` for a wrong channel count or ragged channels.
    pub fn write<S: AsRef<[T]>>(&mut self, data: &[S]) -> Result<bool> {
        let len = self.storage.check_flat_block(data)?;
        let overlap = self.config.overlap_size;

        if !self.config.splice_mode.accepts(len, overlap) {
            trace!(len, overlap, mode = ?self.config.splice_mode, "splice rejected, block too short");
            return Ok(false);
        }
        let net_advance = len - overlap;
        if !self.cursor.can_write(net_advance) {
            trace!(net_advance, space = self.cursor.available_space(), "splice rejected");
            return Ok(false);
        }

        let start = self.cursor.write_cursor();
        let body_start = self.cursor.slot_after(start, overlap);

        for (c, channel) in data.iter().enumerate() {
            let input = channel.as_ref();

            let (head, tail) = self.storage.runs_mut(c, start, overlap);
            for ((slot, &x), &gain) in head
                .iter_mut()
                .chain(tail.iter_mut())
                .zip(&input[..overlap])
                .zip(&self.fade_in)
            {
                *slot += x * gain;
            }

            let (head, tail) = self.storage.runs_mut(c, body_start, net_advance);
            for (j, (slot, &x)) in head
                .iter_mut()
                .chain(tail.iter_mut())
                .zip(&input[overlap..])
                .enumerate()
            {
                let from_end = net_advance - 1 - j;
                *slot = if from_end < overlap {
                    x * self.fade_in[from_end]
                } else {
                    x
                };
            }
        }
        self.cursor.commit_write(net_advance);

        Ok(true)
    }

    /// Read `num_frames` contiguous frames (`0` = every available frame)
    ///
    /// `out` is resized to `[num_channels][num_frames * frame_size]` on success
    /// and left untouched otherwise.
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

    /// Read `num_frames` frames into a new `(channels, samples)` array
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

    /// Silence the pending tail so the next splice fades in from zero
    ///
    /// Cursors are not moved.
    pub fn prime_with_silence(&mut self) {
        self.storage
            .fill_units(self.cursor.write_cursor(), self.config.overlap_size, T::default());
        debug!(overlap = self.config.overlap_size, "pending tail silenced");
    }

    /// Load `(min_frames - 1) * frame_size` samples of `fill` as resolved data,
    /// then silence the pending tail
    pub fn prime(&mut self, fill: T) -> bool {
        let units = self.cursor.prime_units();
        if !self.cursor.can_write(units) {
            trace!(units, space = self.cursor.available_space(), "prime rejected");
            return false;
        }

        self.storage.fill_units(self.cursor.write_cursor(), units, fill);
        self.cursor.commit_write(units);
        self.prime_with_silence();
        debug!(units, "splice buffer primed");

        true
    }

    /// Reset cursors and zero all storage
    pub fn clear(&mut self) {
        self.cursor.clear();
        self.storage.fill(T::default());
        debug!("splice buffer cleared");
    }

    /// Get number of whole frames ready to read
    pub fn available_frames(&self) -> usize {
        self.cursor.available_frames()
    }

    /// Resolved samples (the pending tail is excluded)
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

    /// Read hop, always equal to the frame size
    pub fn hop_size(&self) -> usize {
        self.cursor.hop_size()
    }

    /// Get crossfade width in samples
    pub fn overlap_size(&self) -> usize {
        self.config.overlap_size
    }

    /// Get frames required before a read succeeds
    pub fn min_frames(&self) -> usize {
        self.config.min_frames
    }

    /// Get frames retained after each read
    pub fn keep_frames(&self) -> usize {
        self.config.keep_frames
    }

    /// Get minimum block length policy
    pub fn splice_mode(&self) -> SpliceMode {
        self.config.splice_mode
    }

    /// Get the fade-in gain table
    pub fn crossfade_table(&self) -> &[T] {
        &self.fade_in
    }

    /// Get the buffer configuration
    pub fn config(&self) -> &OlaConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FramingError;
    use crate::ola::crossfade::CrossfadeCurve;
    use approx::assert_abs_diff_eq;

    fn constant(channels: usize, len: usize, value: f32) -> Vec<Vec<f32>> {
        vec![vec![value; len]; channels]
    }

    fn ramp(len: usize) -> Vec<Vec<f32>> {
        vec![(0..len).map(|i| i as f32).collect()]
    }

    #[test]
    fn test_initialization() {
        let buffer = OlaRingBuffer::<f32>::new(OlaConfig::new(2, 1000, 100, 25)).unwrap();
        assert_eq!(buffer.num_channels(), 2);
        assert_eq!(buffer.capacity(), 1000);
        assert_eq!(buffer.frame_size(), 100);
        assert_eq!(buffer.hop_size(), 100);
        assert_eq!(buffer.overlap_size(), 25);
        assert_eq!(buffer.crossfade_table().len(), 25);
        assert_eq!(buffer.available_units(), 0);
        assert_eq!(buffer.available_frames(), 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_zero_overlap_is_fifo() {
        let mut buffer = OlaRingBuffer::<f32>::new(OlaConfig::new(1, 1024, 128, 0)).unwrap();
        assert!(buffer.write(&ramp(128)).unwrap());
        assert_eq!(buffer.available_units(), 128);
        assert_eq!(buffer.available_frames(), 1);

        let mut out = Vec::new();
        assert!(buffer.read(&mut out, 1));
        assert_eq!(out[0], ramp(128)[0]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_block_length_constraints() {
        let mut strict = OlaRingBuffer::<f32>::new(OlaConfig::new(1, 100, 20, 10)).unwrap();
        assert!(!strict.write(&constant(1, 20, 1.0)).unwrap());
        assert!(strict.write(&constant(1, 21, 1.0)).unwrap());
        assert_eq!(strict.available_units(), 11);

        let config = OlaConfig::new(1, 100, 20, 10).with_splice_mode(SpliceMode::Relaxed);
        let mut relaxed = OlaRingBuffer::<f32>::new(config).unwrap();
        assert!(!relaxed.write(&constant(1, 5, 1.0)).unwrap());
        assert!(relaxed.write(&constant(1, 10, 1.0)).unwrap());
        assert_eq!(relaxed.available_units(), 0);
        assert!(relaxed.write(&constant(1, 15, 1.0)).unwrap());
        assert_eq!(relaxed.available_units(), 5);
    }

    #[test]
    fn test_crossfade_region() {
        let mut buffer = OlaRingBuffer::<f32>::new(OlaConfig::new(1, 100, 20, 10)).unwrap();
        let block = constant(1, 30, 1.0);

        assert!(buffer.write(&block).unwrap());
        assert_eq!(buffer.available_units(), 20);
        assert!(buffer.write(&block).unwrap());
        assert_eq!(buffer.available_units(), 40);

        let mut out = Vec::new();
        assert!(buffer.read(&mut out, 2));
        assert_eq!(out[0].len(), 40);

        // First block fades in from silence.
        assert_eq!(out[0][0], 0.0);
        assert!(out[0][5] > 0.0 && out[0][5] < 1.0);
        assert_eq!(out[0][10], 1.0);

        // Splice region 20..30 blends both blocks.
        let mid = out[0][25];
        assert!(mid > 0.5 && mid < 1.5, "midpoint {}", mid);
        assert_eq!(out[0][35], 1.0);
    }

    #[test]
    fn test_prime_with_silence_drops_previous_tail() {
        let mut buffer = OlaRingBuffer::<f32>::new(OlaConfig::new(1, 100, 10, 10)).unwrap();
        assert!(buffer.write(&constant(1, 30, 1.0)).unwrap());
        buffer.prime_with_silence();
        assert_eq!(buffer.available_units(), 20);

        assert!(buffer.write(&constant(1, 21, 1.0)).unwrap());
        let mut out = Vec::new();
        assert!(buffer.read(&mut out, 3));

        let table = buffer.crossfade_table().to_vec();
        for i in 0..10 {
            assert_eq!(out[0][20 + i], table[i]);
        }
    }

    #[test]
    fn test_full_buffer_keeps_unread_head() {
        let mut buffer = OlaRingBuffer::<f32>::new(OlaConfig::new(1, 100, 10, 5)).unwrap();
        assert!(buffer.write(&constant(1, 55, 1.0)).unwrap());
        assert!(buffer.write(&constant(1, 55, 2.0)).unwrap());
        assert_eq!(buffer.available_units(), 100);
        assert_eq!(buffer.available_space(), 0);
        assert!(buffer.is_full());
        assert!(!buffer.write(&constant(1, 11, 3.0)).unwrap());

        let window = buffer.read_array(0).unwrap();
        assert_eq!(window.dim(), (1, 100));

        let table = buffer.crossfade_table().to_vec();
        for i in 0..5 {
            assert_eq!(window[[0, i]], table[i]);
        }
        assert_eq!(window[[0, 20]], 1.0);
        for i in 55..100 {
            assert_eq!(window[[0, i]], 2.0);
        }
        assert!(buffer.is_empty());

        assert!(buffer.write(&constant(1, 20, 3.0)).unwrap());
        assert_eq!(buffer.available_units(), 15);
    }

    #[test]
    fn test_splice_across_ring_end() {
        let config = OlaConfig::new(1, 16, 4, 2).with_curve(CrossfadeCurve::Linear);
        let mut buffer = OlaRingBuffer::<f64>::new(config).unwrap();
        let mut out = Vec::new();

        for round in 0..10 {
            let block = vec![vec![1.0f64; 6]];
            assert!(buffer.write(&block).unwrap(), "round {}", round);
            assert!(buffer.read(&mut out, 1));
            // Table is [0, 0.5]; the tail fades out as [0.5, 0].
            let expected = if round == 0 {
                [0.0, 0.5, 1.0, 1.0]
            } else {
                [0.5, 0.5, 1.0, 1.0]
            };
            for (&x, &e) in out[0].iter().zip(expected.iter()) {
                assert_abs_diff_eq!(x, e, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_clear_and_prime() {
        let config = OlaConfig::new(2, 64, 8, 4).with_min_frames(3);
        let mut buffer = OlaRingBuffer::<f32>::new(config).unwrap();
        buffer.write(&constant(2, 20, 1.0)).unwrap();
        buffer.clear();
        assert!(buffer.is_empty());

        assert!(buffer.prime(0.5));
        assert_eq!(buffer.available_units(), 16);
        assert!(!buffer.ready());

        assert!(buffer.write(&constant(2, 12, 1.0)).unwrap());
        assert!(buffer.ready());

        let mut out = Vec::new();
        assert!(buffer.read(&mut out, 0));
        assert_eq!(out[1].len(), 24);
        assert_eq!(&out[1][..16], &[0.5; 16]);
        // The silenced tail means the splice fades in from zero, not from stale data.
        assert_eq!(out[1][16], 0.0);
    }

    #[test]
    fn test_oversized_ring_rejected() {
        let config = OlaConfig::new(1, usize::MAX / 4, 10, 5);
        assert!(matches!(
            OlaRingBuffer::<f64>::new(config),
            Err(FramingError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let mut buffer = OlaRingBuffer::<f32>::new(OlaConfig::new(2, 100, 10, 5)).unwrap();
        assert!(matches!(
            buffer.write(&constant(1, 20, 1.0)),
            Err(FramingError::ShapeMismatch(_))
        ));
        let ragged = vec![vec![1.0f32; 20], vec![1.0; 19]];
        assert!(matches!(buffer.write(&ragged), Err(FramingError::ShapeMismatch(_))));
        assert!(buffer.is_empty());
    }
}
